use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Category – a filterable / groupable categorical column
// ---------------------------------------------------------------------------

/// The categorical columns the UI can filter, group, or color by.
/// Value sets are open-ended and driven by the data, so the values
/// themselves stay plain strings; only the column names are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    TicketClass,
    TicketType,
    PurchaseType,
    JourneyStatus,
    Railcard,
}

impl Category {
    /// All categories, in the order the UI presents them.
    pub const ALL: [Category; 5] = [
        Category::TicketClass,
        Category::TicketType,
        Category::PurchaseType,
        Category::JourneyStatus,
        Category::Railcard,
    ];

    /// The value of this column for a given record.
    pub fn value<'a>(&self, record: &'a JourneyRecord) -> &'a str {
        match self {
            Category::TicketClass => &record.ticket_class,
            Category::TicketType => &record.ticket_type,
            Category::PurchaseType => &record.purchase_type,
            Category::JourneyStatus => &record.journey_status,
            Category::Railcard => &record.railcard,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::TicketClass => "Ticket Class",
            Category::TicketType => "Ticket Type",
            Category::PurchaseType => "Purchase Type",
            Category::JourneyStatus => "Journey Status",
            Category::Railcard => "Railcard",
        };
        write!(f, "{label}")
    }
}

// ---------------------------------------------------------------------------
// JourneyRecord – one row of the cleaned table
// ---------------------------------------------------------------------------

/// A single journey (one cleaned row of the source CSV).
///
/// Timestamp fields are `None` when the corresponding time-of-day text
/// failed to parse; derived fields depending on them are `None` too.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyRecord {
    pub purchase_date: NaiveDate,
    pub journey_date: NaiveDate,

    pub departure_datetime: Option<NaiveDateTime>,
    pub arrival_datetime: Option<NaiveDateTime>,
    pub actual_arrival_datetime: Option<NaiveDateTime>,

    pub departure_station: String,
    pub arrival_destination: String,
    /// Always `"<departure> to <destination>"`.
    pub route: String,

    pub ticket_class: String,
    pub ticket_type: String,
    pub purchase_type: String,
    pub journey_status: String,
    /// Missing values are normalized to `"None"` at load time.
    pub railcard: String,
    /// Missing values are normalized to `"On Time"` at load time.
    pub reason_for_delay: String,

    pub price: f64,

    /// Hour of day (0–23) extracted from `departure_datetime`.
    pub departure_hour: Option<u32>,
    /// `actual_arrival − arrival` in minutes; negative when early.
    pub delay_minutes: Option<f64>,
}

// ---------------------------------------------------------------------------
// CleanedTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The fully cleaned, outlier-free table with pre-computed column domains.
/// Immutable after construction; shared via `Arc` for the session lifetime.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    /// All journeys (rows).
    pub records: Vec<JourneyRecord>,
    /// For each categorical column the sorted set of observed values.
    pub unique_values: BTreeMap<Category, BTreeSet<String>>,
    /// Price band `[lower, upper]` that survived the outlier pass.
    pub price_bounds: (f64, f64),
}

impl CleanedTable {
    /// Build column domains from the cleaned records.
    pub fn from_records(records: Vec<JourneyRecord>, price_bounds: (f64, f64)) -> Self {
        let mut unique_values: BTreeMap<Category, BTreeSet<String>> = BTreeMap::new();

        for rec in &records {
            for cat in Category::ALL {
                unique_values
                    .entry(cat)
                    .or_default()
                    .insert(cat.value(rec).to_string());
            }
        }

        CleanedTable {
            records,
            unique_values,
            price_bounds,
        }
    }

    /// Observed values for one categorical column (absent when no rows).
    pub fn domain(&self, category: Category) -> Option<&BTreeSet<String>> {
        self.unique_values.get(&category)
    }

    /// Iterate the records selected by a list of row indices.
    pub fn select<'a>(
        &'a self,
        indices: &'a [usize],
    ) -> impl Iterator<Item = &'a JourneyRecord> + 'a {
        indices.iter().map(move |&i| &self.records[i])
    }

    /// Number of journeys.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::record;

    #[test]
    fn domains_cover_observed_values() {
        let table = CleanedTable::from_records(
            vec![
                record("First", "Advance", "Online", "On Time"),
                record("Standard", "Off-Peak", "Station", "Delayed"),
                record("Standard", "Advance", "Online", "On Time"),
            ],
            (0.0, 100.0),
        );

        let classes = table.domain(Category::TicketClass).unwrap();
        assert_eq!(classes.iter().collect::<Vec<_>>(), vec!["First", "Standard"]);
        let statuses = table.domain(Category::JourneyStatus).unwrap();
        assert!(statuses.contains("Delayed") && statuses.contains("On Time"));
    }

    #[test]
    fn select_yields_rows_in_index_order() {
        let table = CleanedTable::from_records(
            vec![
                record("First", "Advance", "Online", "On Time"),
                record("Standard", "Advance", "Online", "On Time"),
            ],
            (0.0, 100.0),
        );
        let picked: Vec<&str> = table
            .select(&[1, 0])
            .map(|r| r.ticket_class.as_str())
            .collect();
        assert_eq!(picked, ["Standard", "First"]);
    }
}
