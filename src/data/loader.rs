use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Deserialize;
use thiserror::Error;

use super::model::{CleanedTable, JourneyRecord};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Fatal load-time failures. Everything past a successful load is
/// error-free by construction (pure functions over the cleaned table).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", path.display())]
    DataSourceNotFound { path: PathBuf },

    #[error("row {row}: '{raw}' is not a valid {field} (expected YYYY-MM-DD or MM/DD/YYYY)")]
    MalformedDate {
        row: usize,
        field: &'static str,
        raw: String,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Raw CSV row
// ---------------------------------------------------------------------------

/// One row exactly as it appears in the source file. `Railcard` and
/// `Reason for Delay` are optional in the data; everything else must be
/// present for the row to parse at all.
#[derive(Debug, Deserialize)]
struct RawJourney {
    #[serde(rename = "Date of Purchase")]
    date_of_purchase: String,
    #[serde(rename = "Date of Journey")]
    date_of_journey: String,
    #[serde(rename = "Departure Time")]
    departure_time: String,
    #[serde(rename = "Arrival Time")]
    arrival_time: String,
    #[serde(rename = "Actual Arrival Time")]
    actual_arrival_time: String,
    #[serde(rename = "Departure Station")]
    departure_station: String,
    #[serde(rename = "Arrival Destination")]
    arrival_destination: String,
    #[serde(rename = "Railcard")]
    railcard: Option<String>,
    #[serde(rename = "Reason for Delay")]
    reason_for_delay: Option<String>,
    #[serde(rename = "Ticket Class")]
    ticket_class: String,
    #[serde(rename = "Ticket Type")]
    ticket_type: String,
    #[serde(rename = "Purchase Type")]
    purchase_type: String,
    #[serde(rename = "Journey Status")]
    journey_status: String,
    #[serde(rename = "Price")]
    price: f64,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and clean the journey table from a CSV file.
///
/// Pipeline: parse rows → fill missing categoricals → parse dates
/// (load-critical) → combine timestamps (best-effort) → derive columns
/// → drop price outliers (global IQR band) → build the table.
pub fn load(path: &Path) -> Result<CleanedTable, LoadError> {
    let text = read_source(path)?;
    clean(&text)
}

fn read_source(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            LoadError::DataSourceNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io(e)
        }
    })
}

/// Run the full cleaning pipeline over raw CSV text.
pub fn clean(csv_text: &str) -> Result<CleanedTable, LoadError> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<RawJourney>().enumerate() {
        // 1-based data row, header not counted.
        records.push(clean_row(i + 1, row?)?);
    }

    let n_parsed = records.len();
    let bounds = price_bounds(&records);
    records.retain(|r| r.price >= bounds.0 && r.price <= bounds.1);
    log::info!(
        "cleaned {} rows ({} price outliers outside [{:.2}, {:.2}] dropped)",
        records.len(),
        n_parsed - records.len(),
        bounds.0,
        bounds.1
    );

    Ok(CleanedTable::from_records(records, bounds))
}

// ---------------------------------------------------------------------------
// Row cleaning
// ---------------------------------------------------------------------------

fn clean_row(row: usize, raw: RawJourney) -> Result<JourneyRecord, LoadError> {
    // Missing categoricals are filled before anything downstream can
    // observe them; aggregations would otherwise drop or misgroup them.
    let railcard = fill_missing(raw.railcard, "None");
    let reason_for_delay = fill_missing(raw.reason_for_delay, "On Time");

    // Dates are load-critical: a value matching neither accepted form
    // aborts the whole load with enough context to locate the record.
    let purchase_date = parse_mixed_date(&raw.date_of_purchase).ok_or_else(|| {
        LoadError::MalformedDate {
            row,
            field: "Date of Purchase",
            raw: raw.date_of_purchase.clone(),
        }
    })?;
    let journey_date = parse_mixed_date(&raw.date_of_journey).ok_or_else(|| {
        LoadError::MalformedDate {
            row,
            field: "Date of Journey",
            raw: raw.date_of_journey.clone(),
        }
    })?;

    // Times are not: a malformed clock value degrades to None and the
    // row stays, excluded from time-based aggregates only.
    let departure_datetime = combine(journey_date, &raw.departure_time);
    let arrival_datetime = combine(journey_date, &raw.arrival_time);
    let actual_arrival_datetime = combine(journey_date, &raw.actual_arrival_time);

    let route = format!("{} to {}", raw.departure_station, raw.arrival_destination);
    let departure_hour = departure_datetime.map(|dt| dt.hour());
    let delay_minutes = match (actual_arrival_datetime, arrival_datetime) {
        (Some(actual), Some(planned)) => {
            Some((actual - planned).num_seconds() as f64 / 60.0)
        }
        _ => None,
    };

    Ok(JourneyRecord {
        purchase_date,
        journey_date,
        departure_datetime,
        arrival_datetime,
        actual_arrival_datetime,
        departure_station: raw.departure_station,
        arrival_destination: raw.arrival_destination,
        route,
        ticket_class: raw.ticket_class,
        ticket_type: raw.ticket_type,
        purchase_type: raw.purchase_type,
        journey_status: raw.journey_status,
        railcard,
        reason_for_delay,
        price: raw.price,
        departure_hour,
        delay_minutes,
    })
}

fn fill_missing(value: Option<String>, fill: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fill.to_string(),
    }
}

/// Parse a date accepting `YYYY-MM-DD` or `MM/DD/YYYY`, mixed freely
/// within the same column.
fn parse_mixed_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
}

/// Combine the journey date with a time-of-day string (`HH:MM:SS` or
/// `HH:MM`) into a full timestamp. `None` on malformed time.
fn combine(date: NaiveDate, time: &str) -> Option<NaiveDateTime> {
    let time = time.trim();
    let parsed = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .ok()?;
    Some(date.and_time(parsed))
}

// ---------------------------------------------------------------------------
// Outlier band
// ---------------------------------------------------------------------------

/// `[Q1 − 1.5·IQR, Q3 + 1.5·IQR]` over the full price distribution.
/// Computed once, before any filtering; never per subgroup.
fn price_bounds(records: &[JourneyRecord]) -> (f64, f64) {
    if records.is_empty() {
        return (f64::NEG_INFINITY, f64::INFINITY);
    }
    let mut prices: Vec<f64> = records.iter().map(|r| r.price).collect();
    prices.sort_by(f64::total_cmp);

    let q1 = quantile(&prices, 0.25);
    let q3 = quantile(&prices, 0.75);
    let iqr = q3 - q1;
    (q1 - 1.5 * iqr, q3 + 1.5 * iqr)
}

/// Quantile by linear interpolation between order statistics.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// ---------------------------------------------------------------------------
// Memoized loading
// ---------------------------------------------------------------------------

/// One-entry load cache. Repeated loads of the same path with unchanged
/// contents return the same `Arc<CleanedTable>` without re-running the
/// pipeline; the key is the file's content fingerprint, not load time.
#[derive(Default)]
pub struct TableCache {
    entry: Option<CacheEntry>,
}

struct CacheEntry {
    path: PathBuf,
    fingerprint: u64,
    table: Arc<CleanedTable>,
}

impl TableCache {
    pub fn load(&mut self, path: &Path) -> Result<Arc<CleanedTable>, LoadError> {
        let text = read_source(path)?;
        let fingerprint = fingerprint(&text);

        if let Some(entry) = &self.entry {
            if entry.path == path && entry.fingerprint == fingerprint {
                log::debug!("table cache hit for {}", path.display());
                return Ok(Arc::clone(&entry.table));
            }
        }

        let table = Arc::new(clean(&text)?);
        self.entry = Some(CacheEntry {
            path: path.to_path_buf(),
            fingerprint,
            table: Arc::clone(&table),
        });
        Ok(table)
    }
}

fn fingerprint(text: &str) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Category;

    const HEADER: &str = "Date of Purchase,Date of Journey,Departure Time,Arrival Time,\
Actual Arrival Time,Departure Station,Arrival Destination,Railcard,Reason for Delay,\
Ticket Class,Ticket Type,Purchase Type,Journey Status,Price";

    fn csv_with(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn fills_missing_railcard_and_delay_reason() {
        let text = csv_with(&[
            "2024-01-01,2024-02-01,08:00:00,09:00:00,09:00:00,London Euston,Manchester Piccadilly,,,Standard,Advance,Online,On Time,25.0",
        ]);
        let table = clean(&text).unwrap();
        assert_eq!(table.records[0].railcard, "None");
        assert_eq!(table.records[0].reason_for_delay, "On Time");
    }

    #[test]
    fn route_is_departure_to_destination() {
        let text = csv_with(&[
            "2024-01-01,2024-02-01,08:00:00,09:00:00,09:00:00,York,Leeds,Adult,,Standard,Advance,Online,On Time,5.0",
        ]);
        let table = clean(&text).unwrap();
        for rec in &table.records {
            assert_eq!(
                rec.route,
                format!("{} to {}", rec.departure_station, rec.arrival_destination)
            );
        }
        assert_eq!(table.records[0].route, "York to Leeds");
    }

    #[test]
    fn accepts_mixed_date_formats_in_one_column() {
        let text = csv_with(&[
            "2024-01-01,2024-02-01,08:00:00,09:00:00,09:00:00,York,Leeds,Adult,,Standard,Advance,Online,On Time,5.0",
            "01/15/2024,02/03/2024,08:00:00,09:00:00,09:00:00,York,Leeds,Adult,,Standard,Advance,Online,On Time,6.0",
        ]);
        let table = clean(&text).unwrap();
        assert_eq!(
            table.records[0].journey_date,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert_eq!(
            table.records[1].journey_date,
            NaiveDate::from_ymd_opt(2024, 2, 3).unwrap()
        );
    }

    #[test]
    fn unparseable_date_fails_the_load_with_context() {
        let text = csv_with(&[
            "2024-01-01,2024-02-01,08:00:00,09:00:00,09:00:00,York,Leeds,Adult,,Standard,Advance,Online,On Time,5.0",
            "2024-01-01,01-02-2024,08:00:00,09:00:00,09:00:00,York,Leeds,Adult,,Standard,Advance,Online,On Time,5.0",
        ]);
        match clean(&text) {
            Err(LoadError::MalformedDate { row, field, raw }) => {
                assert_eq!(row, 2);
                assert_eq!(field, "Date of Journey");
                assert_eq!(raw, "01-02-2024");
            }
            other => panic!("expected MalformedDate, got {other:?}"),
        }
    }

    #[test]
    fn malformed_time_degrades_instead_of_failing() {
        let text = csv_with(&[
            "2024-01-01,2024-02-01,not-a-time,09:00:00,09:10:00,York,Leeds,Adult,,Standard,Advance,Online,Delayed,5.0",
        ]);
        let table = clean(&text).unwrap();
        let rec = &table.records[0];
        assert!(rec.departure_datetime.is_none());
        assert!(rec.departure_hour.is_none());
        // Arrival pair still parses, so the delay survives.
        assert_eq!(rec.delay_minutes, Some(10.0));
    }

    #[test]
    fn delay_is_actual_minus_planned_arrival_in_minutes() {
        let text = csv_with(&[
            "2024-01-01,2024-02-01,08:00:00,08:05:00,08:15:00,York,Leeds,Adult,Signal Failure,Standard,Advance,Online,Delayed,5.0",
        ]);
        let table = clean(&text).unwrap();
        let rec = &table.records[0];
        assert_eq!(rec.delay_minutes, Some(10.0));
        assert_eq!(rec.departure_hour, Some(8));
    }

    #[test]
    fn early_arrival_yields_negative_delay() {
        let text = csv_with(&[
            "2024-01-01,2024-02-01,08:00:00,09:00:00,08:55:00,York,Leeds,Adult,,Standard,Advance,Online,On Time,5.0",
        ]);
        let table = clean(&text).unwrap();
        assert_eq!(table.records[0].delay_minutes, Some(-5.0));
    }

    #[test]
    fn price_outliers_are_dropped_by_global_iqr_band() {
        let rows: Vec<String> = [10.0, 12.0, 11.0, 13.0, 1000.0]
            .iter()
            .map(|p| {
                format!(
                    "2024-01-01,2024-02-01,08:00:00,09:00:00,09:00:00,York,Leeds,Adult,,Standard,Advance,Online,On Time,{p}"
                )
            })
            .collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let table = clean(&csv_with(&refs)).unwrap();

        assert_eq!(table.len(), 4);
        let (lower, upper) = table.price_bounds;
        for rec in &table.records {
            assert!(rec.price >= lower && rec.price <= upper);
            assert!(rec.price < 1000.0);
        }
    }

    #[test]
    fn empty_data_yields_empty_table() {
        let table = clean(&csv_with(&[])).unwrap();
        assert!(table.is_empty());
        assert!(table.domain(Category::TicketClass).is_none());
    }

    #[test]
    fn quantiles_interpolate_between_order_statistics() {
        let sorted = [10.0, 11.0, 12.0, 13.0, 1000.0];
        assert_eq!(quantile(&sorted, 0.25), 11.0);
        assert_eq!(quantile(&sorted, 0.75), 13.0);
        assert_eq!(quantile(&sorted, 0.5), 12.0);
        let even = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&even, 0.25), 1.75);
    }

    #[test]
    fn missing_file_is_reported_as_data_source_not_found() {
        let path = std::env::temp_dir().join("railboard-no-such-file.csv");
        match load(&path) {
            Err(LoadError::DataSourceNotFound { path: reported }) => {
                assert_eq!(reported, path);
            }
            other => panic!("expected DataSourceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn cache_returns_same_table_for_unchanged_contents() {
        let path = std::env::temp_dir().join("railboard-cache-test.csv");
        let text = csv_with(&[
            "2024-01-01,2024-02-01,08:00:00,09:00:00,09:00:00,York,Leeds,Adult,,Standard,Advance,Online,On Time,5.0",
        ]);
        std::fs::write(&path, &text).unwrap();

        let mut cache = TableCache::default();
        let first = cache.load(&path).unwrap();
        let second = cache.load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // Changed contents invalidate the entry.
        std::fs::write(&path, csv_with(&[])).unwrap();
        let third = cache.load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert!(third.is_empty());

        let _ = std::fs::remove_file(&path);
    }
}
