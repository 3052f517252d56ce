use super::model::{CleanedTable, JourneyRecord};

// ---------------------------------------------------------------------------
// Filter criteria: exact categorical constraints, ANDed together
// ---------------------------------------------------------------------------

/// User-selected equality constraints over the cleaned table.
///
/// Each field is either `None` ("All" in the UI, no constraint) or one
/// exact value drawn from that column's observed domain. Criteria compose
/// with logical AND and each acts on its own column, so the order of
/// application never changes the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub ticket_class: Option<String>,
    pub ticket_type: Option<String>,
    pub purchase_type: Option<String>,
    pub journey_status: Option<String>,
}

impl FilterCriteria {
    /// Whether no constraint is set (the full table passes).
    pub fn is_unconstrained(&self) -> bool {
        self.ticket_class.is_none()
            && self.ticket_type.is_none()
            && self.purchase_type.is_none()
            && self.journey_status.is_none()
    }

    /// Whether a single record passes every set constraint.
    pub fn matches(&self, record: &JourneyRecord) -> bool {
        fn ok(constraint: &Option<String>, value: &str) -> bool {
            constraint.as_deref().map_or(true, |want| want == value)
        }
        ok(&self.ticket_class, &record.ticket_class)
            && ok(&self.ticket_type, &record.ticket_type)
            && ok(&self.purchase_type, &record.purchase_type)
            && ok(&self.journey_status, &record.journey_status)
    }
}

/// Return indices of records that pass all active criteria.
///
/// The result is a view into the table, not a copy; an empty result is a
/// valid outcome the caller handles by skipping the chart.
pub fn filtered_indices(table: &CleanedTable, criteria: &FilterCriteria) -> Vec<usize> {
    if criteria.is_unconstrained() {
        return (0..table.len()).collect();
    }
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CleanedTable;
    use crate::data::test_support::record;

    fn table() -> CleanedTable {
        let mut records = vec![
            record("First", "Advance", "Online", "On Time"),
            record("First", "Anytime", "Station", "Delayed"),
            record("First", "Advance", "Online", "Cancelled"),
        ];
        for _ in 0..7 {
            records.push(record("Standard", "Advance", "Online", "On Time"));
        }
        CleanedTable::from_records(records, (0.0, 100.0))
    }

    #[test]
    fn unconstrained_criteria_return_the_full_table() {
        let t = table();
        let all = filtered_indices(&t, &FilterCriteria::default());
        assert_eq!(all.len(), t.len());
        assert_eq!(all, (0..t.len()).collect::<Vec<_>>());
    }

    #[test]
    fn single_criterion_keeps_exact_matches_only() {
        let t = table();
        let criteria = FilterCriteria {
            ticket_class: Some("First".into()),
            ..Default::default()
        };
        let first = filtered_indices(&t, &criteria);
        assert_eq!(first.len(), 3);
        for rec in t.select(&first) {
            assert_eq!(rec.ticket_class, "First");
        }
    }

    #[test]
    fn criteria_compose_with_and() {
        let t = table();
        let criteria = FilterCriteria {
            ticket_class: Some("First".into()),
            ticket_type: Some("Advance".into()),
            journey_status: Some("On Time".into()),
            ..Default::default()
        };
        let subset = filtered_indices(&t, &criteria);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset, vec![0]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let t = table();
        let criteria = FilterCriteria {
            journey_status: Some("On Time".into()),
            ..Default::default()
        };
        let once = filtered_indices(&t, &criteria);
        // Re-applying the same predicate to the subset changes nothing.
        let twice: Vec<usize> = once
            .iter()
            .copied()
            .filter(|&i| criteria.matches(&t.records[i]))
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn filters_commute_across_columns() {
        let t = table();
        let by_class = FilterCriteria {
            ticket_class: Some("First".into()),
            ..Default::default()
        };
        let by_status = FilterCriteria {
            journey_status: Some("Delayed".into()),
            ..Default::default()
        };
        let both = FilterCriteria {
            ticket_class: Some("First".into()),
            journey_status: Some("Delayed".into()),
            ..Default::default()
        };

        let class_then_status: Vec<usize> = filtered_indices(&t, &by_class)
            .into_iter()
            .filter(|&i| by_status.matches(&t.records[i]))
            .collect();
        let status_then_class: Vec<usize> = filtered_indices(&t, &by_status)
            .into_iter()
            .filter(|&i| by_class.matches(&t.records[i]))
            .collect();

        assert_eq!(class_then_status, status_then_class);
        assert_eq!(class_then_status, filtered_indices(&t, &both));
    }

    #[test]
    fn empty_subset_is_a_valid_outcome() {
        let t = table();
        let criteria = FilterCriteria {
            ticket_class: Some("First".into()),
            purchase_type: Some("Station".into()),
            journey_status: Some("On Time".into()),
            ..Default::default()
        };
        assert!(filtered_indices(&t, &criteria).is_empty());
    }
}
