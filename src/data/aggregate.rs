use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use super::model::JourneyRecord;

// ---------------------------------------------------------------------------
// Aggregation surface
// ---------------------------------------------------------------------------
// Four pure operations back every view: a filter pass (see `filter`)
// followed by at most one of top-N counting, grouped sums, or grouped
// counts. Keys are extracted by closure so the same functions serve
// string columns (route, delay reason) and derived ones (departure hour).

/// Count occurrences of a key over the subset and return the top `n`
/// by count descending. Ties break by first encounter, so the ranking
/// is stable with respect to input order.
pub fn top_n_by_count<'a, K, F, I>(rows: I, key: F, n: usize) -> Vec<(K, usize)>
where
    I: IntoIterator<Item = &'a JourneyRecord>,
    F: Fn(&'a JourneyRecord) -> K,
    K: Eq + Hash + Clone,
{
    let mut counts: HashMap<K, (usize, usize)> = HashMap::new();
    for (seen, rec) in rows.into_iter().enumerate() {
        counts
            .entry(key(rec))
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, seen));
    }

    let mut ranked: Vec<(K, usize, usize)> = counts
        .into_iter()
        .map(|(k, (count, first))| (k, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.truncate(n);
    ranked.into_iter().map(|(k, count, _)| (k, count)).collect()
}

/// Group rows by key and sum a numeric value within each group.
pub fn sum_by_group<'a, K, F, V, I>(rows: I, key: F, value: V) -> BTreeMap<K, f64>
where
    I: IntoIterator<Item = &'a JourneyRecord>,
    F: Fn(&'a JourneyRecord) -> K,
    V: Fn(&'a JourneyRecord) -> f64,
    K: Ord,
{
    let mut sums: BTreeMap<K, f64> = BTreeMap::new();
    for rec in rows {
        *sums.entry(key(rec)).or_insert(0.0) += value(rec);
    }
    sums
}

/// Group rows by key and count them: `sum_by_group` with an implicit
/// value of one per row.
pub fn count_by_group<'a, K, F, I>(rows: I, key: F) -> BTreeMap<K, usize>
where
    I: IntoIterator<Item = &'a JourneyRecord>,
    F: Fn(&'a JourneyRecord) -> K,
    K: Ord,
{
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for rec in rows {
        *counts.entry(key(rec)).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::record;
    use crate::data::model::JourneyRecord;

    fn rows_with_classes(classes: &[&str]) -> Vec<JourneyRecord> {
        classes
            .iter()
            .map(|c| record(c, "Advance", "Online", "On Time"))
            .collect()
    }

    #[test]
    fn top_n_ranks_by_count_descending() {
        let rows = rows_with_classes(&["A", "A", "B", "C", "C", "C"]);
        let top = top_n_by_count(&rows, |r| r.ticket_class.clone(), 2);
        assert_eq!(top, vec![("C".to_string(), 3), ("A".to_string(), 2)]);
    }

    #[test]
    fn top_n_breaks_ties_by_first_encounter() {
        let rows = rows_with_classes(&["B", "A", "B", "A", "C"]);
        let top = top_n_by_count(&rows, |r| r.ticket_class.clone(), 3);
        assert_eq!(
            top,
            vec![
                ("B".to_string(), 2),
                ("A".to_string(), 2),
                ("C".to_string(), 1)
            ]
        );
    }

    #[test]
    fn top_n_returns_at_most_n_and_counts_bounded_by_input() {
        let rows = rows_with_classes(&["A", "B", "C", "D"]);
        let top = top_n_by_count(&rows, |r| r.ticket_class.clone(), 2);
        assert_eq!(top.len(), 2);
        let total: usize = top.iter().map(|(_, c)| c).sum();
        assert!(total <= rows.len());
    }

    #[test]
    fn grouped_sums_conserve_the_total() {
        let mut rows = rows_with_classes(&["First", "Standard", "First", "Standard"]);
        for (i, rec) in rows.iter_mut().enumerate() {
            rec.price = (i + 1) as f64 * 10.0;
        }
        let sums = sum_by_group(&rows, |r| r.ticket_class.clone(), |r| r.price);

        let grouped_total: f64 = sums.values().sum();
        let direct_total: f64 = rows.iter().map(|r| r.price).sum();
        assert_eq!(grouped_total, direct_total);
        assert_eq!(sums["First"], 10.0 + 30.0);
        assert_eq!(sums["Standard"], 20.0 + 40.0);
    }

    #[test]
    fn grouped_counts_match_occurrences() {
        let rows = rows_with_classes(&["First", "Standard", "Standard"]);
        let counts = count_by_group(&rows, |r| r.ticket_class.clone());
        assert_eq!(counts["First"], 1);
        assert_eq!(counts["Standard"], 2);
        assert_eq!(counts.values().sum::<usize>(), rows.len());
    }

    #[test]
    fn hour_grouping_skips_unparsed_departures() {
        let mut rows = rows_with_classes(&["A", "B", "C"]);
        rows[0].departure_hour = Some(8);
        rows[1].departure_hour = Some(8);
        rows[2].departure_hour = None;

        let by_hour = count_by_group(
            rows.iter().filter(|r| r.departure_hour.is_some()),
            |r| r.departure_hour.unwrap(),
        );
        assert_eq!(by_hour[&8], 2);
        assert_eq!(by_hour.len(), 1);
    }
}
