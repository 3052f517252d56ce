/// Data layer: core types, loading/cleaning, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  railway .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse → fill → dates → derive → IQR outlier pass
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ CleanedTable  │  Vec<JourneyRecord>, categorical domains
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐      ┌────────────┐
///   │  filter   │ ───▶ │ aggregate   │  criteria → indices → series
///   └──────────┘      └────────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;

#[cfg(test)]
pub mod test_support {
    use chrono::NaiveDate;

    use super::model::JourneyRecord;

    /// A cleaned record with the given categoricals and neutral defaults
    /// everywhere else.
    pub fn record(
        class: &str,
        ticket_type: &str,
        purchase_type: &str,
        status: &str,
    ) -> JourneyRecord {
        let journey_date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let departure = journey_date.and_hms_opt(8, 0, 0).unwrap();
        let arrival = journey_date.and_hms_opt(9, 0, 0).unwrap();
        JourneyRecord {
            purchase_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            journey_date,
            departure_datetime: Some(departure),
            arrival_datetime: Some(arrival),
            actual_arrival_datetime: Some(arrival),
            departure_station: "London Euston".to_string(),
            arrival_destination: "Manchester Piccadilly".to_string(),
            route: "London Euston to Manchester Piccadilly".to_string(),
            ticket_class: class.to_string(),
            ticket_type: ticket_type.to_string(),
            purchase_type: purchase_type.to_string(),
            journey_status: status.to_string(),
            railcard: "None".to_string(),
            reason_for_delay: "On Time".to_string(),
            price: 25.0,
            departure_hour: Some(8),
            delay_minutes: Some(0.0),
        }
    }
}
