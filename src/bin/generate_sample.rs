use chrono::{Duration, NaiveDate, NaiveTime};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

const ROUTES: [(&str, &str, f64); 8] = [
    ("London Euston", "Manchester Piccadilly", 65.0),
    ("London Kings Cross", "York", 55.0),
    ("London Paddington", "Reading", 18.0),
    ("Liverpool Lime Street", "Manchester Piccadilly", 12.0),
    ("Birmingham New Street", "London Euston", 45.0),
    ("Manchester Piccadilly", "Leeds", 16.0),
    ("Edinburgh Waverley", "Glasgow Queen Street", 14.0),
    ("Reading", "London Paddington", 18.0),
];

const TICKET_CLASSES: [&str; 2] = ["Standard", "First Class"];
const TICKET_TYPES: [&str; 3] = ["Advance", "Off-Peak", "Anytime"];
const PURCHASE_TYPES: [&str; 2] = ["Online", "Station"];
const RAILCARDS: [&str; 3] = ["Adult", "Senior", "Disabled"];
const DELAY_REASONS: [&str; 5] = [
    "Signal Failure",
    "Weather Conditions",
    "Technical Issue",
    "Staff Shortage",
    "Congestion",
];

fn main() {
    let mut rng = SimpleRng::new(42);
    let n_rows = 500;

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    std::fs::create_dir_all("data").expect("Failed to create data directory");
    let mut writer = csv::Writer::from_path("data/railway_journeys.csv")
        .expect("Failed to create output file");
    writer
        .write_record([
            "Date of Purchase",
            "Date of Journey",
            "Departure Time",
            "Arrival Time",
            "Actual Arrival Time",
            "Departure Station",
            "Arrival Destination",
            "Railcard",
            "Reason for Delay",
            "Ticket Class",
            "Ticket Type",
            "Purchase Type",
            "Journey Status",
            "Price",
        ])
        .expect("Failed to write header");

    for row in 0..n_rows {
        let &(departure, destination, base_price) = rng.pick(&ROUTES);

        let journey_date = start + Duration::days(rng.below(120) as i64);
        let purchase_date = journey_date - Duration::days(rng.below(30) as i64);

        // Morning and evening rush dominate.
        let hour = match rng.below(10) {
            0..=3 => 6 + rng.below(3) as u32,
            4..=7 => 16 + rng.below(3) as u32,
            _ => rng.below(24) as u32,
        };
        let minute = (rng.below(12) * 5) as u32;
        let dep = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
        let arr = dep + Duration::minutes(30 + rng.below(90) as i64);

        // One journey in five runs late, one in twenty-five is cancelled.
        let (status, delay, reason) = match rng.below(25) {
            0 => ("Cancelled", 0, Some(*rng.pick(&DELAY_REASONS))),
            1..=5 => (
                "Delayed",
                5 + rng.below(40) as i64,
                Some(*rng.pick(&DELAY_REASONS)),
            ),
            _ => ("On Time", 0, None),
        };
        let actual = arr + Duration::minutes(delay);

        // A malformed clock value now and then; the loader tolerates it.
        let actual_text = if rng.below(100) == 0 {
            "--:--".to_string()
        } else {
            actual.format("%H:%M:%S").to_string()
        };

        // Both date forms appear in the same column.
        let mut date_text = |d: NaiveDate| {
            if rng.next_f64() < 0.5 {
                d.format("%Y-%m-%d").to_string()
            } else {
                d.format("%m/%d/%Y").to_string()
            }
        };
        let purchase_text = date_text(purchase_date);
        let journey_text = date_text(journey_date);

        let class = *rng.pick(&TICKET_CLASSES);
        let class_factor = if class == "First Class" { 1.8 } else { 1.0 };
        let mut price = base_price * class_factor * (0.7 + 0.6 * rng.next_f64());
        // A handful of fat-finger prices for the outlier pass to drop.
        if row % 97 == 0 {
            price *= 20.0;
        }

        // Roughly a third of passengers carry a railcard.
        let railcard = if rng.below(3) == 0 {
            *rng.pick(&RAILCARDS)
        } else {
            ""
        };

        writer
            .write_record([
                purchase_text.as_str(),
                journey_text.as_str(),
                dep.format("%H:%M:%S").to_string().as_str(),
                arr.format("%H:%M:%S").to_string().as_str(),
                actual_text.as_str(),
                departure,
                destination,
                railcard,
                reason.unwrap_or(""),
                class,
                *rng.pick(&TICKET_TYPES),
                *rng.pick(&PURCHASE_TYPES),
                status,
                format!("{price:.2}").as_str(),
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {n_rows} journeys to data/railway_journeys.csv");
}
