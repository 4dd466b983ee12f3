use anyhow::{Context, Result};

use bus_eda::data::loader::COLUMN_MAP;

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Index drawn with the given relative weights.
    fn weighted(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let mut target = self.next_f64() * total;
        for (i, w) in weights.iter().enumerate() {
            if target < *w {
                return i;
            }
            target -= w;
        }
        weights.len() - 1
    }
}

const ROUTES: [&str; 14] = [
    "BLR-CHN", "BLR-HYD", "BLR-GOA", "CHN-MDU", "CHN-CBE", "HYD-VJA", "MUM-PUN",
    "MUM-GOA", "DEL-JAI", "DEL-AGR", "PUN-NGP", "KOL-BBS", "AHD-SUR", "CBE-KOC",
];
const CATEGORIES: [(&str, f64); 4] = [
    ("AC Sleeper", 1450.0),
    ("Non-AC Sleeper", 900.0),
    ("AC Seater", 800.0),
    ("Non-AC Seater", 550.0),
];
const TIMES: [&str; 4] = ["Morning", "Afternoon", "Evening", "Night"];
const GENDERS: [&str; 2] = ["Male", "Female"];
const AGE_GROUPS: [&str; 5] = ["18-25", "26-35", "36-45", "46-60", "60+"];

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Final_bus.csv".to_string());
    let rows: usize = 2_000;
    let mut rng = SimpleRng::new(42);

    let mut wtr = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let mut header: Vec<&str> = vec!["Booking ID"];
    header.extend(COLUMN_MAP.iter().map(|(source, _)| *source));
    wtr.write_record(&header).context("writing header")?;

    // Earlier routes are busier
    let route_weights: Vec<f64> = (0..ROUTES.len()).map(|i| 1.0 / (i as f64 + 1.0)).collect();

    for id in 0..rows {
        let route = ROUTES[rng.weighted(&route_weights)];
        let (category, base_fare) = CATEGORIES[rng.weighted(&[1.0, 2.0, 2.0, 1.5])];
        let seat_fare = (base_fare * (0.8 + 0.4 * rng.next_f64())).round();
        let seats = 1 + rng.weighted(&[6.0, 3.0, 1.0, 0.5]);
        let total = seat_fare * seats as f64;

        // A few malformed cells the loader has to repair
        let fare_cell = match id % 97 {
            13 => "n/a".to_string(),
            41 => String::new(),
            _ => format!("{seat_fare}"),
        };

        wtr.write_record([
            format!("B{id:05}"),
            route.to_string(),
            category.to_string(),
            rng.pick(&TIMES).to_string(),
            fare_cell,
            format!("{total}"),
            rng.pick(&GENDERS).to_string(),
            rng.pick(&AGE_GROUPS).to_string(),
        ])
        .with_context(|| format!("writing row {id}"))?;
    }
    wtr.flush().context("flushing output")?;

    println!("Wrote {rows} bus ticket rows to {output_path}");
    Ok(())
}
