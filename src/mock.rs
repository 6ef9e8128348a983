//! Placeholder OSINT figures for the daily report.
//!
//! Nothing here is collected from anywhere: every value is drawn at random
//! from a fixed range so the report has numbers to show.

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;

/// Statements one of which is quoted in each report.
pub const STATEMENTS: [&str; 3] = [
    "Denies atrocities in Rakhine",
    "Claims election fair",
    "Accuses US destabilization",
];

pub const RISK_LEVEL_RANGE: RangeInclusive<f64> = 8.5..=9.7;
pub const SENTIMENT_RANGE: RangeInclusive<u8> = 80..=95;
pub const COUNTER_POINTS_RANGE: RangeInclusive<u32> = 5..=15;
pub const ALIGNMENT_RANGE: RangeInclusive<f64> = 0.85..=0.98;

/// One run's worth of mock figures.
#[derive(Clone, Debug, PartialEq)]
pub struct MockRecord {
    pub statement: &'static str,
    /// Rounded to one decimal place.
    pub risk_level: f64,
    pub sentiment_percent: u8,
    pub counter_points: u32,
    /// Rounded to three decimal places.
    pub alignment_score: f64,
}

impl MockRecord {
    /// Draws a fresh record from `rng`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let statement = STATEMENTS
            .choose(rng)
            .copied()
            .unwrap_or(STATEMENTS[0]);

        Self {
            statement,
            risk_level: round_to(rng.gen_range(RISK_LEVEL_RANGE), 1),
            sentiment_percent: rng.gen_range(SENTIMENT_RANGE),
            counter_points: rng.gen_range(COUNTER_POINTS_RANGE),
            alignment_score: round_to(rng.gen_range(ALIGNMENT_RANGE), 3),
        }
    }

    /// Sentiment as shown in the report, e.g. `87%`.
    pub fn sentiment_display(&self) -> String {
        format!("{}%", self.sentiment_percent)
    }
}

/// Rounds `value` to `places` decimal digits.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn has_at_most_places(value: f64, places: u32) -> bool {
        (round_to(value, places) - value).abs() < 1e-12
    }

    #[test]
    fn samples_stay_in_range_and_rounded() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let record = MockRecord::generate(&mut rng);
            assert!(STATEMENTS.contains(&record.statement));
            assert!((8.5..=9.7).contains(&record.risk_level), "{record:?}");
            assert!(has_at_most_places(record.risk_level, 1), "{record:?}");
            assert!((80..=95).contains(&record.sentiment_percent));
            assert!((5..=15).contains(&record.counter_points));
            assert!((0.85..=0.98).contains(&record.alignment_score), "{record:?}");
            assert!(has_at_most_places(record.alignment_score, 3), "{record:?}");
        }
    }

    #[test]
    fn every_statement_eventually_appears() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 3];
        for _ in 0..500 {
            let record = MockRecord::generate(&mut rng);
            let index = STATEMENTS
                .iter()
                .position(|s| *s == record.statement)
                .expect("known statement");
            seen[index] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn sentiment_is_shown_as_percentage() {
        let record = MockRecord {
            statement: STATEMENTS[1],
            risk_level: 9.1,
            sentiment_percent: 87,
            counter_points: 9,
            alignment_score: 0.912,
        };
        assert_eq!(record.sentiment_display(), "87%");
    }

    #[test]
    fn round_to_behaves_like_decimal_rounding() {
        assert_eq!(round_to(9.66, 1), 9.7);
        assert_eq!(round_to(0.87649, 3), 0.876);
        assert_eq!(round_to(8.5, 1), 8.5);
    }
}
