//! Confidence bucketing of realized outcomes.

use crate::outcome::TradeOutcome;
use serde::{Deserialize, Serialize};

/// Number of equal-width confidence bands.
pub const NUM_BUCKETS: usize = 10;

/// Outcomes observed within one confidence band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceBucket {
    /// Lower bound of the band (inclusive).
    pub min_confidence: f64,
    /// Upper bound of the band (exclusive, except the last which is inclusive).
    pub max_confidence: f64,
    /// Outcomes in the band.
    pub outcomes: Vec<TradeOutcome>,
    /// Fraction of winners (0 when empty).
    pub win_rate: f64,
    /// Number of outcomes in the band.
    pub count: usize,
}

impl ConfidenceBucket {
    fn empty(min_confidence: f64, max_confidence: f64) -> Self {
        Self {
            min_confidence,
            max_confidence,
            outcomes: Vec::new(),
            win_rate: 0.0,
            count: 0,
        }
    }

    /// Midpoint of the raw confidence range.
    pub fn midpoint(&self) -> f64 {
        (self.min_confidence + self.max_confidence) / 2.0
    }

    fn recompute(&mut self) {
        self.count = self.outcomes.len();
        self.win_rate = if self.count == 0 {
            0.0
        } else {
            self.outcomes.iter().filter(|o| o.is_winner).count() as f64 / self.count as f64
        };
    }
}

/// Partition outcomes into the ten fixed confidence bands and compute the
/// empirical win rate per band.
///
/// The output always has length [`NUM_BUCKETS`]; empty bands are kept as
/// placeholders so downstream pooling can skip them explicitly.
pub fn bucketize(outcomes: &[TradeOutcome]) -> Vec<ConfidenceBucket> {
    let width = 1.0 / NUM_BUCKETS as f64;
    let mut buckets: Vec<ConfidenceBucket> = (0..NUM_BUCKETS)
        .map(|i| ConfidenceBucket::empty(i as f64 * width, (i + 1) as f64 * width))
        .collect();

    for outcome in outcomes {
        // A confidence of exactly 1.0 lands in the closed top band.
        let idx = ((outcome.confidence / width).floor() as usize).min(NUM_BUCKETS - 1);
        buckets[idx].outcomes.push(outcome.clone());
    }

    for bucket in &mut buckets {
        bucket.recompute();
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_ten_buckets() {
        let buckets = bucketize(&[]);
        assert_eq!(buckets.len(), NUM_BUCKETS);
        assert!(buckets.iter().all(|b| b.count == 0 && b.win_rate == 0.0));
        assert!((buckets[0].min_confidence).abs() < f64::EPSILON);
        assert!((buckets[9].max_confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_band_assignment() {
        let outcomes = vec![
            TradeOutcome::new(0.05, 1.0),
            TradeOutcome::new(0.65, -1.0),
            TradeOutcome::new(0.69, 2.0),
            TradeOutcome::new(0.95, 3.0),
        ];

        let buckets = bucketize(&outcomes);
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[6].count, 2);
        assert_eq!(buckets[9].count, 1);
        assert!((buckets[6].win_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_top_band_is_closed() {
        let outcomes = vec![TradeOutcome::new(1.0, 1.0)];
        let buckets = bucketize(&outcomes);
        assert_eq!(buckets[9].count, 1);
    }

    #[test]
    fn test_band_boundary_is_half_open() {
        // 0.5 belongs to [0.5, 0.6), not [0.4, 0.5)
        let outcomes = vec![TradeOutcome::new(0.5, 1.0)];
        let buckets = bucketize(&outcomes);
        assert_eq!(buckets[4].count, 0);
        assert_eq!(buckets[5].count, 1);
    }

    #[test]
    fn test_win_rate_per_band() {
        let outcomes = vec![
            TradeOutcome::new(0.45, 1.0),
            TradeOutcome::new(0.42, 2.0),
            TradeOutcome::new(0.48, -1.0),
            TradeOutcome::new(0.41, -2.0),
        ];

        let buckets = bucketize(&outcomes);
        assert_eq!(buckets[4].count, 4);
        assert!((buckets[4].win_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_midpoint() {
        let buckets = bucketize(&[]);
        assert!((buckets[7].midpoint() - 0.75).abs() < 1e-12);
    }
}
