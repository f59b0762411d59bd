//! Correlation and win-rate analytics over realized outcomes.

use crate::outcome::TradeOutcome;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution, OrderStatistics};

/// Win rates either side of a confidence threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WinRateSplit {
    pub high_win_rate: f64,
    pub low_win_rate: f64,
    pub high_count: usize,
    pub low_count: usize,
}

impl WinRateSplit {
    /// High-minus-low win-rate gap. A well-ordered model wins more often on
    /// its confident calls.
    pub fn gap(&self) -> f64 {
        self.high_win_rate - self.low_win_rate
    }
}

/// Pearson product-moment correlation coefficient.
///
/// Returns 0.0 for degenerate input: fewer than two paired samples, or zero
/// variance in either series.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }

    let x_data = Data::new(xs[..n].to_vec());
    let y_data = Data::new(ys[..n].to_vec());
    let (Some(mean_x), Some(mean_y)) = (x_data.mean(), y_data.mean()) else {
        return 0.0;
    };
    let (Some(std_x), Some(std_y)) = (x_data.std_dev(), y_data.std_dev()) else {
        return 0.0;
    };
    if std_x == 0.0 || std_y == 0.0 || !std_x.is_finite() || !std_y.is_finite() {
        return 0.0;
    }

    let covariance = xs[..n]
        .iter()
        .zip(&ys[..n])
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum::<f64>()
        / (n - 1) as f64;

    (covariance / (std_x * std_y)).clamp(-1.0, 1.0)
}

/// Median of the samples; 0.0 when empty.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut data = Data::new(values.to_vec());
    data.median()
}

/// Partition outcomes at a confidence threshold and compute the win rate on
/// each side.
///
/// Raw scores are conventionally split at a fixed threshold (0.7);
/// calibrated scores cluster near observed win rates rather than near 0/1,
/// so callers split those at the median instead. The threshold is a
/// parameter for exactly that reason.
pub fn win_rate_split(outcomes: &[TradeOutcome], threshold: f64) -> WinRateSplit {
    let (high, low): (Vec<&TradeOutcome>, Vec<&TradeOutcome>) =
        outcomes.iter().partition(|o| o.confidence >= threshold);

    WinRateSplit {
        high_win_rate: win_rate(&high),
        low_win_rate: win_rate(&low),
        high_count: high.len(),
        low_count: low.len(),
    }
}

fn win_rate(outcomes: &[&TradeOutcome]) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    outcomes.iter().filter(|o| o.is_winner).count() as f64 / outcomes.len() as f64
}
