//! Retroactive validation of a calibration curve against realized history.

use crate::curve::{apply_calibration, CalibrationData};
use crate::outcome::TradeOutcome;
use crate::stats::{median, pearson_correlation, win_rate_split, WinRateSplit};
use serde::{Deserialize, Serialize};

/// Raw-vs-calibrated diagnostics for one market window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub market: String,
    /// Number of realized outcomes re-scored.
    pub sample_size: usize,
    /// Pearson correlation between raw confidence and PnL%.
    pub raw_correlation: f64,
    /// Pearson correlation between calibrated confidence and PnL%.
    pub calibrated_correlation: f64,
    /// Split of raw scores at the fixed high-confidence threshold.
    pub raw_split: WinRateSplit,
    /// Split of calibrated scores at their median. Calibrated scores
    /// cluster near observed win rates rather than near 0/1, so a fixed
    /// threshold would put everything on one side.
    pub calibrated_split: WinRateSplit,
    /// The median calibrated score used for the split above.
    pub median_calibrated: f64,
}

impl ValidationReport {
    /// Correlation change from applying the calibration.
    pub fn correlation_lift(&self) -> f64 {
        self.calibrated_correlation - self.raw_correlation
    }
}

/// Build the report from already-derived outcomes re-scored through `data`.
pub fn build_validation_report(
    outcomes: &[TradeOutcome],
    data: &CalibrationData,
    raw_threshold: f64,
) -> ValidationReport {
    let pnls: Vec<f64> = outcomes.iter().map(|o| o.pnl_percent).collect();
    let raw_scores: Vec<f64> = outcomes.iter().map(|o| o.confidence).collect();
    let calibrated_scores: Vec<f64> = raw_scores
        .iter()
        .map(|&score| apply_calibration(score, data))
        .collect();

    let calibrated_outcomes: Vec<TradeOutcome> = outcomes
        .iter()
        .zip(&calibrated_scores)
        .map(|(outcome, &calibrated)| TradeOutcome {
            confidence: calibrated,
            pnl_percent: outcome.pnl_percent,
            is_winner: outcome.is_winner,
        })
        .collect();

    let median_calibrated = median(&calibrated_scores);

    ValidationReport {
        market: data.market.clone(),
        sample_size: outcomes.len(),
        raw_correlation: pearson_correlation(&raw_scores, &pnls),
        calibrated_correlation: pearson_correlation(&calibrated_scores, &pnls),
        raw_split: win_rate_split(outcomes, raw_threshold),
        calibrated_split: win_rate_split(&calibrated_outcomes, median_calibrated),
        median_calibrated,
    }
}
