//! Calibration curve construction and application.

use crate::bucket::ConfidenceBucket;
use serde::{Deserialize, Serialize};

/// One breakpoint of the piecewise-linear calibration curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub raw_confidence: f64,
    pub calibrated_confidence: f64,
}

/// A calibration curve together with its fit diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationData {
    pub market: String,
    /// Lookback window the curve was fitted over.
    pub window_days: i64,
    /// Breakpoints ordered ascending by raw confidence, with non-decreasing
    /// calibrated values.
    pub points: Vec<CalibrationPoint>,
    /// Number of realized outcomes the curve was fitted on.
    pub sample_size: usize,
    /// Pearson correlation between raw confidence and PnL% at fit time.
    pub correlation: f64,
    /// Win rate of high-confidence calls at fit time.
    pub high_conf_win_rate: f64,
    /// Win rate of low-confidence calls at fit time.
    pub low_conf_win_rate: f64,
}

impl CalibrationData {
    /// A curve carrying points only, for inference-time application.
    pub fn from_points(market: &str, points: Vec<CalibrationPoint>) -> Self {
        Self {
            market: market.to_string(),
            window_days: 0,
            points,
            sample_size: 0,
            correlation: 0.0,
            high_conf_win_rate: 0.0,
            low_conf_win_rate: 0.0,
        }
    }
}

/// Convert the pooled monotonic bucket sequence into the sparse
/// piecewise-linear calibration curve.
///
/// The curve is anchored at (0, 0); each surviving bucket contributes one
/// point at its midpoint raw confidence; the final point is pinned to raw
/// 1.0 carrying the last calibrated value forward (flat beyond observed
/// data, never extrapolated upward).
pub fn build_curve(pooled: &[ConfidenceBucket]) -> Vec<CalibrationPoint> {
    let mut points = vec![CalibrationPoint {
        raw_confidence: 0.0,
        calibrated_confidence: 0.0,
    }];

    for bucket in pooled {
        points.push(CalibrationPoint {
            raw_confidence: bucket.midpoint(),
            calibrated_confidence: bucket.win_rate.clamp(0.0, 1.0),
        });
    }

    if let Some(last) = points.last().copied() {
        if last.raw_confidence < 1.0 {
            points.push(CalibrationPoint {
                raw_confidence: 1.0,
                calibrated_confidence: last.calibrated_confidence,
            });
        }
    }

    points
}

/// Map a raw confidence score through the calibration curve.
///
/// The input is clamped to [0, 1]. An empty curve passes the score through
/// unchanged (no calibration available is not an error); a single-point
/// curve returns its value regardless of input. Scores landing exactly on
/// a breakpoint return that breakpoint's value; anything else is linearly
/// interpolated between the bracketing pair. Never fails.
pub fn apply_calibration(raw_score: f64, data: &CalibrationData) -> f64 {
    let score = raw_score.clamp(0.0, 1.0);
    let points = &data.points;

    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return score,
    };
    if points.len() == 1 {
        return first.calibrated_confidence;
    }
    if score <= first.raw_confidence {
        return first.calibrated_confidence;
    }
    if score >= last.raw_confidence {
        return last.calibrated_confidence;
    }

    // Exact breakpoint hits must not pick up interpolation error.
    for point in points {
        if score == point.raw_confidence {
            return point.calibrated_confidence;
        }
    }

    for pair in points.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        if score < lower.raw_confidence || score > upper.raw_confidence {
            continue;
        }
        // Zero-width interval from duplicate breakpoints
        if upper.raw_confidence == lower.raw_confidence {
            return lower.calibrated_confidence;
        }
        let t = (score - lower.raw_confidence) / (upper.raw_confidence - lower.raw_confidence);
        let calibrated = lower.calibrated_confidence
            + t * (upper.calibrated_confidence - lower.calibrated_confidence);
        return calibrated.clamp(0.0, 1.0);
    }

    last.calibrated_confidence
}
