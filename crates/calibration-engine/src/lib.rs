//! Confidence Calibration Engine
//!
//! Converts a model's raw, self-reported confidence score for a trade
//! recommendation into a calibrated probability-of-success estimate
//! grounded in realized historical outcomes.
//!
//! The pipeline: trade history is paired into realized outcomes
//! ([`outcome`]), grouped into fixed confidence bands ([`bucket`]), pooled
//! toward a monotonic win-rate relationship ([`isotonic`]), and emitted as
//! a sparse piecewise-linear curve ([`curve`]) that maps new raw scores by
//! interpolation. [`stats`] supplies the correlation and win-rate
//! diagnostics used to gate and report on the fit, and [`service`]
//! orchestrates the whole lifecycle against an injected [`store`].

pub mod bucket;
pub mod curve;
pub mod isotonic;
pub mod outcome;
pub mod service;
pub mod stats;
pub mod store;
pub mod validation;

pub use bucket::{bucketize, ConfidenceBucket, NUM_BUCKETS};
pub use curve::{apply_calibration, build_curve, CalibrationData, CalibrationPoint};
pub use isotonic::pool_adjacent_violators;
pub use outcome::{derive_outcomes, TradeOutcome};
pub use service::{
    CalibrationConfig, CalibrationHealth, CalibrationService, DEFAULT_STALE_AGE_DAYS,
};
pub use stats::{median, pearson_correlation, win_rate_split, WinRateSplit};
pub use store::{CalibrationStore, MemoryCalibrationStore, PgCalibrationStore, StoredCalibration};
pub use validation::{build_validation_report, ValidationReport};
