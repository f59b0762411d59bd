//! DeFi Advisor: portfolio aggregation and AI trade recommendations
//!
//! This is the root crate that provides benchmark access to the internal
//! modules. For actual functionality, use the individual crates directly:
//!
//! - `advisor-core`: shared types, configuration, database models
//! - `calibration-engine`: confidence calibration engine and the
//!   `calibrate` maintenance script

// Re-export for benchmarks
pub use advisor_core as core;
pub use calibration_engine as calibration;
