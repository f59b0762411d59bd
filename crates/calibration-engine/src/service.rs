//! Calibration lifecycle management.
//!
//! Orchestrates outcome derivation, bucketing, isotonic pooling, curve
//! construction, and persistence against an injected storage handle, and
//! judges the health of stored calibrations from their age and correlation.

use crate::bucket::bucketize;
use crate::curve::{apply_calibration, build_curve, CalibrationData};
use crate::isotonic::pool_adjacent_violators;
use crate::outcome::derive_outcomes;
use crate::stats::{pearson_correlation, win_rate_split};
use crate::store::CalibrationStore;
use crate::validation::{build_validation_report, ValidationReport};
use advisor_core::{Error, Result, TradeRecord};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default maximum age in days before a calibration counts as stale.
pub const DEFAULT_STALE_AGE_DAYS: i64 = 7;

/// Tunable thresholds for calibration computation and health checks.
#[derive(Debug, Clone)]
pub struct CalibrationConfig {
    /// Minimum directional records required for a statistically meaningful fit.
    pub min_sample_size: usize,
    /// Raw-score threshold separating high- from low-confidence calls.
    pub high_conf_threshold: f64,
    /// Correlation below this demands recalibration.
    pub min_correlation: f64,
    /// Correlation at or below this (but above the minimum) is a warning.
    pub warn_correlation: f64,
    /// Age in days at which a curve becomes a warning.
    pub warn_age_days: i64,
    /// Age in days past which a curve must be recomputed.
    pub max_age_days: i64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            min_sample_size: 10,
            high_conf_threshold: 0.7,
            min_correlation: 0.1,
            warn_correlation: 0.2,
            warn_age_days: 7,
            max_age_days: 14,
        }
    }
}

/// Health of the latest stored calibration for a market, computed on read
/// from its age and stored correlation. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationHealth {
    /// No calibration record exists for the market.
    Missing,
    Healthy,
    Warning,
    NeedsRecalibration,
}

/// Lifecycle manager for confidence calibrations.
pub struct CalibrationService<S> {
    store: S,
    config: CalibrationConfig,
}

impl<S: CalibrationStore> CalibrationService<S> {
    /// Create a service with default thresholds.
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: CalibrationConfig::default(),
        }
    }

    /// Create a service with explicit thresholds.
    pub fn with_config(store: S, config: CalibrationConfig) -> Self {
        Self { store, config }
    }

    /// Fit a calibration curve from the market's directional trade history
    /// in `[now - window_days, now]`. Does not persist.
    pub async fn compute_calibration(
        &self,
        market: &str,
        window_days: i64,
    ) -> Result<CalibrationData> {
        let since = Utc::now() - Duration::days(window_days);
        let records = self.store.trade_records(market, since).await?;
        let directional: Vec<TradeRecord> = records
            .into_iter()
            .filter(|r| r.action.is_directional())
            .collect();

        if directional.len() < self.config.min_sample_size {
            return Err(Error::InsufficientData {
                found: directional.len(),
                required: self.config.min_sample_size,
            });
        }

        let outcomes = derive_outcomes(&directional)?;
        let pooled = pool_adjacent_violators(bucketize(&outcomes));
        let points = build_curve(&pooled);

        let confidences: Vec<f64> = outcomes.iter().map(|o| o.confidence).collect();
        let pnls: Vec<f64> = outcomes.iter().map(|o| o.pnl_percent).collect();
        let correlation = pearson_correlation(&confidences, &pnls);
        let split = win_rate_split(&outcomes, self.config.high_conf_threshold);

        info!(
            market = %market,
            window_days,
            sample_size = outcomes.len(),
            correlation,
            points = points.len(),
            "Computed calibration curve"
        );

        Ok(CalibrationData {
            market: market.to_string(),
            window_days,
            points,
            sample_size: outcomes.len(),
            correlation,
            high_conf_win_rate: split.high_win_rate,
            low_conf_win_rate: split.low_win_rate,
        })
    }

    /// Persist a calibration as a new immutable history row.
    pub async fn save_calibration(&self, data: &CalibrationData) -> Result<i64> {
        let id = self.store.insert_calibration(data).await?;
        info!(market = %data.market, id, "Saved calibration record");
        Ok(id)
    }

    /// Most recent calibration curve for the market, if any.
    pub async fn latest_calibration(&self, market: &str) -> Result<Option<CalibrationData>> {
        Ok(self
            .store
            .latest_calibration(market)
            .await?
            .map(|stored| stored.data))
    }

    /// Map a raw confidence score through a calibration curve. Never fails;
    /// degenerate curves degrade to passthrough.
    pub fn apply_calibration(&self, raw_score: f64, data: &CalibrationData) -> f64 {
        apply_calibration(raw_score, data)
    }

    /// Health of the market's latest calibration.
    pub async fn calibration_health(&self, market: &str) -> Result<CalibrationHealth> {
        let Some(stored) = self.store.latest_calibration(market).await? else {
            return Ok(CalibrationHealth::Missing);
        };

        let age_days = (Utc::now() - stored.created_at).num_days();
        let correlation = stored.data.correlation;

        // Worst case wins: recalibration beats warning.
        let health = if correlation < self.config.min_correlation
            || age_days > self.config.max_age_days
        {
            CalibrationHealth::NeedsRecalibration
        } else if correlation <= self.config.warn_correlation
            || age_days >= self.config.warn_age_days
        {
            CalibrationHealth::Warning
        } else {
            CalibrationHealth::Healthy
        };

        debug!(market = %market, age_days, correlation, ?health, "Checked calibration health");
        Ok(health)
    }

    /// Whether the latest calibration is older than `max_age_days`, or
    /// missing entirely.
    pub async fn is_calibration_stale(&self, market: &str, max_age_days: i64) -> Result<bool> {
        Ok(match self.store.latest_calibration(market).await? {
            Some(stored) => (Utc::now() - stored.created_at).num_days() > max_age_days,
            None => true,
        })
    }

    /// Re-score the market's recent history through an existing curve and
    /// report raw-vs-calibrated diagnostics.
    pub async fn validate_calibration(
        &self,
        data: &CalibrationData,
        window_days: i64,
    ) -> Result<ValidationReport> {
        let since = Utc::now() - Duration::days(window_days);
        let records = self.store.trade_records(&data.market, since).await?;
        let directional: Vec<TradeRecord> = records
            .into_iter()
            .filter(|r| r.action.is_directional())
            .collect();

        if directional.len() < self.config.min_sample_size {
            return Err(Error::InsufficientData {
                found: directional.len(),
                required: self.config.min_sample_size,
            });
        }

        let outcomes = derive_outcomes(&directional)?;
        Ok(build_validation_report(
            &outcomes,
            data,
            self.config.high_conf_threshold,
        ))
    }
}
