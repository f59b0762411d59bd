//! Persistence seam for trade history and calibration curves.
//!
//! The storage handle is injected explicitly into the service (no global
//! connection state); `PgCalibrationStore` is the production backend and
//! `MemoryCalibrationStore` backs tests and dry runs.

use crate::curve::{CalibrationData, CalibrationPoint};
use advisor_core::{Error, Result, TradeAction, TradeRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tokio::sync::Mutex;
use tracing::debug;

/// A calibration curve as persisted, with its history metadata.
#[derive(Debug, Clone)]
pub struct StoredCalibration {
    /// Record identifier.
    pub id: i64,
    /// Creation time of the record (distinct from the data window it covers).
    pub created_at: DateTime<Utc>,
    pub data: CalibrationData,
}

/// Storage collaborator for the calibration lifecycle.
///
/// Implementations must return trade records in ascending timestamp order;
/// the engine does not sort. Calibration records are append-only: inserts
/// never overwrite prior history, and "latest" is resolved by creation
/// timestamp at read time.
#[async_trait]
pub trait CalibrationStore: Send + Sync {
    /// Trade records for a market from `since` onward, ascending by timestamp.
    async fn trade_records(
        &self,
        market: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<TradeRecord>>;

    /// Append a new calibration record and return its id.
    async fn insert_calibration(&self, data: &CalibrationData) -> Result<i64>;

    /// Most recent calibration record for the market by creation time.
    async fn latest_calibration(&self, market: &str) -> Result<Option<StoredCalibration>>;
}

/// PostgreSQL-backed calibration store.
pub struct PgCalibrationStore {
    pool: PgPool,
}

impl PgCalibrationStore {
    /// Create a new store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_stored(row: &sqlx::postgres::PgRow) -> Result<StoredCalibration> {
        let curve: String = row.get("curve");
        let points: Vec<CalibrationPoint> = serde_json::from_str(&curve)?;
        let sample_size: i64 = row.get("sample_size");

        Ok(StoredCalibration {
            id: row.get("id"),
            created_at: row.get("created_at"),
            data: CalibrationData {
                market: row.get("market"),
                window_days: row.get("window_days"),
                points,
                sample_size: sample_size as usize,
                correlation: row.get("correlation"),
                high_conf_win_rate: row.get("high_conf_win_rate"),
                low_conf_win_rate: row.get("low_conf_win_rate"),
            },
        })
    }
}

#[async_trait]
impl CalibrationStore for PgCalibrationStore {
    async fn trade_records(
        &self,
        market: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<TradeRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT timestamp, market, price, action, raw_confidence
            FROM trade_records
            WHERE market = $1 AND timestamp >= $2
            ORDER BY timestamp ASC
            "#,
        )
        .bind(market)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let action_id: i16 = row.get("action");
            let action = TradeAction::from_i16(action_id).ok_or_else(|| Error::MalformedRecord {
                market: market.to_string(),
                message: format!("unknown action code {}", action_id),
            })?;

            records.push(TradeRecord {
                timestamp: row.get("timestamp"),
                market: row.get("market"),
                price: row.get("price"),
                action,
                raw_confidence: row.get("raw_confidence"),
            });
        }

        debug!(market = %market, count = records.len(), "Fetched trade records");
        Ok(records)
    }

    async fn insert_calibration(&self, data: &CalibrationData) -> Result<i64> {
        let curve = serde_json::to_string(&data.points)?;

        let row = sqlx::query(
            r#"
            INSERT INTO confidence_calibrations (
                market, window_days, curve, sample_size,
                correlation, high_conf_win_rate, low_conf_win_rate, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING id
            "#,
        )
        .bind(&data.market)
        .bind(data.window_days)
        .bind(&curve)
        .bind(data.sample_size as i64)
        .bind(data.correlation)
        .bind(data.high_conf_win_rate)
        .bind(data.low_conf_win_rate)
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = row.get("id");
        debug!(market = %data.market, id, "Inserted calibration record");
        Ok(id)
    }

    async fn latest_calibration(&self, market: &str) -> Result<Option<StoredCalibration>> {
        let row = sqlx::query(
            r#"
            SELECT id, created_at, market, window_days, curve, sample_size,
                   correlation, high_conf_win_rate, low_conf_win_rate
            FROM confidence_calibrations
            WHERE market = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(market)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::row_to_stored(&r)).transpose()
    }
}

/// In-memory calibration store for tests and dry runs.
#[derive(Default)]
pub struct MemoryCalibrationStore {
    trades: Mutex<Vec<TradeRecord>>,
    calibrations: Mutex<Vec<StoredCalibration>>,
}

impl MemoryCalibrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed trade history.
    pub async fn push_trades(&self, records: Vec<TradeRecord>) {
        self.trades.lock().await.extend(records);
    }

    /// Insert a calibration with an explicit creation time (history backfill).
    pub async fn insert_calibration_at(
        &self,
        data: &CalibrationData,
        created_at: DateTime<Utc>,
    ) -> i64 {
        let mut calibrations = self.calibrations.lock().await;
        let id = calibrations.len() as i64 + 1;
        calibrations.push(StoredCalibration {
            id,
            created_at,
            data: data.clone(),
        });
        id
    }
}

#[async_trait]
impl CalibrationStore for MemoryCalibrationStore {
    async fn trade_records(
        &self,
        market: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<TradeRecord>> {
        let mut records: Vec<TradeRecord> = self
            .trades
            .lock()
            .await
            .iter()
            .filter(|r| r.market == market && r.timestamp >= since)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.timestamp);
        Ok(records)
    }

    async fn insert_calibration(&self, data: &CalibrationData) -> Result<i64> {
        Ok(self.insert_calibration_at(data, Utc::now()).await)
    }

    async fn latest_calibration(&self, market: &str) -> Result<Option<StoredCalibration>> {
        Ok(self
            .calibrations
            .lock()
            .await
            .iter()
            .filter(|c| c.data.market == market)
            .max_by_key(|c| (c.created_at, c.id))
            .cloned())
    }
}
