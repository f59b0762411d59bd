//! Realized outcome derivation from consecutive trade recommendations.

use advisor_core::{Error, Result, TradeAction, TradeRecord};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Realized outcome of a single directional recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeOutcome {
    /// Raw confidence of the entry recommendation.
    pub confidence: f64,
    /// Percentage PnL realized between entry and the next recommendation.
    pub pnl_percent: f64,
    /// Whether the outcome was profitable. Break-even counts as a loss.
    pub is_winner: bool,
}

impl TradeOutcome {
    pub fn new(confidence: f64, pnl_percent: f64) -> Self {
        Self {
            confidence,
            pnl_percent,
            is_winner: pnl_percent > 0.0,
        }
    }
}

/// Pair each recommendation with the next one for the same market and
/// compute the realized percentage PnL.
///
/// The input must already be filtered to directional actions for a single
/// market and ordered ascending by timestamp; both are caller-guaranteed
/// preconditions. Produces `n - 1` outcomes for `n` input records: record
/// `i` opens the position, record `i + 1` closes it. The confidence
/// attached to each outcome is the entry record's raw score.
pub fn derive_outcomes(records: &[TradeRecord]) -> Result<Vec<TradeOutcome>> {
    let mut outcomes = Vec::with_capacity(records.len().saturating_sub(1));

    for pair in records.windows(2) {
        let entry = &pair[0];
        let exit = &pair[1];

        if entry.price <= Decimal::ZERO {
            return Err(Error::MalformedRecord {
                market: entry.market.clone(),
                message: format!(
                    "non-positive entry price {} at {}",
                    entry.price, entry.timestamp
                ),
            });
        }

        let delta = match entry.action {
            TradeAction::Long => exit.price - entry.price,
            TradeAction::Short => entry.price - exit.price,
            other => {
                return Err(Error::MalformedRecord {
                    market: entry.market.clone(),
                    message: format!("non-directional action {:?} in outcome derivation", other),
                });
            }
        };

        let pnl_percent = (delta / entry.price * Decimal::ONE_HUNDRED)
            .to_f64()
            .ok_or_else(|| Error::MalformedRecord {
                market: entry.market.clone(),
                message: "PnL not representable as f64".to_string(),
            })?;

        outcomes.push(TradeOutcome::new(entry.raw_confidence, pnl_percent));
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn record(minutes: i64, price: i64, action: TradeAction, confidence: f64) -> TradeRecord {
        TradeRecord::new(
            Utc::now() + Duration::minutes(minutes),
            "BTC",
            Decimal::new(price, 0),
            action,
            confidence,
        )
    }

    #[test]
    fn test_long_pairing() {
        let records = vec![
            record(0, 50_000, TradeAction::Long, 0.8),
            record(1, 51_000, TradeAction::Long, 0.6),
            record(2, 50_500, TradeAction::Long, 0.9),
        ];

        let outcomes = derive_outcomes(&records).unwrap();
        assert_eq!(outcomes.len(), 2);

        // 50000 -> 51000 is +2.0%
        assert!((outcomes[0].pnl_percent - 2.0).abs() < 1e-9);
        assert!(outcomes[0].is_winner);
        assert!((outcomes[0].confidence - 0.8).abs() < f64::EPSILON);

        // 51000 -> 50500 is about -0.98%
        assert!((outcomes[1].pnl_percent - (-0.980_392_156_862_745)).abs() < 1e-9);
        assert!(!outcomes[1].is_winner);
        assert!((outcomes[1].confidence - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_short_direction_inverts_pnl() {
        let records = vec![
            record(0, 100, TradeAction::Short, 0.7),
            record(1, 90, TradeAction::Short, 0.7),
        ];

        let outcomes = derive_outcomes(&records).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!((outcomes[0].pnl_percent - 10.0).abs() < 1e-9);
        assert!(outcomes[0].is_winner);
    }

    #[test]
    fn test_break_even_counts_as_loss() {
        let records = vec![
            record(0, 100, TradeAction::Long, 0.5),
            record(1, 100, TradeAction::Long, 0.5),
        ];

        let outcomes = derive_outcomes(&records).unwrap();
        assert_eq!(outcomes[0].pnl_percent, 0.0);
        assert!(!outcomes[0].is_winner);
    }

    #[test]
    fn test_pairing_count_is_n_minus_one() {
        let records: Vec<TradeRecord> = (0..17)
            .map(|i| record(i, 100 + i, TradeAction::Long, 0.5))
            .collect();
        let outcomes = derive_outcomes(&records).unwrap();
        assert_eq!(outcomes.len(), 16);
    }

    #[test]
    fn test_fewer_than_two_records_yield_no_outcomes() {
        assert!(derive_outcomes(&[]).unwrap().is_empty());
        let one = vec![record(0, 100, TradeAction::Long, 0.5)];
        assert!(derive_outcomes(&one).unwrap().is_empty());
    }

    #[test]
    fn test_zero_entry_price_fails_loudly() {
        let records = vec![
            record(0, 0, TradeAction::Long, 0.5),
            record(1, 100, TradeAction::Long, 0.5),
        ];

        let err = derive_outcomes(&records).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { .. }));
    }

    #[test]
    fn test_non_directional_action_rejected() {
        let records = vec![
            record(0, 100, TradeAction::Hold, 0.5),
            record(1, 101, TradeAction::Long, 0.5),
        ];

        let err = derive_outcomes(&records).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { .. }));
    }
}
