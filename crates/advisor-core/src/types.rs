//! Core trade recommendation types shared across the advisor.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Action attached to a trade recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Long,
    Short,
    Hold,
    Close,
}

impl TradeAction {
    /// Whether this action opens a directional position with a well-defined
    /// entry/exit PnL pairing. `Hold`/`Close` do not participate in
    /// calibration.
    pub fn is_directional(&self) -> bool {
        matches!(self, TradeAction::Long | TradeAction::Short)
    }

    /// Database column encoding.
    pub fn as_i16(&self) -> i16 {
        match self {
            TradeAction::Long => 0,
            TradeAction::Short => 1,
            TradeAction::Hold => 2,
            TradeAction::Close => 3,
        }
    }

    /// Decode the database column encoding.
    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(TradeAction::Long),
            1 => Some(TradeAction::Short),
            2 => Some(TradeAction::Hold),
            3 => Some(TradeAction::Close),
            _ => None,
        }
    }
}

/// A historical trade recommendation with the model's raw confidence score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    /// When the recommendation was issued.
    pub timestamp: DateTime<Utc>,
    /// Market identifier (e.g. "BTC", "ETH").
    pub market: String,
    /// Market price at recommendation time.
    pub price: Decimal,
    /// Recommended action.
    pub action: TradeAction,
    /// Self-reported model confidence in [0, 1], uncorrected for
    /// historical accuracy.
    pub raw_confidence: f64,
}

impl TradeRecord {
    /// Create a new trade record.
    pub fn new(
        timestamp: DateTime<Utc>,
        market: &str,
        price: Decimal,
        action: TradeAction,
        raw_confidence: f64,
    ) -> Self {
        Self {
            timestamp,
            market: market.to_string(),
            price,
            action,
            raw_confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional_actions() {
        assert!(TradeAction::Long.is_directional());
        assert!(TradeAction::Short.is_directional());
        assert!(!TradeAction::Hold.is_directional());
        assert!(!TradeAction::Close.is_directional());
    }

    #[test]
    fn test_action_roundtrip() {
        for action in [
            TradeAction::Long,
            TradeAction::Short,
            TradeAction::Hold,
            TradeAction::Close,
        ] {
            assert_eq!(TradeAction::from_i16(action.as_i16()), Some(action));
        }
        assert_eq!(TradeAction::from_i16(99), None);
    }

    #[test]
    fn test_action_serde_lowercase() {
        let json = serde_json::to_string(&TradeAction::Long).unwrap();
        assert_eq!(json, "\"long\"");
        let back: TradeAction = serde_json::from_str("\"short\"").unwrap();
        assert_eq!(back, TradeAction::Short);
    }
}
