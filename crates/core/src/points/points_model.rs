//! Points domain models.

use super::points_errors::PointsError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a quote. `Consumed` and `Expired` are terminal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Pending,
    Consumed,
    Expired,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Consumed => "consumed",
            QuoteStatus::Expired => "expired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, QuoteStatus::Pending)
    }

    /// Only `pending` may move, and only to a terminal state.
    pub fn can_transition_to(&self, next: QuoteStatus) -> bool {
        matches!(
            (self, next),
            (QuoteStatus::Pending, QuoteStatus::Consumed)
                | (QuoteStatus::Pending, QuoteStatus::Expired)
        )
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = PointsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(QuoteStatus::Pending),
            "consumed" => Ok(QuoteStatus::Consumed),
            "expired" => Ok(QuoteStatus::Expired),
            other => Err(PointsError::InvalidStatus(other.to_string())),
        }
    }
}

/// Total price of a top-up. `amount_minor` is always derived from the rounded
/// `amount_major`, so `amount_minor as f64 / 100.0 == amount_major`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopupAmount {
    pub amount_major: f64,
    pub amount_minor: i64,
}

/// A short-lived, single-use offer to sell `points` at a fixed price.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PointsQuote {
    pub id: String,
    pub user_id: String,
    pub points: f64,
    pub currency: String,
    pub unit_price_major: f64,
    pub amount_minor: i64,
    pub amount_major: f64,
    pub status: QuoteStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl PointsQuote {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// A consumer may only accept a pending quote that has not expired.
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        self.status == QuoteStatus::Pending && !self.is_expired_at(now)
    }
}

/// One signed movement of points for a user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub user_id: String,
    pub delta: f64,
    pub reason: String,
    pub ref_type: Option<String>,
    pub ref_id: Option<String>,
    pub meta: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Input model for appending to the ledger
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewLedgerEntry {
    pub user_id: String,
    pub delta: f64,
    pub reason: String,
    pub ref_type: Option<String>,
    pub ref_id: Option<String>,
    pub meta: Option<serde_json::Value>,
}

/// What happened when a payment confirmation arrived for a quote.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", tag = "outcome", content = "entry")]
pub enum ConfirmOutcome {
    /// The quote was consumed and its points credited.
    Credited(LedgerEntry),
    /// The quote had already left `pending`; nothing was written.
    AlreadyProcessed,
    /// The quote lapsed before payment arrived and is now `expired`.
    Expired,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn quote(status: QuoteStatus) -> PointsQuote {
        let created_at = Utc.with_ymd_and_hms(2025, 12, 2, 10, 0, 0).unwrap();
        PointsQuote {
            id: "q-1".to_string(),
            user_id: "user-1".to_string(),
            points: 100.0,
            currency: "GHS".to_string(),
            unit_price_major: 0.4,
            amount_minor: 4000,
            amount_major: 40.0,
            status,
            expires_at: created_at + Duration::minutes(15),
            created_at,
        }
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [QuoteStatus::Pending, QuoteStatus::Consumed, QuoteStatus::Expired] {
            assert_eq!(status.as_str().parse::<QuoteStatus>(), Ok(status));
        }
        assert!(matches!(
            "paid".parse::<QuoteStatus>(),
            Err(PointsError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_transitions_are_one_way() {
        assert!(QuoteStatus::Pending.can_transition_to(QuoteStatus::Consumed));
        assert!(QuoteStatus::Pending.can_transition_to(QuoteStatus::Expired));
        assert!(!QuoteStatus::Consumed.can_transition_to(QuoteStatus::Pending));
        assert!(!QuoteStatus::Expired.can_transition_to(QuoteStatus::Consumed));
        assert!(!QuoteStatus::Pending.can_transition_to(QuoteStatus::Pending));
    }

    #[test]
    fn test_quote_expiry_boundary() {
        let q = quote(QuoteStatus::Pending);
        assert!(q.is_redeemable_at(q.expires_at - Duration::seconds(1)));
        assert!(q.is_expired_at(q.expires_at));
        assert!(!q.is_redeemable_at(q.expires_at));
    }

    #[test]
    fn test_consumed_quote_is_not_redeemable() {
        let q = quote(QuoteStatus::Consumed);
        assert!(!q.is_redeemable_at(q.created_at));
    }

    #[test]
    fn test_quote_serializes_status_lowercase() {
        let json = serde_json::to_value(quote(QuoteStatus::Pending)).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["amountMinor"], 4000);
    }
}
