use super::points_model::{ConfirmOutcome, LedgerEntry, NewLedgerEntry, PointsQuote};
use crate::errors::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for quote and ledger storage.
///
/// Status transitions are compare-and-set: they only apply to quotes that are
/// still `pending`.
#[async_trait]
pub trait PointsRepositoryTrait: Send + Sync {
    fn get_quote(&self, quote_id: &str) -> Result<Option<PointsQuote>>;
    async fn insert_quote(&self, quote: PointsQuote) -> Result<PointsQuote>;
    /// Returns `false` when the quote was no longer pending.
    async fn expire_quote(&self, quote_id: &str) -> Result<bool>;
    /// Expires every pending quote with `expires_at <= now`.
    async fn expire_quotes_before(&self, now: DateTime<Utc>) -> Result<usize>;
    /// Moves a pending, unexpired quote to `consumed` and appends `entry` in
    /// one transaction. `None` means the quote was not eligible and nothing
    /// was written.
    async fn consume_quote(
        &self,
        quote_id: &str,
        now: DateTime<Utc>,
        entry: NewLedgerEntry,
    ) -> Result<Option<LedgerEntry>>;
    async fn insert_ledger_entry(&self, entry: NewLedgerEntry) -> Result<LedgerEntry>;
    fn get_ledger_entries(&self, user_id: &str) -> Result<Vec<LedgerEntry>>;
    fn get_balance(&self, user_id: &str) -> Result<f64>;
}

/// Trait for points service operations
#[async_trait]
pub trait PointsServiceTrait: Send + Sync {
    async fn request_quote(&self, user_id: &str, points: f64) -> Result<PointsQuote>;
    fn get_quote(&self, quote_id: &str) -> Result<PointsQuote>;
    async fn confirm_payment(&self, quote_id: &str, payment_ref: &str)
        -> Result<ConfirmOutcome>;
    async fn expire_stale_quotes(&self) -> Result<usize>;
    async fn add_manual_points(
        &self,
        user_id: &str,
        delta: f64,
        reason: Option<String>,
    ) -> Result<LedgerEntry>;
    fn get_balance(&self, user_id: &str) -> Result<f64>;
    fn get_ledger(&self, user_id: &str) -> Result<Vec<LedgerEntry>>;
}
