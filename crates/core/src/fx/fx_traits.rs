use super::fx_model::{FxSnapshot, NewFxSnapshot, RecordOutcome};
use crate::errors::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait defining the contract for FX snapshot storage.
#[async_trait]
pub trait FxSnapshotRepositoryTrait: Send + Sync {
    /// Newest snapshot (by capture time) for the given base currency.
    fn get_latest_snapshot(&self, base_currency: &str) -> Result<Option<FxSnapshot>>;
    fn get_snapshot_for_day(
        &self,
        provider: &str,
        base_currency: &str,
        as_of: NaiveDate,
    ) -> Result<Option<FxSnapshot>>;
    async fn insert_snapshot(&self, snapshot: NewFxSnapshot) -> Result<FxSnapshot>;
}

/// Trait defining the contract for FX service operations.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    fn get_latest_snapshot(&self, base_currency: &str) -> Result<Option<FxSnapshot>>;
    /// Lenient conversion against the latest snapshot for `base_currency`.
    fn convert_latest(
        &self,
        amount: f64,
        from_currency: &str,
        to_currency: &str,
        base_currency: &str,
    ) -> Result<Option<f64>>;
    /// Strict conversion against the latest snapshot for `base_currency`.
    fn convert_latest_strict(
        &self,
        amount: f64,
        from_currency: &str,
        to_currency: &str,
        base_currency: &str,
    ) -> Result<f64>;
    async fn record_snapshot(&self, snapshot: NewFxSnapshot) -> Result<RecordOutcome>;
}
