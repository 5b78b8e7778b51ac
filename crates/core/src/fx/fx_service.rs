use super::currency::{is_valid_currency_code, normalize_currency_code};
use super::currency_converter::{convert, convert_snapshot_strict};
use super::fx_errors::FxError;
use super::fx_model::{FxSnapshot, NewFxSnapshot, RecordOutcome};
use super::fx_traits::{FxServiceTrait, FxSnapshotRepositoryTrait};
use crate::errors::{DatabaseError, Error, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;

#[derive(Clone)]
pub struct FxService {
    repository: Arc<dyn FxSnapshotRepositoryTrait>,
}

impl FxService {
    pub fn new(repository: Arc<dyn FxSnapshotRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn normalized_base(base_currency: &str) -> Result<String> {
        if !is_valid_currency_code(base_currency) {
            return Err(FxError::InvalidCurrencyCode(base_currency.to_string()).into());
        }
        Ok(normalize_currency_code(base_currency))
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    fn get_latest_snapshot(&self, base_currency: &str) -> Result<Option<FxSnapshot>> {
        let base = Self::normalized_base(base_currency)?;
        let snapshot = self.repository.get_latest_snapshot(&base)?;
        if snapshot.is_none() {
            debug!("No FX snapshot stored for base {}", base);
        }
        Ok(snapshot)
    }

    fn convert_latest(
        &self,
        amount: f64,
        from_currency: &str,
        to_currency: &str,
        base_currency: &str,
    ) -> Result<Option<f64>> {
        let snapshot = self.get_latest_snapshot(base_currency)?;
        let converted = convert(snapshot.as_ref(), Some(amount), from_currency, to_currency);
        if converted.is_none() && snapshot.is_some() {
            debug!(
                "No rate for {} -> {} in latest {} snapshot",
                from_currency, to_currency, base_currency
            );
        }
        Ok(converted)
    }

    fn convert_latest_strict(
        &self,
        amount: f64,
        from_currency: &str,
        to_currency: &str,
        base_currency: &str,
    ) -> Result<f64> {
        let snapshot = self.get_latest_snapshot(base_currency)?;
        Ok(convert_snapshot_strict(
            snapshot.as_ref(),
            amount,
            from_currency,
            to_currency,
        )?)
    }

    async fn record_snapshot(&self, snapshot: NewFxSnapshot) -> Result<RecordOutcome> {
        let snapshot = snapshot.validated()?;

        if let Some(existing) = self.repository.get_snapshot_for_day(
            &snapshot.provider,
            &snapshot.base_currency,
            snapshot.as_of,
        )? {
            info!(
                "FX snapshot already exists for {} {} on {}",
                snapshot.provider, snapshot.base_currency, snapshot.as_of
            );
            return Ok(RecordOutcome::AlreadyExists(existing));
        }

        let (provider, base, as_of) = (
            snapshot.provider.clone(),
            snapshot.base_currency.clone(),
            snapshot.as_of,
        );

        match self.repository.insert_snapshot(snapshot).await {
            Ok(created) => {
                info!(
                    "Recorded FX snapshot {} ({} rates, base {}, as of {})",
                    created.id,
                    created.rates.len(),
                    created.base_currency,
                    created.as_of
                );
                Ok(RecordOutcome::Created(created))
            }
            // Another writer recorded the same day between our read and write
            Err(Error::Database(DatabaseError::UniqueViolation(msg))) => {
                warn!("Concurrent FX snapshot insert for {} {}: {}", provider, as_of, msg);
                self.repository
                    .get_snapshot_for_day(&provider, &base, as_of)?
                    .map(RecordOutcome::AlreadyExists)
                    .ok_or_else(|| Error::Database(DatabaseError::UniqueViolation(msg)))
            }
            Err(e) => Err(e),
        }
    }
}
