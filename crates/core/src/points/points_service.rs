use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::json;

use crate::constants::{
    LEDGER_REASON_MANUAL_TOPUP, LEDGER_REASON_QUOTE_PAYMENT, LEDGER_REF_TYPE_ADMIN,
    LEDGER_REF_TYPE_PAYMENT,
};
use crate::errors::{Result, ValidationError};

use super::points_errors::PointsError;
use super::points_model::{ConfirmOutcome, LedgerEntry, NewLedgerEntry, PointsQuote, QuoteStatus};
use super::points_quoter::PointsQuoter;
use super::points_traits::{PointsRepositoryTrait, PointsServiceTrait};

pub struct PointsService {
    repository: Arc<dyn PointsRepositoryTrait>,
    quoter: PointsQuoter,
}

impl PointsService {
    pub fn new(repository: Arc<dyn PointsRepositoryTrait>, quoter: PointsQuoter) -> Self {
        PointsService { repository, quoter }
    }

    pub fn quoter(&self) -> &PointsQuoter {
        &self.quoter
    }

    /// Settles a confirmation whose consume lost: a quote that lapsed in the
    /// meantime is moved to `expired`, anything else was already processed.
    async fn settle_unconsumed(&self, quote_id: &str) -> Result<ConfirmOutcome> {
        let current = self.get_quote(quote_id)?;
        let lapsed = current.status == QuoteStatus::Pending
            && current.is_expired_at(self.quoter.clock().now());
        if lapsed && self.repository.expire_quote(quote_id).await? {
            warn!("Quote {} expired while its payment was being applied", quote_id);
            return Ok(ConfirmOutcome::Expired);
        }
        debug!("Quote {} left pending before it could be consumed", quote_id);
        Ok(ConfirmOutcome::AlreadyProcessed)
    }
}

#[async_trait]
impl PointsServiceTrait for PointsService {
    async fn request_quote(&self, user_id: &str, points: f64) -> Result<PointsQuote> {
        let quote = self.quoter.quote(user_id, points)?;
        let stored = self.repository.insert_quote(quote).await?;
        info!(
            "Created points quote {} for user {}: {} points = {} {} (expires {})",
            stored.id,
            stored.user_id,
            stored.points,
            stored.amount_major,
            stored.currency,
            stored.expires_at
        );
        Ok(stored)
    }

    fn get_quote(&self, quote_id: &str) -> Result<PointsQuote> {
        self.repository
            .get_quote(quote_id)?
            .ok_or_else(|| PointsError::QuoteNotFound(quote_id.to_string()).into())
    }

    async fn confirm_payment(
        &self,
        quote_id: &str,
        payment_ref: &str,
    ) -> Result<ConfirmOutcome> {
        if payment_ref.trim().is_empty() {
            return Err(ValidationError::MissingField("reference".to_string()).into());
        }

        let quote = self.get_quote(quote_id)?;
        if quote.status.is_terminal() {
            debug!(
                "Ignoring payment {} for quote {} already {}",
                payment_ref, quote.id, quote.status
            );
            return Ok(ConfirmOutcome::AlreadyProcessed);
        }

        let now = self.quoter.clock().now();
        if quote.is_expired_at(now) {
            warn!(
                "Payment {} arrived for quote {} after it expired at {}",
                payment_ref, quote.id, quote.expires_at
            );
            return if self.repository.expire_quote(&quote.id).await? {
                Ok(ConfirmOutcome::Expired)
            } else {
                Ok(ConfirmOutcome::AlreadyProcessed)
            };
        }

        let entry = NewLedgerEntry {
            user_id: quote.user_id.clone(),
            delta: quote.points,
            reason: LEDGER_REASON_QUOTE_PAYMENT.to_string(),
            ref_type: Some(LEDGER_REF_TYPE_PAYMENT.to_string()),
            ref_id: Some(payment_ref.to_string()),
            meta: Some(json!({
                "quoteId": quote.id,
                "currency": quote.currency,
                "amountMinor": quote.amount_minor,
            })),
        };

        match self.repository.consume_quote(&quote.id, now, entry).await? {
            Some(credited) => {
                info!(
                    "Credited {} points to user {} for quote {}",
                    credited.delta, credited.user_id, quote.id
                );
                Ok(ConfirmOutcome::Credited(credited))
            }
            None => self.settle_unconsumed(&quote.id).await,
        }
    }

    async fn expire_stale_quotes(&self) -> Result<usize> {
        let now = self.quoter.clock().now();
        let expired = self.repository.expire_quotes_before(now).await?;
        if expired > 0 {
            info!("Expired {} stale points quotes", expired);
        }
        Ok(expired)
    }

    async fn add_manual_points(
        &self,
        user_id: &str,
        delta: f64,
        reason: Option<String>,
    ) -> Result<LedgerEntry> {
        if user_id.trim().is_empty() {
            return Err(PointsError::MissingUser.into());
        }
        if !delta.is_finite() || delta == 0.0 {
            return Err(PointsError::InvalidQuantity(format!(
                "ledger delta must be a finite non-zero number, got {}",
                delta
            ))
            .into());
        }

        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| LEDGER_REASON_MANUAL_TOPUP.to_string());

        let entry = self
            .repository
            .insert_ledger_entry(NewLedgerEntry {
                user_id: user_id.to_string(),
                delta,
                reason,
                ref_type: Some(LEDGER_REF_TYPE_ADMIN.to_string()),
                ref_id: None,
                meta: Some(json!({ "source": "admin" })),
            })
            .await?;
        info!(
            "Applied manual ledger delta {} to user {} ({})",
            entry.delta, entry.user_id, entry.reason
        );
        Ok(entry)
    }

    fn get_balance(&self, user_id: &str) -> Result<f64> {
        self.repository.get_balance(user_id)
    }

    fn get_ledger(&self, user_id: &str) -> Result<Vec<LedgerEntry>> {
        self.repository.get_ledger_entries(user_id)
    }
}
