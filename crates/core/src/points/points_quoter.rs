//! Points top-up pricing.
//!
//! `amount_major` is rounded to cents first and `amount_minor` is re-derived
//! from that rounded value, never rounded independently from the raw product.

use super::points_config::PointsConfig;
use super::points_errors::PointsError;
use super::points_model::{PointsQuote, QuoteStatus, TopupAmount};
use crate::constants::{DEFAULT_SETTLEMENT_CURRENCY, MINOR_UNITS_PER_MAJOR};
use crate::utils::Clock;
use chrono::Duration;
use std::sync::Arc;
use uuid::Uuid;

/// Rounds to two decimals, half away from zero, on the binary `f64` value.
///
/// This is not decimal rounding: a product whose exact decimal value ends in
/// 5 may sit just below the half-cent once stored as `f64`, so
/// `compute_topup(1.0, 1.005)` gives 1.00 while `compute_topup(3.0, 0.335)`
/// gives 1.01.
pub fn round_money_2dp(value: f64) -> f64 {
    (value * MINOR_UNITS_PER_MAJOR).round() / MINOR_UNITS_PER_MAJOR
}

/// Major units to integer minor units (cents, pesewas).
pub fn to_minor_units(amount_major: f64) -> i64 {
    (amount_major * MINOR_UNITS_PER_MAJOR).round() as i64
}

fn validate_points(points: f64) -> Result<(), PointsError> {
    if !points.is_finite() || points <= 0.0 {
        return Err(PointsError::InvalidQuantity(format!(
            "points must be a finite number greater than zero, got {}",
            points
        )));
    }
    Ok(())
}

/// Prices `points` at `unit_price_major` each.
pub fn compute_topup(points: f64, unit_price_major: f64) -> Result<TopupAmount, PointsError> {
    validate_points(points)?;
    if !unit_price_major.is_finite() || unit_price_major < 0.0 {
        return Err(PointsError::InvalidPrice(format!(
            "unit price must be a finite non-negative number, got {}",
            unit_price_major
        )));
    }

    let amount_major = round_money_2dp(points * unit_price_major);
    // `as i64` saturates, so anything beyond i64 minor units is rejected here
    if !amount_major.is_finite() || amount_major * MINOR_UNITS_PER_MAJOR >= i64::MAX as f64 {
        return Err(PointsError::InvalidQuantity(format!(
            "{} points at {} is too large to price",
            points, unit_price_major
        )));
    }

    Ok(TopupAmount {
        amount_major,
        amount_minor: to_minor_units(amount_major),
    })
}

/// Builds a fresh `pending` quote in the default settlement currency.
///
/// Persisting the returned record is the caller's job; its `id` is what the
/// caller hands back to the client.
pub fn create_quote(
    user_id: &str,
    points: f64,
    unit_price_major: f64,
    ttl_minutes: i64,
    clock: &dyn Clock,
) -> Result<PointsQuote, PointsError> {
    if user_id.trim().is_empty() {
        return Err(PointsError::MissingUser);
    }
    let amount = compute_topup(points, unit_price_major)?;

    if ttl_minutes <= 0 {
        return Err(PointsError::InvalidTtl(ttl_minutes));
    }
    let ttl = Duration::try_minutes(ttl_minutes).ok_or(PointsError::InvalidTtl(ttl_minutes))?;
    let created_at = clock.now();
    let expires_at = created_at
        .checked_add_signed(ttl)
        .ok_or(PointsError::InvalidTtl(ttl_minutes))?;

    Ok(PointsQuote {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        points,
        currency: DEFAULT_SETTLEMENT_CURRENCY.to_string(),
        unit_price_major,
        amount_minor: amount.amount_minor,
        amount_major: amount.amount_major,
        status: QuoteStatus::Pending,
        expires_at,
        created_at,
    })
}

/// Quotes top-ups using one validated pricing configuration.
#[derive(Clone)]
pub struct PointsQuoter {
    config: PointsConfig,
    clock: Arc<dyn Clock>,
}

impl PointsQuoter {
    pub fn new(config: PointsConfig, clock: Arc<dyn Clock>) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self { config, clock })
    }

    pub fn config(&self) -> &PointsConfig {
        &self.config
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn compute(&self, points: f64) -> Result<TopupAmount, PointsError> {
        compute_topup(points, self.config.unit_price_major)
    }

    pub fn quote(&self, user_id: &str, points: f64) -> Result<PointsQuote, PointsError> {
        let mut quote = create_quote(
            user_id,
            points,
            self.config.unit_price_major,
            self.config.quote_ttl_minutes,
            self.clock.as_ref(),
        )?;
        quote.currency = self.config.settlement_currency.clone();
        Ok(quote)
    }
}
