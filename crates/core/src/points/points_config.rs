use crate::constants::{
    DEFAULT_POINT_UNIT_PRICE_MAJOR, DEFAULT_QUOTE_TTL_MINUTES, DEFAULT_SETTLEMENT_CURRENCY,
};
use crate::errors::{Error, Result};
use crate::fx::{is_valid_currency_code, normalize_currency_code};
use serde::{Deserialize, Serialize};

/// Pricing for points top-ups.
///
/// Defaults: 0.40 GHS per point, quotes valid for 15 minutes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PointsConfig {
    /// Price of one point in major units of `settlement_currency`.
    pub unit_price_major: f64,
    pub quote_ttl_minutes: i64,
    pub settlement_currency: String,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            unit_price_major: DEFAULT_POINT_UNIT_PRICE_MAJOR,
            quote_ttl_minutes: DEFAULT_QUOTE_TTL_MINUTES,
            settlement_currency: DEFAULT_SETTLEMENT_CURRENCY.to_string(),
        }
    }
}

impl PointsConfig {
    pub fn new(
        unit_price_major: f64,
        quote_ttl_minutes: i64,
        settlement_currency: &str,
    ) -> Result<Self> {
        let config = Self {
            unit_price_major,
            quote_ttl_minutes,
            settlement_currency: normalize_currency_code(settlement_currency),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.unit_price_major.is_finite() || self.unit_price_major < 0.0 {
            return Err(Error::InvalidConfigValue(format!(
                "points unit price must be a finite non-negative number, got {}",
                self.unit_price_major
            )));
        }
        if self.quote_ttl_minutes <= 0 {
            return Err(Error::InvalidConfigValue(format!(
                "quote TTL must be a positive number of minutes, got {}",
                self.quote_ttl_minutes
            )));
        }
        if !is_valid_currency_code(&self.settlement_currency) {
            return Err(Error::InvalidConfigValue(format!(
                "settlement currency '{}' is not a currency code",
                self.settlement_currency
            )));
        }
        Ok(())
    }
}
