use super::currency::{is_valid_currency_code, normalize_currency_code};
use super::fx_errors::FxError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One immutable observation of exchange rates, each expressed as a multiplier
/// relative to `base_currency`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FxSnapshot {
    pub id: String,
    pub provider: String,
    pub base_currency: String,
    pub as_of: NaiveDate,
    pub rates: HashMap<String, f64>,
    pub created_at: DateTime<Utc>,
}

impl FxSnapshot {
    /// Builds a snapshot, normalizing the base currency and every rate key to
    /// uppercase.
    pub fn new(
        id: impl Into<String>,
        provider: impl Into<String>,
        base_currency: &str,
        as_of: NaiveDate,
        rates: HashMap<String, f64>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
            base_currency: normalize_currency_code(base_currency),
            as_of,
            rates: normalize_rates(rates),
            created_at,
        }
    }

    /// Multiplier for `code` relative to the base currency.
    ///
    /// The base currency resolves to `1.0` when the provider omitted it.
    pub fn rate(&self, code: &str) -> Option<f64> {
        let code = normalize_currency_code(code);
        match self.rates.get(&code) {
            Some(rate) => Some(*rate),
            None if code == self.base_currency => Some(1.0),
            None => None,
        }
    }

    pub fn currencies(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.rates.keys().cloned().collect();
        if !self.rates.contains_key(&self.base_currency) {
            codes.push(self.base_currency.clone());
        }
        codes.sort();
        codes
    }
}

/// Input model for recording a freshly fetched snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewFxSnapshot {
    pub provider: String,
    pub base_currency: String,
    pub as_of: NaiveDate,
    pub rates: HashMap<String, f64>,
}

impl NewFxSnapshot {
    /// Returns a copy with normalized codes after checking every rate is a
    /// finite positive multiplier.
    pub fn validated(self) -> Result<Self, FxError> {
        if self.provider.trim().is_empty() {
            return Err(FxError::InvalidSnapshot("provider is empty".to_string()));
        }
        if !is_valid_currency_code(&self.base_currency) {
            return Err(FxError::InvalidCurrencyCode(self.base_currency));
        }
        if self.rates.is_empty() {
            return Err(FxError::InvalidSnapshot("no rates supplied".to_string()));
        }
        for (code, rate) in &self.rates {
            if !is_valid_currency_code(code) {
                return Err(FxError::InvalidCurrencyCode(code.clone()));
            }
            if !rate.is_finite() || *rate <= 0.0 {
                return Err(FxError::InvalidSnapshot(format!(
                    "rate for {} must be a positive number, got {}",
                    code, rate
                )));
            }
        }

        Ok(Self {
            provider: self.provider.trim().to_string(),
            base_currency: normalize_currency_code(&self.base_currency),
            as_of: self.as_of,
            rates: normalize_rates(self.rates),
        })
    }
}

/// Result of recording a snapshot. At most one snapshot exists per
/// provider, base currency and day.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Created(FxSnapshot),
    AlreadyExists(FxSnapshot),
}

impl RecordOutcome {
    pub fn snapshot(&self) -> &FxSnapshot {
        match self {
            RecordOutcome::Created(s) | RecordOutcome::AlreadyExists(s) => s,
        }
    }

    pub fn into_snapshot(self) -> FxSnapshot {
        match self {
            RecordOutcome::Created(s) | RecordOutcome::AlreadyExists(s) => s,
        }
    }
}

fn normalize_rates(rates: HashMap<String, f64>) -> HashMap<String, f64> {
    rates
        .into_iter()
        .map(|(code, rate)| (normalize_currency_code(&code), rate))
        .collect()
}
