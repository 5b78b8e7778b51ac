//! Snapshot-based currency conversion.
//!
//! Every rate is a multiplier relative to the snapshot's base currency, so a
//! conversion is `amount * (rate(to) / rate(from))`. Both entry points share
//! [`convert_with`] and therefore agree bit-for-bit on success. No rounding is
//! applied here; callers that need minor units round the result themselves.

use super::currency::normalize_currency_code;
use super::fx_errors::FxError;
use super::fx_model::FxSnapshot;
use std::collections::HashMap;

/// Lenient conversion.
///
/// Returns `None` when the snapshot or the amount is absent, or when either
/// currency has no usable rate. Identical codes return `amount` untouched.
pub fn convert(
    snapshot: Option<&FxSnapshot>,
    amount: Option<f64>,
    from: &str,
    to: &str,
) -> Option<f64> {
    let snapshot = snapshot?;
    let amount = amount?;
    convert_with(amount, from, to, |code| snapshot.rate(code)).ok()
}

/// Strict conversion over a bare rate table anchored to `base`.
///
/// Fails with [`FxError::MissingRate`] instead of returning `None`.
pub fn convert_strict(
    amount: f64,
    from: &str,
    to: &str,
    rates: &HashMap<String, f64>,
    base: &str,
) -> Result<f64, FxError> {
    let base = normalize_currency_code(base);
    convert_with(amount, from, to, |code| {
        lookup_rate(rates, code).or_else(|| (code == base).then_some(1.0))
    })
}

/// Strict conversion over an optional snapshot. An absent snapshot is reported
/// as [`FxError::InvalidSnapshot`].
pub fn convert_snapshot_strict(
    snapshot: Option<&FxSnapshot>,
    amount: f64,
    from: &str,
    to: &str,
) -> Result<f64, FxError> {
    let snapshot =
        snapshot.ok_or_else(|| FxError::InvalidSnapshot("no snapshot available".to_string()))?;
    convert_with(amount, from, to, |code| snapshot.rate(code))
}

impl FxSnapshot {
    /// Lenient conversion against this snapshot.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Option<f64> {
        convert(Some(self), Some(amount), from, to)
    }
}

fn convert_with<F>(amount: f64, from: &str, to: &str, rate_of: F) -> Result<f64, FxError>
where
    F: Fn(&str) -> Option<f64>,
{
    let from = normalize_currency_code(from);
    let to = normalize_currency_code(to);

    if from == to {
        return Ok(amount);
    }

    let from_rate = usable_rate(&from, rate_of(&from))?;
    let to_rate = usable_rate(&to, rate_of(&to))?;

    Ok(amount * (to_rate / from_rate))
}

fn usable_rate(code: &str, rate: Option<f64>) -> Result<f64, FxError> {
    match rate {
        None => Err(FxError::MissingRate(code.to_string())),
        Some(r) if !r.is_finite() || r <= 0.0 => Err(FxError::InvalidSnapshot(format!(
            "rate for {} is not a positive number: {}",
            code, r
        ))),
        Some(r) => Ok(r),
    }
}

/// Keys in caller-supplied tables are not guaranteed to be uppercase.
fn lookup_rate(rates: &HashMap<String, f64>, code: &str) -> Option<f64> {
    rates.get(code).copied().or_else(|| {
        rates
            .iter()
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(code))
            .map(|(_, r)| *r)
    })
}
