use thiserror::Error;

/// Errors raised by strict FX conversion and snapshot validation.
///
/// The lenient converter never returns these; it signals the same conditions
/// with `None`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FxError {
    #[error("Exchange rate not found for {0}")]
    MissingRate(String),

    #[error("Invalid FX snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),
}
