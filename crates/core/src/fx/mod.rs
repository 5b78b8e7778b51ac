//! FX (Foreign Exchange) module - snapshot models, conversion, services, and traits.

pub mod currency;
pub mod currency_converter;
mod fx_errors;
mod fx_model;
mod fx_service;
mod fx_traits;

pub use currency::{
    currency_or_default, find_currency, is_valid_currency_code, normalize_currency_code,
    CurrencyInfo, WORLD_CURRENCIES,
};
pub use currency_converter::{convert, convert_snapshot_strict, convert_strict};
pub use fx_errors::FxError;
pub use fx_model::{FxSnapshot, NewFxSnapshot, RecordOutcome};
pub use fx_service::FxService;
pub use fx_traits::{FxServiceTrait, FxSnapshotRepositoryTrait};
