//! Points module - top-up quoting, quote lifecycle, and the points ledger.

mod points_config;
mod points_errors;
mod points_model;
pub mod points_quoter;
mod points_service;
mod points_traits;

pub use points_config::PointsConfig;
pub use points_errors::PointsError;
pub use points_model::{
    ConfirmOutcome, LedgerEntry, NewLedgerEntry, PointsQuote, QuoteStatus, TopupAmount,
};
pub use points_quoter::{compute_topup, create_quote, PointsQuoter};
pub use points_service::PointsService;
pub use points_traits::{PointsRepositoryTrait, PointsServiceTrait};
