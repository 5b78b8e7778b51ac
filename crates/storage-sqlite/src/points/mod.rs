//! SQLite storage implementation for points quotes and the points ledger.

mod model;
mod repository;

pub use model::{LedgerEntryDB, PointsQuoteDB};
pub use repository::PointsRepository;
