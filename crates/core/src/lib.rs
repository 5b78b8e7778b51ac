//! Itinero Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic behind trip pricing hints and the
//! loyalty-points top-up flow: FX snapshot conversion, points quoting, and the
//! points ledger. It is database-agnostic and defines traits that are
//! implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod fx;
pub mod points;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
