//! SQLite storage implementation for Itinero.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `itinero-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for FX snapshots, points quotes and the ledger
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!      core (domain)
//!            │
//!            ▼
//!  storage-sqlite (this crate)
//!            │
//!            ▼
//!        SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
mod utils;

// Repository implementations
pub mod fx;
pub mod points;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, write_actor::spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from itinero-core for convenience
pub use itinero_core::errors::{DatabaseError, Error, Result};
