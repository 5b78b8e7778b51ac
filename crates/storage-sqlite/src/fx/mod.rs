//! SQLite storage implementation for FX snapshots.

mod model;
mod repository;

pub use model::FxSnapshotDB;
pub use repository::FxSnapshotRepository;
