//! Database models for FX snapshots.

use diesel::prelude::*;
use itinero_core::fx::FxSnapshot;
use std::collections::HashMap;

use crate::errors::StorageError;
use crate::utils::{format_day, format_timestamp, parse_day, parse_timestamp};

/// Database model for FX snapshots. `rates` holds a JSON object.
#[derive(Queryable, Selectable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::fx_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FxSnapshotDB {
    pub id: String,
    pub provider: String,
    pub base_currency: String,
    pub as_of: String,
    pub rates: String,
    pub created_at: String,
}

impl TryFrom<FxSnapshotDB> for FxSnapshot {
    type Error = StorageError;

    fn try_from(db: FxSnapshotDB) -> Result<Self, Self::Error> {
        let rates: HashMap<String, f64> = serde_json::from_str(&db.rates)?;
        Ok(FxSnapshot::new(
            db.id,
            db.provider,
            &db.base_currency,
            parse_day(&db.as_of)?,
            rates,
            parse_timestamp(&db.created_at)?,
        ))
    }
}

impl TryFrom<&FxSnapshot> for FxSnapshotDB {
    type Error = StorageError;

    fn try_from(domain: &FxSnapshot) -> Result<Self, Self::Error> {
        Ok(Self {
            id: domain.id.clone(),
            provider: domain.provider.clone(),
            base_currency: domain.base_currency.clone(),
            as_of: format_day(domain.as_of),
            rates: serde_json::to_string(&domain.rates)?,
            created_at: format_timestamp(domain.created_at),
        })
    }
}
