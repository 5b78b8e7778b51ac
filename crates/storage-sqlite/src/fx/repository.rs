use itinero_core::fx::{FxSnapshot, FxSnapshotRepositoryTrait, NewFxSnapshot};
use itinero_core::Result;

use super::model::FxSnapshotDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::fx_snapshots;
use crate::utils::format_day;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct FxSnapshotRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FxSnapshotRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl FxSnapshotRepositoryTrait for FxSnapshotRepository {
    fn get_latest_snapshot(&self, base_currency: &str) -> Result<Option<FxSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        let row = fx_snapshots::table
            .filter(fx_snapshots::base_currency.eq(base_currency))
            .order(fx_snapshots::created_at.desc())
            .select(FxSnapshotDB::as_select())
            .first::<FxSnapshotDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        Ok(row.map(FxSnapshot::try_from).transpose()?)
    }

    fn get_snapshot_for_day(
        &self,
        provider: &str,
        base_currency: &str,
        as_of: NaiveDate,
    ) -> Result<Option<FxSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        let row = fx_snapshots::table
            .filter(fx_snapshots::provider.eq(provider))
            .filter(fx_snapshots::base_currency.eq(base_currency))
            .filter(fx_snapshots::as_of.eq(format_day(as_of)))
            .select(FxSnapshotDB::as_select())
            .first::<FxSnapshotDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        Ok(row.map(FxSnapshot::try_from).transpose()?)
    }

    async fn insert_snapshot(&self, snapshot: NewFxSnapshot) -> Result<FxSnapshot> {
        let draft = FxSnapshot::new(
            Uuid::new_v4().to_string(),
            snapshot.provider,
            &snapshot.base_currency,
            snapshot.as_of,
            snapshot.rates,
            Utc::now(),
        );
        let row = FxSnapshotDB::try_from(&draft)?;
        // Hand back what a later read returns (timestamps at stored precision)
        let created = FxSnapshot::try_from(row.clone())?;

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FxSnapshot> {
                diesel::insert_into(fx_snapshots::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(created)
            })
            .await
    }
}
