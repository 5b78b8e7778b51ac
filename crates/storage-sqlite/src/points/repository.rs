use itinero_core::points::{
    LedgerEntry, NewLedgerEntry, PointsQuote, PointsRepositoryTrait, QuoteStatus,
};
use itinero_core::Result;

use super::model::{LedgerEntryDB, PointsQuoteDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{points_ledger, points_quotes};
use crate::utils::format_timestamp;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

pub struct PointsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PointsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        PointsRepository { pool, writer }
    }
}

/// Applies `pending -> next` to one quote; returns the number of rows changed.
fn transition_pending(
    conn: &mut SqliteConnection,
    quote_id: &str,
    next: QuoteStatus,
    not_expired_at: Option<&str>,
    now: &str,
) -> std::result::Result<usize, StorageError> {
    let pending = points_quotes::table
        .filter(points_quotes::id.eq(quote_id))
        .filter(points_quotes::status.eq(QuoteStatus::Pending.as_str()));

    let changed = match not_expired_at {
        Some(cutoff) => diesel::update(pending.filter(points_quotes::expires_at.gt(cutoff)))
            .set((
                points_quotes::status.eq(next.as_str()),
                points_quotes::updated_at.eq(now),
            ))
            .execute(conn)?,
        None => diesel::update(pending)
            .set((
                points_quotes::status.eq(next.as_str()),
                points_quotes::updated_at.eq(now),
            ))
            .execute(conn)?,
    };
    Ok(changed)
}

fn insert_ledger_row(
    conn: &mut SqliteConnection,
    entry: NewLedgerEntry,
    created_at: DateTime<Utc>,
) -> Result<LedgerEntry> {
    let row = LedgerEntryDB::from_new(entry, created_at)?;
    diesel::insert_into(points_ledger::table)
        .values(&row)
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(LedgerEntry::try_from(row)?)
}

#[async_trait]
impl PointsRepositoryTrait for PointsRepository {
    fn get_quote(&self, quote_id: &str) -> Result<Option<PointsQuote>> {
        let mut conn = get_connection(&self.pool)?;
        let row = points_quotes::table
            .find(quote_id)
            .select(PointsQuoteDB::as_select())
            .first::<PointsQuoteDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(PointsQuote::try_from).transpose()?)
    }

    async fn insert_quote(&self, quote: PointsQuote) -> Result<PointsQuote> {
        let row = PointsQuoteDB::from(&quote);
        let stored = PointsQuote::try_from(row.clone())?;

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PointsQuote> {
                diesel::insert_into(points_quotes::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(stored)
            })
            .await
    }

    async fn expire_quote(&self, quote_id: &str) -> Result<bool> {
        let quote_id = quote_id.to_string();
        let now = format_timestamp(Utc::now());

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                let changed =
                    transition_pending(conn, &quote_id, QuoteStatus::Expired, None, &now)?;
                Ok(changed == 1)
            })
            .await
    }

    async fn expire_quotes_before(&self, now: DateTime<Utc>) -> Result<usize> {
        let cutoff = format_timestamp(now);
        let stamp = format_timestamp(Utc::now());

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let changed = diesel::update(
                    points_quotes::table
                        .filter(points_quotes::status.eq(QuoteStatus::Pending.as_str()))
                        .filter(points_quotes::expires_at.le(&cutoff)),
                )
                .set((
                    points_quotes::status.eq(QuoteStatus::Expired.as_str()),
                    points_quotes::updated_at.eq(&stamp),
                ))
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(changed)
            })
            .await
    }

    async fn consume_quote(
        &self,
        quote_id: &str,
        now: DateTime<Utc>,
        entry: NewLedgerEntry,
    ) -> Result<Option<LedgerEntry>> {
        let quote_id = quote_id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<LedgerEntry>> {
                let stamp = format_timestamp(now);
                let changed = transition_pending(
                    conn,
                    &quote_id,
                    QuoteStatus::Consumed,
                    Some(&stamp),
                    &stamp,
                )?;
                if changed == 0 {
                    debug!("Quote {} was not consumable", quote_id);
                    return Ok(None);
                }
                insert_ledger_row(conn, entry, now).map(Some)
            })
            .await
    }

    async fn insert_ledger_entry(&self, entry: NewLedgerEntry) -> Result<LedgerEntry> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<LedgerEntry> {
                insert_ledger_row(conn, entry, Utc::now())
            })
            .await
    }

    fn get_ledger_entries(&self, user_id: &str) -> Result<Vec<LedgerEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = points_ledger::table
            .filter(points_ledger::user_id.eq(user_id))
            .order(points_ledger::created_at.asc())
            .select(LedgerEntryDB::as_select())
            .load::<LedgerEntryDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|row| LedgerEntry::try_from(row).map_err(Into::into))
            .collect()
    }

    fn get_balance(&self, user_id: &str) -> Result<f64> {
        let mut conn = get_connection(&self.pool)?;
        let total = points_ledger::table
            .filter(points_ledger::user_id.eq(user_id))
            .select(sum(points_ledger::delta))
            .first::<Option<f64>>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(total.unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::setup_db;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn make_quote(id: &str, created_at: DateTime<Utc>) -> PointsQuote {
        PointsQuote {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            points: 100.0,
            currency: "GHS".to_string(),
            unit_price_major: 0.4,
            amount_minor: 4000,
            amount_major: 40.0,
            status: QuoteStatus::Pending,
            expires_at: created_at + Duration::minutes(15),
            created_at,
        }
    }

    fn payment_entry(points: f64) -> NewLedgerEntry {
        NewLedgerEntry {
            user_id: "user-1".to_string(),
            delta: points,
            reason: "quote_payment".to_string(),
            ref_type: Some("payment".to_string()),
            ref_id: Some("ref-1".to_string()),
            meta: Some(json!({ "quoteId": "q-1" })),
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 2, 10, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_quote() {
        let (_dir, pool, writer) = setup_db();
        let repo = PointsRepository::new(pool, writer);

        let stored = repo.insert_quote(make_quote("q-1", t0())).await.unwrap();
        let loaded = repo.get_quote("q-1").unwrap().unwrap();
        assert_eq!(loaded, stored);
        assert_eq!(loaded.status, QuoteStatus::Pending);
        assert!(repo.get_quote("q-404").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_consume_quote_credits_once() {
        let (_dir, pool, writer) = setup_db();
        let repo = PointsRepository::new(pool, writer);
        repo.insert_quote(make_quote("q-1", t0())).await.unwrap();

        let now = t0() + Duration::minutes(5);
        let entry = repo
            .consume_quote("q-1", now, payment_entry(100.0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.delta, 100.0);
        assert_eq!(entry.meta, Some(json!({ "quoteId": "q-1" })));

        let again = repo
            .consume_quote("q-1", now, payment_entry(100.0))
            .await
            .unwrap();
        assert!(again.is_none());

        assert_eq!(
            repo.get_quote("q-1").unwrap().unwrap().status,
            QuoteStatus::Consumed
        );
        assert_eq!(repo.get_balance("user-1").unwrap(), 100.0);
        assert_eq!(repo.get_ledger_entries("user-1").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_consume_expired_quote_writes_nothing() {
        let (_dir, pool, writer) = setup_db();
        let repo = PointsRepository::new(pool, writer);
        repo.insert_quote(make_quote("q-1", t0())).await.unwrap();

        let at_expiry = t0() + Duration::minutes(15);
        let result = repo
            .consume_quote("q-1", at_expiry, payment_entry(100.0))
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(repo.get_balance("user-1").unwrap(), 0.0);
        assert_eq!(
            repo.get_quote("q-1").unwrap().unwrap().status,
            QuoteStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_expire_quotes_before() {
        let (_dir, pool, writer) = setup_db();
        let repo = PointsRepository::new(pool, writer);
        repo.insert_quote(make_quote("old", t0())).await.unwrap();
        repo.insert_quote(make_quote("new", t0() + Duration::minutes(10)))
            .await
            .unwrap();

        let expired = repo
            .expire_quotes_before(t0() + Duration::minutes(20))
            .await
            .unwrap();
        assert_eq!(expired, 1);
        assert_eq!(
            repo.get_quote("old").unwrap().unwrap().status,
            QuoteStatus::Expired
        );
        assert_eq!(
            repo.get_quote("new").unwrap().unwrap().status,
            QuoteStatus::Pending
        );

        assert!(repo.expire_quote("new").await.unwrap());
        assert!(!repo.expire_quote("new").await.unwrap());
    }

    #[tokio::test]
    async fn test_balance_sums_signed_deltas() {
        let (_dir, pool, writer) = setup_db();
        let repo = PointsRepository::new(pool, writer);

        assert_eq!(repo.get_balance("user-1").unwrap(), 0.0);
        repo.insert_ledger_entry(payment_entry(120.0)).await.unwrap();
        let mut debit = payment_entry(-20.0);
        debit.reason = "manual_topup".to_string();
        debit.meta = None;
        repo.insert_ledger_entry(debit).await.unwrap();

        assert_eq!(repo.get_balance("user-1").unwrap(), 100.0);
        let entries = repo.get_ledger_entries("user-1").unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|e| e.delta == -20.0 && e.meta.is_none()));
        assert!(repo.get_ledger_entries("user-2").unwrap().is_empty());
    }
}
