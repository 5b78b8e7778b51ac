//! Database models for points quotes and ledger entries.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use itinero_core::points::{LedgerEntry, NewLedgerEntry, PointsQuote, QuoteStatus};
use uuid::Uuid;

use crate::errors::StorageError;
use crate::utils::{format_timestamp, parse_timestamp};

/// Database model for points quotes
#[derive(Queryable, Selectable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::points_quotes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PointsQuoteDB {
    pub id: String,
    pub user_id: String,
    pub points: f64,
    pub currency: String,
    pub unit_price_major: f64,
    pub amount_minor: i64,
    pub amount_major: f64,
    pub status: String,
    pub expires_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<PointsQuoteDB> for PointsQuote {
    type Error = StorageError;

    fn try_from(db: PointsQuoteDB) -> Result<Self, Self::Error> {
        let status = db
            .status
            .parse::<QuoteStatus>()
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        Ok(PointsQuote {
            id: db.id,
            user_id: db.user_id,
            points: db.points,
            currency: db.currency,
            unit_price_major: db.unit_price_major,
            amount_minor: db.amount_minor,
            amount_major: db.amount_major,
            status,
            expires_at: parse_timestamp(&db.expires_at)?,
            created_at: parse_timestamp(&db.created_at)?,
        })
    }
}

impl From<&PointsQuote> for PointsQuoteDB {
    fn from(domain: &PointsQuote) -> Self {
        let created_at = format_timestamp(domain.created_at);
        Self {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            points: domain.points,
            currency: domain.currency.clone(),
            unit_price_major: domain.unit_price_major,
            amount_minor: domain.amount_minor,
            amount_major: domain.amount_major,
            status: domain.status.as_str().to_string(),
            expires_at: format_timestamp(domain.expires_at),
            updated_at: created_at.clone(),
            created_at,
        }
    }
}

/// Database model for ledger entries. `meta` holds JSON.
#[derive(Queryable, Selectable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::points_ledger)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LedgerEntryDB {
    pub id: String,
    pub user_id: String,
    pub delta: f64,
    pub reason: String,
    pub ref_type: Option<String>,
    pub ref_id: Option<String>,
    pub meta: Option<String>,
    pub created_at: String,
}

impl LedgerEntryDB {
    pub fn from_new(entry: NewLedgerEntry, created_at: DateTime<Utc>) -> Result<Self, StorageError> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_id: entry.user_id,
            delta: entry.delta,
            reason: entry.reason,
            ref_type: entry.ref_type,
            ref_id: entry.ref_id,
            meta: entry.meta.map(|m| serde_json::to_string(&m)).transpose()?,
            created_at: format_timestamp(created_at),
        })
    }
}

impl TryFrom<LedgerEntryDB> for LedgerEntry {
    type Error = StorageError;

    fn try_from(db: LedgerEntryDB) -> Result<Self, Self::Error> {
        Ok(LedgerEntry {
            id: db.id,
            user_id: db.user_id,
            delta: db.delta,
            reason: db.reason,
            ref_type: db.ref_type,
            ref_id: db.ref_id,
            meta: db.meta.map(|m| serde_json::from_str(&m)).transpose()?,
            created_at: parse_timestamp(&db.created_at)?,
        })
    }
}
