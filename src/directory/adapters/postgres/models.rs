//! Diesel row models for directory persistence.

use super::schema::{user_load_ledger, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result and write row for user records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Email address.
    pub email: String,
    /// Credential hash bytes.
    pub pass_hash: Vec<u8>,
    /// Role name.
    pub role: String,
    /// Status name.
    pub status: String,
    /// Running average in seconds.
    pub average_duration: f64,
    /// Optional telegram username.
    pub telegram_handle: Option<String>,
}

/// Query result for ledger entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_load_ledger)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LoadEntryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub user_id: uuid::Uuid,
    /// Causing task, if any.
    pub task_id: Option<uuid::Uuid>,
    /// Change kind.
    pub change_kind: String,
    /// Change amount.
    pub amount: f64,
    /// Recording timestamp.
    pub recorded_at: DateTime<Utc>,
}

/// Insert payload for ledger entries; `sequence` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_load_ledger)]
pub struct NewLoadEntryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub user_id: uuid::Uuid,
    /// Causing task, if any.
    pub task_id: Option<uuid::Uuid>,
    /// Change kind.
    pub change_kind: String,
    /// Change amount.
    pub amount: f64,
    /// Recording timestamp.
    pub recorded_at: DateTime<Utc>,
}
