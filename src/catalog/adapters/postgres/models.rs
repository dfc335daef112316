//! Diesel row models for catalog persistence.

use super::schema::{cases, clusters};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result and insert row for cluster records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = clusters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ClusterRow {
    /// Internal cluster identifier.
    pub id: uuid::Uuid,
    /// Unique external index.
    pub cluster_index: i64,
    /// Display name.
    pub name: String,
    /// Observed frequency count.
    pub frequency: i64,
}

/// Query result and insert row for case records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = cases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct CaseRow {
    /// Case identifier.
    pub id: uuid::Uuid,
    /// Optional owning cluster.
    pub cluster_id: Option<uuid::Uuid>,
    /// Case title.
    pub title: String,
    /// Solution text.
    pub solution: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
