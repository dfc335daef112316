//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result and write row for task records.
///
/// `sequence` is assigned by the database and only used for ordering, so it
/// is not part of the row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Start-of-work timestamp.
    pub formed_at: Option<DateTime<Utc>>,
    /// Closure timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Attached case.
    pub case_id: Option<uuid::Uuid>,
    /// Owning cluster.
    pub cluster_id: uuid::Uuid,
    /// Assignee.
    pub user_id: Option<uuid::Uuid>,
    /// Solution text.
    pub solution: Option<String>,
    /// Average-duration snapshot.
    pub average_duration: f64,
    /// Escalation flag.
    pub fired: bool,
}
