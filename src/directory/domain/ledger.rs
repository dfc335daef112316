//! Load ledger: the audit trail behind each user's running average.

use super::{LoadEntryId, ParseLoadChangeError, UserId};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A single change to a user's running average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum LoadChange {
    /// The average was overwritten with an absolute value.
    Reset(f64),
    /// The average was shifted by a signed delta.
    Adjust(f64),
}

impl LoadChange {
    /// Returns the canonical storage name of the change kind.
    #[must_use]
    pub const fn kind_str(self) -> &'static str {
        match self {
            Self::Reset(_) => "reset",
            Self::Adjust(_) => "adjust",
        }
    }

    /// Returns the recorded amount.
    #[must_use]
    pub const fn amount(self) -> f64 {
        match self {
            Self::Reset(amount) | Self::Adjust(amount) => amount,
        }
    }

    /// Rebuilds a change from its storage kind and amount.
    ///
    /// # Errors
    ///
    /// Returns [`ParseLoadChangeError`] for an unknown kind.
    pub fn from_parts(kind: &str, amount: f64) -> Result<Self, ParseLoadChangeError> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "reset" => Ok(Self::Reset(amount)),
            "adjust" => Ok(Self::Adjust(amount)),
            _ => Err(ParseLoadChangeError(kind.to_owned())),
        }
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "running averages are fractional seconds"
    )]
    fn apply(self, current: f64) -> f64 {
        match self {
            Self::Reset(value) => value,
            Self::Adjust(delta) => current + delta,
        }
    }
}

/// Recorded change to a user's load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadLedgerEntry {
    id: LoadEntryId,
    user_id: UserId,
    task_id: Option<TaskId>,
    change: LoadChange,
    recorded_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted ledger entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedLoadEntryData {
    /// Persisted entry identifier.
    pub id: LoadEntryId,
    /// Persisted owning user.
    pub user_id: UserId,
    /// Persisted task that caused the change, if any.
    pub task_id: Option<TaskId>,
    /// Persisted change.
    pub change: LoadChange,
    /// Persisted recording timestamp.
    pub recorded_at: DateTime<Utc>,
}

impl LoadLedgerEntry {
    /// Records a new change for a user.
    #[must_use]
    pub fn record(
        user_id: UserId,
        task_id: Option<TaskId>,
        change: LoadChange,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: LoadEntryId::new(),
            user_id,
            task_id,
            change,
            recorded_at: clock.utc(),
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedLoadEntryData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            task_id: data.task_id,
            change: data.change,
            recorded_at: data.recorded_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> LoadEntryId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the task that caused the change, if any.
    #[must_use]
    pub const fn task_id(&self) -> Option<TaskId> {
        self.task_id
    }

    /// Returns the change.
    #[must_use]
    pub const fn change(&self) -> LoadChange {
        self.change
    }

    /// Returns the recording timestamp.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Folds ledger entries, in recording order, into a running average.
///
/// An empty ledger folds to zero.
#[must_use]
pub fn fold_ledger<'a>(entries: impl IntoIterator<Item = &'a LoadLedgerEntry>) -> f64 {
    entries
        .into_iter()
        .fold(0.0, |current, entry| entry.change.apply(current))
}
