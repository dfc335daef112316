//! Knowledge-base case records.

use super::{CaseId, CatalogDomainError, ClusterId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A reusable documented solution, optionally scoped to a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    id: CaseId,
    title: String,
    solution: String,
    cluster_id: Option<ClusterId>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCaseData {
    /// Persisted case identifier.
    pub id: CaseId,
    /// Persisted title.
    pub title: String,
    /// Persisted solution text.
    pub solution: String,
    /// Persisted owning cluster, if any.
    pub cluster_id: Option<ClusterId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Case {
    /// Creates a new case.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyCaseTitle`] when the title is empty
    /// after trimming.
    pub fn new(
        title: impl Into<String>,
        solution: impl Into<String>,
        cluster_id: Option<ClusterId>,
        clock: &impl Clock,
    ) -> Result<Self, CatalogDomainError> {
        Ok(Self {
            id: CaseId::new(),
            title: validated_title(title.into())?,
            solution: solution.into(),
            cluster_id,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a case from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCaseData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            solution: data.solution,
            cluster_id: data.cluster_id,
            created_at: data.created_at,
        }
    }

    /// Returns the case identifier.
    #[must_use]
    pub const fn id(&self) -> CaseId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the solution text.
    #[must_use]
    pub fn solution(&self) -> &str {
        &self.solution
    }

    /// Returns the owning cluster, if any.
    #[must_use]
    pub const fn cluster_id(&self) -> Option<ClusterId> {
        self.cluster_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces title and solution text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyCaseTitle`] when the new title is
    /// empty after trimming; the case is left unchanged.
    pub fn revise(
        &mut self,
        title: impl Into<String>,
        solution: impl Into<String>,
    ) -> Result<(), CatalogDomainError> {
        self.title = validated_title(title.into())?;
        self.solution = solution.into();
        Ok(())
    }
}

fn validated_title(raw: String) -> Result<String, CatalogDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CatalogDomainError::EmptyCaseTitle);
    }
    Ok(trimmed.to_owned())
}
