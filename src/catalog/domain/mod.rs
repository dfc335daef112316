//! Domain model for the knowledge-base catalog.
//!
//! Cases are reusable solutions; clusters group similar tickets under a
//! stable external index supplied by the upstream classifier.

mod case;
mod cluster;
mod error;
mod ids;

pub use case::{Case, PersistedCaseData};
pub use cluster::{Cluster, PersistedClusterData};
pub use error::CatalogDomainError;
pub use ids::{CaseId, ClusterId, ClusterIndex, ClusterName};
