//! Port contracts for the case and cluster catalog.

pub mod repository;

pub use repository::{
    CaseRepository, CatalogRepositoryError, CatalogRepositoryResult, ClusterRepository,
};
