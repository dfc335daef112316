//! Application services for the case and cluster catalog.

mod catalog;

pub use catalog::{
    CatalogService, CatalogServiceError, CatalogServiceResult, CreateCaseRequest,
    ResolveClusterRequest,
};
