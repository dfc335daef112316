//! `PostgreSQL` repository implementations for cases and clusters.

use super::{
    models::{CaseRow, ClusterRow},
    schema::{cases, clusters},
};
use crate::catalog::{
    domain::{
        Case, CaseId, Cluster, ClusterId, ClusterIndex, ClusterName, PersistedCaseData,
        PersistedClusterData,
    },
    ports::{CaseRepository, CatalogRepositoryError, CatalogRepositoryResult, ClusterRepository},
};
use crate::db::PgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed cluster repository.
#[derive(Debug, Clone)]
pub struct PostgresClusterRepository {
    pool: PgPool,
}

/// `PostgreSQL`-backed case repository.
#[derive(Debug, Clone)]
pub struct PostgresCaseRepository {
    pool: PgPool,
}

impl PostgresClusterRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PostgresCaseRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn run_blocking<F, T>(pool: &PgPool, f: F) -> CatalogRepositoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> CatalogRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(CatalogRepositoryError::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(CatalogRepositoryError::persistence)?
}

#[async_trait]
impl ClusterRepository for PostgresClusterRepository {
    async fn store(&self, cluster: &Cluster) -> CatalogRepositoryResult<()> {
        let cluster_id = cluster.id();
        let index = cluster.index();
        let row = to_cluster_row(cluster)?;

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(clusters::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_cluster_index_unique_violation(info.as_ref()) =>
                    {
                        CatalogRepositoryError::DuplicateClusterIndex(index)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        CatalogRepositoryError::DuplicateCluster(cluster_id)
                    }
                    _ => CatalogRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, cluster: &Cluster) -> CatalogRepositoryResult<()> {
        let cluster_id = cluster.id();
        let row = to_cluster_row(cluster)?;

        run_blocking(&self.pool, move |connection| {
            let updated_count =
                diesel::update(clusters::table.filter(clusters::id.eq(cluster_id.into_inner())))
                    .set(&row)
                    .execute(connection)
                    .map_err(CatalogRepositoryError::persistence)?;
            if updated_count == 0 {
                return Err(CatalogRepositoryError::ClusterNotFound(cluster_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ClusterId) -> CatalogRepositoryResult<Option<Cluster>> {
        run_blocking(&self.pool, move |connection| {
            let row = clusters::table
                .filter(clusters::id.eq(id.into_inner()))
                .select(ClusterRow::as_select())
                .first::<ClusterRow>(connection)
                .optional()
                .map_err(CatalogRepositoryError::persistence)?;
            row.map(row_to_cluster).transpose()
        })
        .await
    }

    async fn find_by_index(&self, index: ClusterIndex) -> CatalogRepositoryResult<Option<Cluster>> {
        run_blocking(&self.pool, move |connection| {
            let row = clusters::table
                .filter(clusters::cluster_index.eq(index.value()))
                .select(ClusterRow::as_select())
                .first::<ClusterRow>(connection)
                .optional()
                .map_err(CatalogRepositoryError::persistence)?;
            row.map(row_to_cluster).transpose()
        })
        .await
    }

    async fn list_all(&self) -> CatalogRepositoryResult<Vec<Cluster>> {
        run_blocking(&self.pool, move |connection| {
            let rows = clusters::table
                .order(clusters::cluster_index.asc())
                .select(ClusterRow::as_select())
                .load::<ClusterRow>(connection)
                .map_err(CatalogRepositoryError::persistence)?;
            rows.into_iter().map(row_to_cluster).collect()
        })
        .await
    }
}

#[async_trait]
impl CaseRepository for PostgresCaseRepository {
    async fn store(&self, case: &Case) -> CatalogRepositoryResult<()> {
        let case_id = case.id();
        let row = to_case_row(case);

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(cases::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        CatalogRepositoryError::DuplicateCase(case_id)
                    }
                    _ => CatalogRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, case: &Case) -> CatalogRepositoryResult<()> {
        let case_id = case.id();
        let row = to_case_row(case);

        run_blocking(&self.pool, move |connection| {
            let updated_count =
                diesel::update(cases::table.filter(cases::id.eq(case_id.into_inner())))
                    .set(&row)
                    .execute(connection)
                    .map_err(CatalogRepositoryError::persistence)?;
            if updated_count == 0 {
                return Err(CatalogRepositoryError::CaseNotFound(case_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: CaseId) -> CatalogRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let deleted_count = diesel::delete(cases::table.filter(cases::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(CatalogRepositoryError::persistence)?;
            if deleted_count == 0 {
                return Err(CatalogRepositoryError::CaseNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: CaseId) -> CatalogRepositoryResult<Option<Case>> {
        run_blocking(&self.pool, move |connection| {
            let row = cases::table
                .filter(cases::id.eq(id.into_inner()))
                .select(CaseRow::as_select())
                .first::<CaseRow>(connection)
                .optional()
                .map_err(CatalogRepositoryError::persistence)?;
            Ok(row.map(row_to_case))
        })
        .await
    }

    async fn list_by_cluster(&self, cluster_id: ClusterId) -> CatalogRepositoryResult<Vec<Case>> {
        run_blocking(&self.pool, move |connection| {
            let rows = cases::table
                .filter(cases::cluster_id.eq(cluster_id.into_inner()))
                .order((cases::created_at.asc(), cases::id.asc()))
                .select(CaseRow::as_select())
                .load::<CaseRow>(connection)
                .map_err(CatalogRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_case).collect())
        })
        .await
    }
}

fn to_cluster_row(cluster: &Cluster) -> CatalogRepositoryResult<ClusterRow> {
    let frequency =
        i64::try_from(cluster.frequency()).map_err(CatalogRepositoryError::persistence)?;
    Ok(ClusterRow {
        id: cluster.id().into_inner(),
        cluster_index: cluster.index().value(),
        name: cluster.name().as_str().to_owned(),
        frequency,
    })
}

fn row_to_cluster(row: ClusterRow) -> CatalogRepositoryResult<Cluster> {
    let ClusterRow {
        id,
        cluster_index,
        name,
        frequency,
    } = row;
    let parsed_name = ClusterName::new(name).map_err(CatalogRepositoryError::persistence)?;
    let parsed_frequency = u64::try_from(frequency).map_err(CatalogRepositoryError::persistence)?;
    Ok(Cluster::from_persisted(PersistedClusterData {
        id: ClusterId::from_uuid(id),
        index: ClusterIndex::new(cluster_index),
        name: parsed_name,
        frequency: parsed_frequency,
    }))
}

fn to_case_row(case: &Case) -> CaseRow {
    CaseRow {
        id: case.id().into_inner(),
        cluster_id: case.cluster_id().map(ClusterId::into_inner),
        title: case.title().to_owned(),
        solution: case.solution().to_owned(),
        created_at: case.created_at(),
    }
}

fn row_to_case(row: CaseRow) -> Case {
    Case::from_persisted(PersistedCaseData {
        id: CaseId::from_uuid(row.id),
        title: row.title,
        solution: row.solution,
        cluster_id: row.cluster_id.map(ClusterId::from_uuid),
        created_at: row.created_at,
    })
}

fn is_cluster_index_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_clusters_cluster_index_unique")
}
