//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{models::TaskRow, schema::tasks};
use crate::catalog::domain::{CaseId, ClusterId};
use crate::db::PgPool;
use crate::directory::domain::UserId;
use crate::task::{
    domain::{PersistedTaskData, Task, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task);

        self.run_blocking(move |connection| {
            let updated_count =
                diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                    .set(&row)
                    .execute(connection)
                    .map_err(TaskRepositoryError::persistence)?;
            if updated_count == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_by_status(&self, status: TaskStatus) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::status.eq(status.as_str()))
                .order(tasks::sequence.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_by_assignee(
        &self,
        user: UserId,
        status: TaskStatus,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::user_id.eq(user.into_inner()))
                .filter(tasks::status.eq(status.as_str()))
                .order(tasks::sequence.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        created_at: task.created_at(),
        formed_at: task.formed_at(),
        completed_at: task.completed_at(),
        case_id: task.case_id().map(CaseId::into_inner),
        cluster_id: task.cluster_id().into_inner(),
        user_id: task.assignee().map(UserId::into_inner),
        solution: task.solution().map(str::to_owned),
        average_duration: task.average_duration(),
        fired: task.is_fired(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let status = TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::persistence)?;
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        status,
        created_at: row.created_at,
        formed_at: row.formed_at,
        completed_at: row.completed_at,
        case_id: row.case_id.map(CaseId::from_uuid),
        cluster_id: ClusterId::from_uuid(row.cluster_id),
        assignee: row.user_id.map(UserId::from_uuid),
        solution: row.solution,
        average_duration: row.average_duration,
        fired: row.fired,
    }))
}
