//! `PostgreSQL` repository implementations for users and the load ledger.

use super::{
    models::{LoadEntryRow, NewLoadEntryRow, UserRow},
    schema::{user_load_ledger, users},
};
use crate::db::PgPool;
use crate::directory::{
    domain::{
        CredentialHash, LoadChange, LoadEntryId, LoadLedgerEntry, PersistedLoadEntryData,
        PersistedUserData, TelegramHandle, User, UserId, UserRole, UserStatus,
    },
    ports::{DirectoryRepositoryError, DirectoryRepositoryResult, LoadLedger, UserRepository},
};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `PostgreSQL`-backed load ledger.
#[derive(Debug, Clone)]
pub struct PostgresLoadLedger {
    pool: PgPool,
}

impl PostgresLoadLedger {
    /// Creates a new ledger from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn run_blocking<F, T>(pool: &PgPool, f: F) -> DirectoryRepositoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> DirectoryRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(DirectoryRepositoryError::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(DirectoryRepositoryError::persistence)?
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, user: &User) -> DirectoryRepositoryResult<()> {
        let user_id = user.id();
        let email = user.email().to_owned();
        let row = to_user_row(user);

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(users::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_email_unique_violation(info.as_ref()) =>
                    {
                        DirectoryRepositoryError::DuplicateEmail(email)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        DirectoryRepositoryError::DuplicateUser(user_id)
                    }
                    _ => DirectoryRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> DirectoryRepositoryResult<()> {
        let user_id = user.id();
        let row = to_user_row(user);

        run_blocking(&self.pool, move |connection| {
            let updated_count =
                diesel::update(users::table.filter(users::id.eq(user_id.into_inner())))
                    .set(&row)
                    .execute(connection)
                    .map_err(DirectoryRepositoryError::persistence)?;
            if updated_count == 0 {
                return Err(DirectoryRepositoryError::UserNotFound(user_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> DirectoryRepositoryResult<Option<User>> {
        run_blocking(&self.pool, move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(DirectoryRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list_all(&self) -> DirectoryRepositoryResult<Vec<User>> {
        run_blocking(&self.pool, move |connection| {
            let rows = users::table
                .order(users::id.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(DirectoryRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn find_least_loaded(&self) -> DirectoryRepositoryResult<Option<User>> {
        run_blocking(&self.pool, move |connection| {
            let row = users::table
                .filter(users::status.eq(UserStatus::Active.as_str()))
                .order((users::average_duration.asc(), users::id.asc()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(DirectoryRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }
}

#[async_trait]
impl LoadLedger for PostgresLoadLedger {
    async fn append(&self, entry: &LoadLedgerEntry) -> DirectoryRepositoryResult<()> {
        let change = entry.change();
        let row = NewLoadEntryRow {
            id: entry.id().into_inner(),
            user_id: entry.user_id().into_inner(),
            task_id: entry.task_id().map(TaskId::into_inner),
            change_kind: change.kind_str().to_owned(),
            amount: change.amount(),
            recorded_at: entry.recorded_at(),
        };

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(user_load_ledger::table)
                .values(&row)
                .execute(connection)
                .map_err(DirectoryRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn entries_for(&self, user_id: UserId) -> DirectoryRepositoryResult<Vec<LoadLedgerEntry>> {
        run_blocking(&self.pool, move |connection| {
            let rows = user_load_ledger::table
                .filter(user_load_ledger::user_id.eq(user_id.into_inner()))
                .order(user_load_ledger::sequence.asc())
                .select(LoadEntryRow::as_select())
                .load::<LoadEntryRow>(connection)
                .map_err(DirectoryRepositoryError::persistence)?;
            rows.into_iter().map(row_to_entry).collect()
        })
        .await
    }
}

fn to_user_row(user: &User) -> UserRow {
    UserRow {
        id: user.id().into_inner(),
        email: user.email().to_owned(),
        pass_hash: user.credential_hash().as_bytes().to_vec(),
        role: user.role().as_str().to_owned(),
        status: user.status().as_str().to_owned(),
        average_duration: user.average_duration(),
        telegram_handle: user
            .telegram_handle()
            .map(|handle| handle.as_str().to_owned()),
    }
}

fn row_to_user(row: UserRow) -> DirectoryRepositoryResult<User> {
    let role = UserRole::try_from(row.role.as_str()).map_err(DirectoryRepositoryError::persistence)?;
    let status =
        UserStatus::try_from(row.status.as_str()).map_err(DirectoryRepositoryError::persistence)?;
    let telegram_handle = row
        .telegram_handle
        .map(TelegramHandle::new)
        .transpose()
        .map_err(DirectoryRepositoryError::persistence)?;

    Ok(User::from_persisted(PersistedUserData {
        id: UserId::from_uuid(row.id),
        email: row.email,
        credential_hash: CredentialHash::from_bytes(row.pass_hash),
        role,
        status,
        average_duration: row.average_duration,
        telegram_handle,
    }))
}

fn row_to_entry(row: LoadEntryRow) -> DirectoryRepositoryResult<LoadLedgerEntry> {
    let change = LoadChange::from_parts(&row.change_kind, row.amount)
        .map_err(DirectoryRepositoryError::persistence)?;
    Ok(LoadLedgerEntry::from_persisted(PersistedLoadEntryData {
        id: LoadEntryId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        task_id: row.task_id.map(TaskId::from_uuid),
        change,
        recorded_at: row.recorded_at,
    }))
}

fn is_email_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_users_email_unique")
}
