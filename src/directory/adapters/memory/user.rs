//! In-memory user repository.

use super::lock_error;
use crate::directory::{
    domain::{User, UserId},
    ports::{DirectoryRepositoryError, DirectoryRepositoryResult, UserRepository},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<BTreeMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> DirectoryRepositoryResult<()> {
        let mut users = self.users.write().map_err(|err| lock_error(&err))?;
        if users.contains_key(&user.id()) {
            return Err(DirectoryRepositoryError::DuplicateUser(user.id()));
        }
        if users.values().any(|stored| stored.email() == user.email()) {
            return Err(DirectoryRepositoryError::DuplicateEmail(
                user.email().to_owned(),
            ));
        }
        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> DirectoryRepositoryResult<()> {
        let mut users = self.users.write().map_err(|err| lock_error(&err))?;
        let stored = users
            .get_mut(&user.id())
            .ok_or(DirectoryRepositoryError::UserNotFound(user.id()))?;
        *stored = user.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> DirectoryRepositoryResult<Option<User>> {
        let users = self.users.read().map_err(|err| lock_error(&err))?;
        Ok(users.get(&id).cloned())
    }

    async fn list_all(&self) -> DirectoryRepositoryResult<Vec<User>> {
        let users = self.users.read().map_err(|err| lock_error(&err))?;
        Ok(users.values().cloned().collect())
    }

    async fn find_least_loaded(&self) -> DirectoryRepositoryResult<Option<User>> {
        let users = self.users.read().map_err(|err| lock_error(&err))?;
        // Map iteration is in id order, so `min_by` keeps the lowest id on ties.
        Ok(users
            .values()
            .filter(|user| user.is_active())
            .min_by(|left, right| {
                left.average_duration()
                    .total_cmp(&right.average_duration())
            })
            .cloned())
    }
}
