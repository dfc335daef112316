//! [`AgentDirectory`] backed by the user directory service.

use crate::directory::{
    domain::{User, UserId},
    ports::{LoadLedger, UserRepository},
    services::{UserDirectoryResult, UserDirectoryService},
};
use crate::task::{domain::TaskId, ports::AgentDirectory};
use async_trait::async_trait;
use mockable::Clock;

#[async_trait]
impl<U, L, C> AgentDirectory for UserDirectoryService<U, L, C>
where
    U: UserRepository,
    L: LoadLedger,
    C: Clock + Send + Sync,
{
    async fn find_user(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        Self::find_user(self, id).await
    }

    async fn least_loaded_user(&self) -> UserDirectoryResult<User> {
        self.user_with_minimum_average_duration().await
    }

    async fn take_load(
        &self,
        user: UserId,
        task: TaskId,
        amount: f64,
    ) -> UserDirectoryResult<User> {
        self.adjust_load(user, Some(task), amount).await
    }

    async fn release_load(
        &self,
        user: UserId,
        task: TaskId,
        amount: f64,
    ) -> UserDirectoryResult<User> {
        self.adjust_load(user, Some(task), negated(amount)).await
    }
}

#[expect(clippy::float_arithmetic, reason = "releasing load is a negative adjustment")]
const fn negated(amount: f64) -> f64 {
    -amount
}
