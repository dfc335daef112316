//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::domain::UserId;
use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    creation_order: Vec<TaskId>,
}

impl InMemoryTaskState {
    fn ordered<'a>(&'a self, keep: impl Fn(&Task) -> bool + 'a) -> impl Iterator<Item = Task> + 'a {
        self.creation_order
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .filter(move |task| keep(*task))
            .cloned()
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: &impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.creation_order.push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *stored = task.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_by_status(&self, status: TaskStatus) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.ordered(move |task| task.status() == status).collect())
    }

    async fn list_by_assignee(
        &self,
        user: UserId,
        status: TaskStatus,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state
            .ordered(move |task| task.assignee() == Some(user) && task.status() == status)
            .collect())
    }
}
