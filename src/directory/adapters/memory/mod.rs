//! In-memory directory repositories for tests and local runs.

mod ledger;
mod user;

pub use ledger::InMemoryLoadLedger;
pub use user::InMemoryUserRepository;

use crate::directory::ports::DirectoryRepositoryError;

fn lock_error(err: &impl ToString) -> DirectoryRepositoryError {
    DirectoryRepositoryError::persistence(std::io::Error::other(err.to_string()))
}
