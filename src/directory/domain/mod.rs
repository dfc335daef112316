//! Domain model for the user directory.
//!
//! Users carry a running average duration that the lifecycle engine shifts
//! as tasks are taken and closed. Every shift is recorded in the load ledger
//! so the stored value can always be re-derived.

mod error;
mod ids;
mod ledger;
mod user;

pub use error::{
    DirectoryDomainError, ParseLoadChangeError, ParseUserRoleError, ParseUserStatusError,
};
pub use ids::{LoadEntryId, UserId};
pub use ledger::{LoadChange, LoadLedgerEntry, PersistedLoadEntryData, fold_ledger};
pub use user::{
    CredentialHash, PersistedUserData, TelegramHandle, User, UserRole, UserStatus,
};
