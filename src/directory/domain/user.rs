//! Support agent records.

use super::{DirectoryDomainError, ParseUserRoleError, ParseUserStatusError, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authorisation role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular support agent.
    User,
    /// Administrator.
    Admin,
}

impl UserRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for UserRole {
    type Error = ParseUserRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseUserRoleError(value.to_owned())),
        }
    }
}

/// Account status. Deleted users are kept for history but never appointed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// The user may be appointed to tasks.
    Active,
    /// The user was soft-deleted.
    Deleted,
}

impl UserStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deleted => "deleted",
        }
    }
}

impl TryFrom<&str> for UserStatus {
    type Error = ParseUserStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "deleted" => Ok(Self::Deleted),
            _ => Err(ParseUserStatusError(value.to_owned())),
        }
    }
}

/// Opaque credential hash. Never printed.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialHash(Vec<u8>);

impl CredentialHash {
    /// Wraps previously computed hash bytes.
    #[must_use]
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the raw hash bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}

/// Telegram username used to reach an agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TelegramHandle(String);

impl TelegramHandle {
    /// Creates a validated handle.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyTelegramHandle`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DirectoryDomainError::EmptyTelegramHandle);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the handle as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TelegramHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A support agent as seen by the lifecycle engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: String,
    #[serde(skip)]
    credential_hash: CredentialHash,
    role: UserRole,
    status: UserStatus,
    average_duration: f64,
    telegram_handle: Option<TelegramHandle>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedUserData {
    /// Persisted identifier.
    pub id: UserId,
    /// Persisted email address.
    pub email: String,
    /// Persisted credential hash.
    pub credential_hash: CredentialHash,
    /// Persisted role.
    pub role: UserRole,
    /// Persisted status.
    pub status: UserStatus,
    /// Persisted running average in seconds.
    pub average_duration: f64,
    /// Persisted telegram handle, if any.
    pub telegram_handle: Option<TelegramHandle>,
}

impl User {
    /// Creates an active user with no recorded load.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyEmail`] when the email is empty
    /// after trimming.
    pub fn new(
        email: impl Into<String>,
        credential_hash: CredentialHash,
        role: UserRole,
        telegram_handle: Option<TelegramHandle>,
    ) -> Result<Self, DirectoryDomainError> {
        let raw = email.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DirectoryDomainError::EmptyEmail);
        }
        Ok(Self {
            id: UserId::new(),
            email: trimmed.to_owned(),
            credential_hash,
            role,
            status: UserStatus::Active,
            average_duration: 0.0,
            telegram_handle,
        })
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            email: data.email,
            credential_hash: data.credential_hash,
            role: data.role,
            status: data.status,
            average_duration: data.average_duration,
            telegram_handle: data.telegram_handle,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the credential hash.
    #[must_use]
    pub const fn credential_hash(&self) -> &CredentialHash {
        &self.credential_hash
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> UserStatus {
        self.status
    }

    /// Returns `true` while the user may be appointed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, UserStatus::Active)
    }

    /// Returns the running average duration in seconds.
    #[must_use]
    pub const fn average_duration(&self) -> f64 {
        self.average_duration
    }

    /// Returns the telegram handle, if any.
    #[must_use]
    pub const fn telegram_handle(&self) -> Option<&TelegramHandle> {
        self.telegram_handle.as_ref()
    }

    /// Overwrites the running average.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::NonFiniteAverage`] for NaN or infinite
    /// values; the user is left unchanged.
    pub fn set_average_duration(&mut self, value: f64) -> Result<(), DirectoryDomainError> {
        if !value.is_finite() {
            return Err(DirectoryDomainError::NonFiniteAverage(value));
        }
        self.average_duration = value;
        Ok(())
    }

    /// Soft-deletes the user.
    pub const fn deactivate(&mut self) {
        self.status = UserStatus::Deleted;
    }
}
