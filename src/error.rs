use thiserror::Error;

use crate::role::Role;

/// AuthError
///
/// Failures surfaced to the login, signup and role-selection forms.
/// Each variant is handled where it occurs and shown to the user as a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account with email {0} already exists")]
    DuplicateAccount(String),

    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("role {0} cannot be self-selected")]
    RoleNotSelectable(Role),

    #[error("no active session")]
    NoActiveSession,
}

/// SessionError
///
/// Problems found while reading the durable session record. These never leave
/// the session store: a corrupt record is recovered as "no principal".
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("corrupt session record: {0}")]
    Corrupt(String),

    #[error("unsupported session record version {0}")]
    UnsupportedVersion(u32),
}

/// StorageError
///
/// Failures of the durable key/value storage seam.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// ConfigError
///
/// Raised by `AppConfig::load` when the environment is incomplete or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}
