use thiserror::Error;

/// Errors from repository operations (used by trait definitions in olivia-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Preconditions checked when a chat session is constructed.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no signed-in identity")]
    NotSignedIn,
}

/// Errors related to account and sign-in operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("invalid email address: '{0}'")]
    InvalidEmail(String),

    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("an account with email '{0}' already exists")]
    EmailTaken(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("no signed-in identity")]
    NotSignedIn,

    #[error("credential hashing failed")]
    Hashing,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for AccountError {
    fn from(err: RepositoryError) -> Self {
        AccountError::Storage(err.to_string())
    }
}

/// Fatal startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key configured: set {0}")]
    MissingApiKey(String),
}
