use thiserror::Error;

/// Error type for password operations.
///
/// A mismatched password is not an error; see `PasswordHasher::verify`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HashingError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash: {0}")]
    InvalidHash(String),
}
