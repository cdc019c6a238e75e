use thiserror::Error;

/// Error type for token issuance.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token lifetime must be at least one second")]
    InvalidTtl,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),
}

/// Client-caused authentication failures.
///
/// Every variant maps to an unauthorized response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Malformed Authorization header")]
    MalformedHeader,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token has no subject")]
    MissingSubject,

    #[error("Token subject is not a user id: {0}")]
    InvalidSubject(String),
}
