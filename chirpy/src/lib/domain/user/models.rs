use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::user::errors::EmailError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// `password_hash` is the only persisted form of the credential.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User unique identifier type, assigned by storage starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u64);

impl UserId {
    /// Parse a user ID from string.
    ///
    /// # Arguments
    /// * `s` - Decimal id
    ///
    /// # Returns
    /// Parsed UserId
    ///
    /// # Errors
    /// * `InvalidFormat` - Not a positive integer
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        match s.parse::<u64>() {
            Ok(0) => Err(UserIdError::InvalidFormat(s.to_string())),
            Ok(id) => Ok(Self(id)),
            Err(_) => Err(UserIdError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Returns
    /// Validated EmailAddress value object
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to create a new user with domain types
#[derive(Debug)]
pub struct CreateUserCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl CreateUserCommand {
    /// Construct a new create user command.
    ///
    /// # Arguments
    /// * `email` - Validated email address
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(email: EmailAddress, password: String) -> Self {
        Self { email, password }
    }
}

/// Command to replace the credentials of the authenticated user.
///
/// Both fields are required: the plaintext password is re-hashed.
#[derive(Debug)]
pub struct UpdateUserCommand {
    pub email: EmailAddress,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_from_string() {
        assert_eq!(UserId::from_string("42"), Ok(UserId(42)));
        assert!(UserId::from_string("0").is_err());
        assert!(UserId::from_string("-1").is_err());
        assert!(UserId::from_string("abc").is_err());
        assert!(UserId::from_string("").is_err());
    }

    #[test]
    fn test_email_address_validation() {
        assert!(EmailAddress::new("a@b.com".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
        assert!(EmailAddress::new(String::new()).is_err());
    }
}
