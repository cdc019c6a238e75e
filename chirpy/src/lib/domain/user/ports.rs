use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated email and plaintext password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Password hashing failed
    /// * `StorageError` - Storage operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `StorageError` - Storage operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Errors
    /// * `NotFoundByEmail` - No user with this email
    /// * `StorageError` - Storage operation failed
    async fn get_user_by_email(&self, email: &str) -> Result<User, UserError>;

    /// Replace email and password of an existing user.
    ///
    /// # Arguments
    /// * `id` - Authenticated user ID
    /// * `command` - New email and plaintext password
    ///
    /// # Returns
    /// Updated user entity
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email belongs to another user
    /// * `Password` - Password hashing failed
    /// * `StorageError` - Storage operation failed
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;
}

/// Persistence operations for user aggregate.
///
/// Implementations serialise writes so concurrent credential updates for the
/// same user cannot be lost.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user, assigning the next id.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `StorageError` - Storage operation failed
    async fn create(&self, email: &EmailAddress, password_hash: &str) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Overwrite email and password hash of an existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email belongs to another user
    /// * `StorageError` - Storage operation failed
    async fn update(
        &self,
        id: &UserId,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<User, UserError>;
}
