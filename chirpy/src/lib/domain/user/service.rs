use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = self.repository.create(&command.email, &password_hash).await?;
        tracing::info!(user_id = %user.id, "User created");

        Ok(user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, UserError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::NotFoundByEmail(email.to_string()))
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = self
            .repository
            .update(id, &command.email, &password_hash)
            .await?;
        tracing::info!(user_id = %user.id, "User credentials updated");

        Ok(user)
    }
}
