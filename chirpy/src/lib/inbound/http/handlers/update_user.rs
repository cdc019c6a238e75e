use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::create_user::UserResponseData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateUserCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

/// HTTP request body for updating the caller's credentials (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    pub password: String,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, UserError> {
        Ok(UpdateUserCommand {
            email: EmailAddress::new(self.email)?,
            password: self.password,
        })
    }
}

/// Update the authenticated user. The target is always the token's subject.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let command = req.try_into_command()?;

    state
        .user_service
        .update_user(&caller.user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
