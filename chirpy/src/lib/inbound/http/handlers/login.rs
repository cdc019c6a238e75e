use auth::AuthenticationError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Exchange email and password for a token.
///
/// Unknown email and wrong password produce the same 401 response.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let user = state
        .user_service
        .get_user_by_email(&body.email)
        .await
        .map_err(|e| match e {
            UserError::NotFoundByEmail(_) => ApiError::invalid_credentials(),
            _ => ApiError::from(e),
        })?;

    let result = state
        .authenticator
        .login(&body.password, &user.password_hash, user.id.0)
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => {
                tracing::warn!(user_id = %user.id, "Login rejected");
                ApiError::invalid_credentials()
            }
            AuthenticationError::Password(err) => {
                ApiError::InternalServerError(format!("Password verification failed: {}", err))
            }
            AuthenticationError::Token(err) => {
                ApiError::InternalServerError(format!("Token generation failed: {}", err))
            }
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            id: user.id.0,
            email: user.email.as_str().to_string(),
            token: result.access_token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub id: u64,
    pub email: String,
    pub token: String,
}
