use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::chirp::errors::ChirpError;
use crate::domain::chirp::models::Chirp;
use crate::domain::chirp::models::ChirpBody;
use crate::domain::chirp::models::CreateChirpCommand;
use crate::domain::chirp::ports::ChirpServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_chirp(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<CreateChirpRequest>,
) -> Result<ApiSuccess<ChirpResponseData>, ApiError> {
    let command = CreateChirpCommand {
        body: ChirpBody::new(body.body).map_err(ChirpError::from)?,
        author_id: caller.user_id,
    };

    state
        .chirp_service
        .create_chirp(command)
        .await
        .map_err(ApiError::from)
        .map(|ref chirp| ApiSuccess::new(StatusCode::CREATED, chirp.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateChirpRequest {
    body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChirpResponseData {
    pub id: u64,
    pub body: String,
    pub author_id: u64,
    pub created_at: DateTime<Utc>,
}

impl From<&Chirp> for ChirpResponseData {
    fn from(chirp: &Chirp) -> Self {
        Self {
            id: chirp.id.0,
            body: chirp.body.as_str().to_string(),
            author_id: chirp.author_id.0,
            created_at: chirp.created_at,
        }
    }
}
