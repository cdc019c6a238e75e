use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::chirp::errors::ChirpError;
use crate::domain::chirp::models::ChirpId;
use crate::domain::chirp::ports::ChirpServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Delete a chirp. Only its author may do so.
pub async fn delete_chirp(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let chirp_id = ChirpId::from_string(&id).map_err(ChirpError::from)?;

    state
        .chirp_service
        .delete_chirp(&chirp_id, &caller.user_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
