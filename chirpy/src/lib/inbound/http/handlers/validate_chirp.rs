use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::chirp::errors::ChirpError;
use crate::domain::chirp::models::ChirpBody;

/// Check a chirp body without storing it and return the cleaned text.
pub async fn validate_chirp(
    Json(body): Json<ValidateChirpRequest>,
) -> Result<ApiSuccess<ValidateChirpResponseData>, ApiError> {
    let body = ChirpBody::new(body.body).map_err(ChirpError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ValidateChirpResponseData {
            cleaned_body: body.as_str().to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidateChirpRequest {
    body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateChirpResponseData {
    pub cleaned_body: String,
}
