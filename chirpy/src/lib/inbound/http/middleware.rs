use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// Extension type to store authenticated user ID in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Middleware that validates the bearer token and adds the caller to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = state
        .authenticator
        .authenticate(req.headers())
        .map_err(|e| {
            tracing::warn!(
                method = %req.method(),
                uri = %req.uri(),
                "Authentication failed: {}",
                e
            );
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: UserId(user_id),
    });

    Ok(next.run(req).await)
}

/// Count of requests served by the static file server.
#[derive(Debug, Default)]
pub struct HitCounter {
    hits: AtomicU64,
}

impl HitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) -> u64 {
        self.hits.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn get(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }
}

/// Middleware that counts a hit before passing the request on
pub async fn count_hits(State(state): State<AppState>, req: Request, next: Next) -> Response {
    state.hits.increment();
    next.run(req).await
}
