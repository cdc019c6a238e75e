use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;

use crate::inbound::http::router::AppState;

pub async fn metrics(State(state): State<AppState>) -> String {
    format!("Hits: {}", state.hits.get())
}

pub async fn reset(State(state): State<AppState>) -> StatusCode {
    state.hits.reset();
    tracing::info!("Hit counter reset");
    StatusCode::OK
}

pub async fn admin_metrics(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html><body><h1>Welcome, Chirpy Admin</h1><p>Chirpy has been visited {} times!</p></body></html>",
        state.hits.get()
    ))
}
