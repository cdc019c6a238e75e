use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::header;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_chirp::create_chirp;
use super::handlers::create_user::create_user;
use super::handlers::delete_chirp::delete_chirp;
use super::handlers::get_chirp::get_chirp;
use super::handlers::health::healthz;
use super::handlers::list_chirps::list_chirps;
use super::handlers::login::login;
use super::handlers::metrics::admin_metrics;
use super::handlers::metrics::metrics;
use super::handlers::metrics::reset;
use super::handlers::update_user::update_user;
use super::handlers::validate_chirp::validate_chirp;
use super::middleware::authenticate as auth_middleware;
use super::middleware::count_hits;
use super::middleware::HitCounter;
use crate::domain::chirp::service::ChirpService;
use crate::domain::user::service::UserService;
use crate::outbound::repositories::JsonFileDatabase;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<JsonFileDatabase>>,
    pub chirp_service: Arc<ChirpService<JsonFileDatabase>>,
    pub authenticator: Arc<Authenticator>,
    pub hits: Arc<HitCounter>,
}

pub fn create_router(
    user_service: Arc<UserService<JsonFileDatabase>>,
    chirp_service: Arc<ChirpService<JsonFileDatabase>>,
    authenticator: Arc<Authenticator>,
    static_dir: impl AsRef<Path>,
) -> Router {
    let state = AppState {
        user_service,
        chirp_service,
        authenticator,
        hits: Arc::new(HitCounter::new()),
    };

    let public_routes = Router::new()
        .route("/api/healthz", get(healthz))
        .route("/api/metrics", get(metrics))
        .route("/api/reset", get(reset))
        .route("/admin/metrics", get(admin_metrics))
        .route("/api/validate_chirp", post(validate_chirp))
        .route("/api/users", post(create_user))
        .route("/api/login", post(login))
        .route("/api/chirps", get(list_chirps))
        .route("/api/chirps/:chirp_id", get(get_chirp));

    let protected_routes = Router::new()
        .route("/api/users", put(update_user))
        .route("/api/chirps", post(create_chirp))
        .route("/api/chirps/:chirp_id", delete(delete_chirp))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let file_server = Router::new()
        .nest_service("/app", ServeDir::new(static_dir.as_ref()))
        .route_layer(middleware::from_fn_with_state(state.clone(), count_hits));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers(Any)
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(file_server)
        .layer(trace_layer)
        .layer(cors_layer)
        .with_state(state)
}
