use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::generate_token::generate_token;
use super::handlers::list_tokens::list_tokens;
use super::handlers::login::login;
use super::handlers::login_with_invitation::login_with_invitation;
use super::handlers::register::register;
use super::handlers::update_token::update_token;
use super::handlers::validate_token::validate_token;
use super::middleware::authenticate;
use super::middleware::require_admin;
use super::rate_limit::rate_limit;
use super::rate_limit::RateLimiter;
use crate::domain::session::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
}

pub fn create_router(auth_service: Arc<dyn AuthServicePort>, rate_limiter: RateLimiter) -> Router {
    let state = AppState { auth_service };

    let public_routes = Router::new()
        .route("/api/v1/register", post(register))
        .route("/api/v1/login", post(login))
        .route("/api/v1/login/invitation", post(login_with_invitation));

    let rate_limited_routes = Router::new()
        .route("/api/v1/tokens/:token/validation", post(validate_token))
        .route_layer(middleware::from_fn_with_state(rate_limiter, rate_limit));

    // Layers run outermost first: authenticate, then require_admin.
    let admin_routes = Router::new()
        .route("/api/v1/tokens/generate", post(generate_token))
        .route("/api/v1/tokens", get(list_tokens))
        .route("/api/v1/tokens/:token", put(update_token))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

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

    Router::new()
        .merge(public_routes)
        .merge(rate_limited_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
