//! Route definitions and cross-cutting layers.

use axum::http::{HeaderValue, Method};
use axum::{Router, routing::get};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::AppState;
use crate::config::CorsConfig;
use crate::handlers;

/// Audio server routes, without layers.
pub fn audio_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Streaming
        .route("/audio/{filename}", get(handlers::stream_audio))
        // Catalog
        .route("/info", get(handlers::list_info))
        .route("/info/{filename}", get(handlers::file_info))
}

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let cors = build_cors_layer(&state.config.cors);

    let router = audio_routes().with_state(state);
    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(trace_layer)
}

/// Build the CORS layer from configuration, or `None` when disabled.
///
/// Credentials are allowed, so request headers are mirrored instead of
/// answered with a wildcard.
fn build_cors_layer(cors: &CorsConfig) -> Option<CorsLayer> {
    if !cors.enabled {
        tracing::info!("CORS: disabled");
        return None;
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("CORS: Invalid origin in config: {}", origin);
                None
            })
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS: No valid origins configured, denying all cross-origin requests");
        // Matches no origin, including the literal `null` sent by sandboxed pages.
        return Some(CorsLayer::new().allow_origin(AllowOrigin::predicate(|_, _| false)));
    }

    tracing::info!("CORS: Allowing {} origin(s)", origins.len());
    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true),
    )
}
