//! API Routes
//!
//! Configures the Axum router with the gallery and admin endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_status_handler, clear_cache_handler, gallery_images_handler, health_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/galleries/:tag/images` - Cached images for a gallery tag
/// - `GET /admin/cache-status` - Per-tag cache status (bearer token)
/// - `POST /admin/clear-cache` - Empty the cache (bearer token)
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/galleries/:tag/images", get(gallery_images_handler))
        .route("/admin/cache-status", get(cache_status_handler))
        .route("/admin/clear-cache", post(clear_cache_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
