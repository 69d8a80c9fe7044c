//! API Handlers
//!
//! HTTP request handlers for the gallery and admin endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};

use crate::admin::AdminGate;
use crate::cache::ImageCache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::requests::validate_tag;
use crate::models::{
    CacheStatusResponse, ClearCacheResponse, GalleryImagesResponse, HealthResponse, ImagesQuery,
};
use crate::provider::ImageProvider;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Image cache in front of the remote provider
    pub cache: ImageCache,
    /// Admin bearer-token gate
    pub admin: AdminGate,
}

impl AppState {
    pub fn new(cache: ImageCache, admin: AdminGate) -> Self {
        Self { cache, admin }
    }

    /// Creates a new AppState from configuration.
    ///
    /// The expiry sweeper is not started here; callers own that lifecycle.
    pub fn from_config(config: &Config, provider: Arc<dyn ImageProvider>) -> Self {
        Self::new(
            ImageCache::from_config(config, provider),
            AdminGate::new(config.admin_token.clone()),
        )
    }
}

/// Handler for GET /api/galleries/:tag/images
///
/// Returns the cached images for a gallery tag. Provider failures never
/// surface here; the worst case is an empty list.
pub async fn gallery_images_handler(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    Query(query): Query<ImagesQuery>,
) -> Result<Json<GalleryImagesResponse>> {
    if let Some(error_msg) = validate_tag(&tag) {
        return Err(CacheError::InvalidRequest(error_msg));
    }
    let limit = query
        .resolve_limit(state.cache.default_limit())
        .map_err(CacheError::InvalidRequest)?;

    let images = state.cache.get_images(&tag, limit).await;

    Ok(Json(GalleryImagesResponse::new(tag, &images, limit)))
}

/// Handler for GET /admin/cache-status
///
/// Requires `Authorization: Bearer <CACHE_ADMIN_TOKEN>`.
pub async fn cache_status_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CacheStatusResponse>> {
    state.admin.authorize(&headers)?;

    let status = state.cache.status().await;
    Ok(Json(CacheStatusResponse::from(status)))
}

/// Handler for POST /admin/clear-cache
///
/// Requires `Authorization: Bearer <CACHE_ADMIN_TOKEN>`.
pub async fn clear_cache_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ClearCacheResponse>> {
    state.admin.authorize(&headers)?;

    let summary = state.cache.clear().await;
    Ok(Json(ClearCacheResponse::from(summary)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
