//! API Module
//!
//! HTTP handlers and routing for the gallery cache.
//!
//! # Endpoints
//! - `GET /api/galleries/:tag/images` - Cached images for a gallery tag
//! - `GET /admin/cache-status` - Cache status (admin)
//! - `POST /admin/clear-cache` - Clear the cache (admin)
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
