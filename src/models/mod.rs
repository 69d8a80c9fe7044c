//! Request and Response models for the gallery cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ImagesQuery, MAX_IMAGE_LIMIT, MAX_TAG_LENGTH};
pub use responses::{
    CacheEntryResponse, CacheStatusResponse, ClearCacheResponse, ErrorResponse,
    GalleryImagesResponse, HealthResponse,
};
