//! Gallery Cache - image-metadata cache for a media gallery server
//!
//! Fetches image lists by tag from a remote image API, coalescing concurrent
//! requests, bounding memory with LRU eviction and expiring stale tags.

pub mod admin;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod tasks;

pub use admin::AdminGate;
pub use api::AppState;
pub use cache::ImageCache;
pub use config::Config;
pub use tasks::spawn_sweep_task;
