//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: Removes cache entries older than the freshness window

mod sweeper;

pub use sweeper::spawn_sweep_task;
