//! In-memory image provider for tests and offline runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{ImageProvider, ImageRecord};
use crate::error::{CacheError, Result};

/// Scriptable provider: serves canned records per tag, can be switched to
/// failing, and counts every call it receives.
#[derive(Debug, Default)]
pub struct StubProvider {
    images: Mutex<HashMap<String, Vec<ImageRecord>>>,
    failing: AtomicBool,
    delay_ms: AtomicUsize,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `count` generated records for `tag`.
    pub fn with_images(self, tag: &str, count: usize) -> Self {
        self.set_images(tag, count);
        self
    }

    pub fn set_images(&self, tag: &str, count: usize) {
        let records = (0..count)
            .map(|i| ImageRecord::new(format!("{}-{}", tag, i), 1600, 1067))
            .collect();
        if let Ok(mut images) = self.images.lock() {
            images.insert(tag.to_string(), records);
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes every call wait before answering.
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms
            .store(delay.as_millis() as usize, Ordering::SeqCst);
    }

    /// Number of `fetch_by_tag` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageProvider for StubProvider {
    async fn fetch_by_tag(&self, tag: &str, limit: usize) -> Result<Vec<ImageRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::Provider(format!(
                "stub provider failing for tag '{}'",
                tag
            )));
        }

        let images = self
            .images
            .lock()
            .map_err(|_| CacheError::Internal("stub provider lock poisoned".to_string()))?;
        Ok(images
            .get(tag)
            .map(|records| records.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
