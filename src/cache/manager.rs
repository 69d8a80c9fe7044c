//! Image Cache Manager
//!
//! Owns the cache store, the remote provider and the sweep task. Coalesces
//! concurrent requests per tag so the provider sees at most one fetch per
//! tag at a time.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::{
    CacheLimits, CacheStatus, CacheStore, ClearSummary, Clock, ImageList, PendingFetch,
    SystemClock, DEFAULT_IMAGE_LIMIT,
};
use crate::config::Config;
use crate::provider::ImageProvider;
use crate::tasks::spawn_sweep_task;

// == Image Cache ==
/// Cheaply cloneable handle to one cache instance.
#[derive(Clone)]
pub struct ImageCache {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<RwLock<CacheStore>>,
    provider: Arc<dyn ImageProvider>,
    clock: Arc<dyn Clock>,
    limits: CacheLimits,
    default_limit: usize,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Ok(mut sweeper) = self.sweeper.lock() {
            if let Some(handle) = sweeper.take() {
                handle.abort();
            }
        }
    }
}

impl ImageCache {
    // == Constructors ==
    pub fn new(limits: CacheLimits, provider: Arc<dyn ImageProvider>, clock: Arc<dyn Clock>) -> Self {
        Self::with_default_limit(limits, DEFAULT_IMAGE_LIMIT, provider, clock)
    }

    pub fn with_default_limit(
        limits: CacheLimits,
        default_limit: usize,
        provider: Arc<dyn ImageProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store: Arc::new(RwLock::new(CacheStore::new(limits))),
                provider,
                clock,
                limits,
                default_limit,
                sweeper: Mutex::new(None),
            }),
        }
    }

    /// Builds a cache on the wall clock using the configured bounds.
    pub fn from_config(config: &Config, provider: Arc<dyn ImageProvider>) -> Self {
        Self::with_default_limit(
            config.cache_limits(),
            config.default_image_limit,
            provider,
            Arc::new(SystemClock),
        )
    }

    pub fn default_limit(&self) -> usize {
        self.inner.default_limit
    }

    pub fn limits(&self) -> CacheLimits {
        self.inner.limits
    }

    fn now(&self) -> u64 {
        self.inner.clock.now_ms()
    }

    // == Get Images ==
    /// Returns the current image list for `tag`.
    ///
    /// Serves fresh entries directly, joins a fetch already in flight for the
    /// tag, or starts one. Never fails: provider errors fall back to the
    /// previously cached images, then to an empty list.
    ///
    /// The provider is always asked for `default_limit` images, so the cached
    /// entry does not depend on which caller missed first. Each caller gets
    /// its own copy cut to `limit`.
    pub async fn get_images(&self, tag: &str, limit: usize) -> ImageList {
        let fetch = {
            let mut store = self.inner.store.write().await;
            let now = self.now();

            if let Some(images) = store.lookup_fresh(tag, now) {
                debug!("Cache hit for tag '{}' ({} images)", tag, images.len());
                return truncate(images, limit);
            }

            match store.join_pending(tag) {
                Some(fetch) => {
                    debug!("Joining in-flight fetch for tag '{}'", tag);
                    fetch
                }
                None => {
                    let Some(fetch) = self.spawn_fetch(tag, self.inner.default_limit) else {
                        return Arc::new(Vec::new());
                    };
                    store.begin_fetch(tag, fetch.clone(), now);
                    fetch
                }
            }
        };

        truncate(fetch.await, limit)
    }

    // Runs the provider call on its own task so the fetch settles even if
    // every waiting caller goes away.
    fn spawn_fetch(&self, tag: &str, limit: usize) -> Option<PendingFetch> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            error!("No tokio runtime available to fetch tag '{}'", tag);
            return None;
        };

        let cache = self.clone();
        let owned_tag = tag.to_string();
        let handle = runtime.spawn(async move { cache.run_fetch(owned_tag, limit).await });

        let tag = tag.to_string();
        let fetch = async move {
            match handle.await {
                Ok(images) => images,
                Err(err) => {
                    error!("Fetch task for tag '{}' did not finish: {}", tag, err);
                    Arc::new(Vec::new())
                }
            }
        }
        .boxed()
        .shared();

        Some(fetch)
    }

    async fn run_fetch(&self, tag: String, limit: usize) -> ImageList {
        info!("Fetching images for tag '{}' (limit {})", tag, limit);

        let result = AssertUnwindSafe(self.inner.provider.fetch_by_tag(&tag, limit))
            .catch_unwind()
            .await;

        let mut store = self.inner.store.write().await;
        let now = self.now();

        match result {
            Ok(Ok(records)) => {
                let images = store.complete_fetch(&tag, records, now);
                info!("Cached {} images for tag '{}'", images.len(), tag);

                let evicted = store.evict_to_bounds();
                if !evicted.is_empty() {
                    info!(
                        "Evicted {} entries to stay within bounds: {:?}",
                        evicted.len(),
                        evicted
                    );
                }
                images
            }
            Ok(Err(err)) => {
                let images = store.fail_fetch(&tag);
                if images.is_empty() {
                    warn!("Fetch for tag '{}' failed: {}", tag, err);
                } else {
                    warn!(
                        "Fetch for tag '{}' failed, serving {} stale images: {}",
                        tag,
                        images.len(),
                        err
                    );
                }
                images
            }
            Err(_) => {
                error!("Image provider panicked while fetching tag '{}'", tag);
                store.fail_fetch(&tag)
            }
        }
    }

    // == Sweep ==
    /// Removes expired entries now. Returns how many were removed.
    pub async fn sweep_expired(&self) -> usize {
        let mut store = self.inner.store.write().await;
        store.sweep_expired(self.now())
    }

    /// Starts the periodic expiry sweep. Does nothing if it is already running.
    pub fn start_sweeper(&self, period: Duration) {
        let Ok(mut sweeper) = self.inner.sweeper.lock() else {
            error!("Sweeper handle lock poisoned, expiry sweep not started");
            return;
        };

        if sweeper.as_ref().is_some_and(|h| !h.is_finished()) {
            debug!("Expiry sweeper already running");
            return;
        }

        *sweeper = Some(spawn_sweep_task(
            self.inner.store.clone(),
            self.inner.clock.clone(),
            period,
        ));
    }

    pub fn is_sweeper_running(&self) -> bool {
        self.inner
            .sweeper
            .lock()
            .map(|s| s.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Cancels the sweep task. In-flight fetches are left to finish.
    pub fn shutdown(&self) {
        if let Ok(mut sweeper) = self.inner.sweeper.lock() {
            if let Some(handle) = sweeper.take() {
                handle.abort();
                info!("Expiry sweeper stopped");
            }
        }
    }

    // == Admin ==
    pub async fn status(&self) -> CacheStatus {
        let store = self.inner.store.read().await;
        store.status(self.now())
    }

    /// Empties the table. Fetches already in flight still complete and
    /// repopulate their tag.
    pub async fn clear(&self) -> ClearSummary {
        let summary = self.inner.store.write().await.clear();
        info!(
            "Cache cleared: {} entries, {} bytes",
            summary.entries_cleared, summary.size_cleared_bytes
        );
        summary
    }
}

// Shares the cached list when it already fits, otherwise copies the prefix.
fn truncate(images: ImageList, limit: usize) -> ImageList {
    if images.len() <= limit {
        images
    } else {
        Arc::new(images[..limit].to_vec())
    }
}
