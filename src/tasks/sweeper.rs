//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries, so
//! tags nobody asks for again do not hold memory indefinitely.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStore, Clock};

/// Shortest period the sweep loop will sleep between runs.
const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(10);

/// Spawns a background task that sweeps expired entries every `period`.
///
/// The task runs in an infinite loop, sleeping between runs, and takes the
/// store's write lock only for the sweep itself. Entries with a fetch in
/// flight are never removed.
///
/// # Returns
/// A JoinHandle for the spawned task; aborting it stops the sweep.
///
/// # Example
/// ```ignore
/// let handle = spawn_sweep_task(store.clone(), Arc::new(SystemClock), Duration::from_secs(60));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task(
    store: Arc<RwLock<CacheStore>>,
    clock: Arc<dyn Clock>,
    period: Duration,
) -> JoinHandle<()> {
    let period = period.max(MIN_SWEEP_PERIOD);

    tokio::spawn(async move {
        info!("Starting expiry sweep task with interval of {:?}", period);

        loop {
            tokio::time::sleep(period).await;

            let removed = {
                let mut store = store.write().await;
                store.sweep_expired(clock.now_ms())
            };

            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
