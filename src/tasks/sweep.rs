//! Entry Sweep Task
//!
//! Background task that periodically reclaims expired entry files from the
//! persistent store. Purely an optimization: every read already enforces
//! expiry lazily, the sweep only frees disk for entries nobody reads again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::storage::PersistentStore;

/// Spawns a background task that periodically removes expired entry files.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps.
///
/// # Arguments
/// * `store` - Shared reference to the persistent store
/// * `sweep_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_sweep_task(store: Arc<PersistentStore>, sweep_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting entry sweep task with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            let removed = store.purge_expired();

            // Log sweep statistics
            if removed > 0 {
                info!("Entry sweep: removed {} expired entries", removed);
            } else {
                debug!("Entry sweep: no expired entries found");
            }
        }
    })
}
