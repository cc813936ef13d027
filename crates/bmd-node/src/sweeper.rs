use std::sync::Arc;
use std::time::Duration;

use bmd_store::{ObjectStore, StoreError};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Run `RemoveExpiredObjects` every `interval` until `shutdown` fires or the
/// store is closed. The handle resolves to the total number of objects swept.
///
/// The first sweep runs immediately.
pub fn spawn_sweeper(
    store: Arc<dyn ObjectStore>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<usize> {
    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "sweeper started");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut total = 0;

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!(total, "sweeper shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match store.remove_expired_objects() {
                        Ok(removed) => {
                            total += removed;
                            debug!(removed, "sweep finished");
                        }
                        Err(StoreError::Closed) => {
                            info!(total, "store closed; sweeper stopping");
                            break;
                        }
                        Err(e) => error!(error = %e, "sweep failed"),
                    }
                }
            }
        }
        total
    })
}
