use crate::domain::fingerprint::Fingerprint;
use crate::services::storage::PageStore;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shortest period the cleaner will tick at.
pub const MIN_CLEANUP_EVERY: Duration = Duration::from_millis(1);

/// Spawns the reclamation task. It sweeps the store every `every` until
/// `shutdown` is cancelled. Periods below [`MIN_CLEANUP_EVERY`] are raised
/// to it.
pub fn start_cleanup(store: PageStore, every: Duration, shutdown: CancellationToken) -> JoinHandle<()> {
    if every < MIN_CLEANUP_EVERY {
        warn!(?every, min = ?MIN_CLEANUP_EVERY, "cleanup period too short, clamping");
    }
    let every = every.max(MIN_CLEANUP_EVERY);

    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(?every, "page cleaner started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    sweep(&store, OffsetDateTime::now_utc()).await;
                }
                _ = shutdown.cancelled() => break,
            }
        }
        info!("page cleaner stopped");
    })
}

/// One scan-and-evict pass. The scan holds the read lock; every eviction
/// is its own write-lock acquisition and re-checks the deadline, so a page
/// replaced after the scan survives.
pub async fn sweep(store: &PageStore, now: OffsetDateTime) -> Vec<Fingerprint> {
    debug!("starting scheduled cleaning for short lived pages");
    let expired = store.expired_at(now).await;

    let mut removed = Vec::with_capacity(expired.len());
    for (key, deadline) in expired {
        if store.remove_expired(&key, now).await.is_some() {
            info!(page_hash = %key, %deadline, "removing page due timeout");
            removed.push(key);
        }
    }
    debug!(removed = removed.len(), "finished scheduled cleaning for short lived pages");
    removed
}
