//! Periodic eviction of expired pass summaries.
//!
//! Reads never block on eviction (an expired entry is treated as a miss),
//! so this loop only keeps the cache map from holding stale payloads.

use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

const PRUNE_INTERVAL_SECS: u64 = 60;

/// Start the summary prune loop.
pub async fn run_summary_prune_loop(state: Arc<AppState>) {
    let mut ticker = interval(Duration::from_secs(PRUNE_INTERVAL_SECS));

    loop {
        ticker.tick().await;

        let before = state.aggregator().cached_summary_count();
        state.aggregator().prune_expired();
        let after = state.aggregator().cached_summary_count();

        if after < before {
            tracing::debug!("Evicted {} expired pass summaries", before - after);
        }
    }
}
