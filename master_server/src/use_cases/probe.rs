// Periodic occupancy probes that reconcile the registry's estimates with
// what each worker actually reports.

use crate::domain::WorkerRegistry;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug)]
pub enum StatusError {
    Unreachable,
    Rejected(u16),
    Decode,
}

/// Seam for fetching a worker's room occupancy over HTTP.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, base_url: &str) -> Result<HashMap<String, usize>, StatusError>;
}

/// Polls every registered worker on a fixed interval. Each host is probed
/// on its own task so an unreachable worker never stalls the sweep; a
/// worker that fails a probe keeps its last believed counts until it
/// answers again.
pub async fn probe_task(
    registry: Arc<WorkerRegistry>,
    source: Arc<dyn StatusSource>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        for addr in registry.host_addrs() {
            let registry = registry.clone();
            let source = source.clone();
            tokio::spawn(async move {
                match source.fetch_status(&addr.base_url()).await {
                    Ok(rooms) => {
                        debug!(worker = %addr.key(), rooms = rooms.len(), "probe ok");
                        registry.apply_status(&addr.key(), rooms);
                    }
                    Err(e) => {
                        warn!(worker = %addr.key(), error = ?e, "status probe failed");
                    }
                }
            });
        }
    }
}
