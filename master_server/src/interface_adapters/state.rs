use crate::domain::WorkerRegistry;
use crate::interface_adapters::clients::worker::WorkerClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    // Fleet bookkeeping shared with the probe task.
    pub registry: Arc<WorkerRegistry>,
    // HTTP client for the workers' internal API.
    pub worker_client: Arc<WorkerClient>,
    // HMAC key for minting session tokens.
    pub session_secret: Arc<Vec<u8>>,
}
