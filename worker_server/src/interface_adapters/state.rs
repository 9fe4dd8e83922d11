use crate::use_cases::Lobby;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    // Registry of running rooms on this worker.
    pub lobby: Arc<Lobby>,
    // HMAC key for verifying session tokens minted by the master.
    pub session_secret: Arc<Vec<u8>>,
}
