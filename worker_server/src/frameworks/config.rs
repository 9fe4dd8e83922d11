use std::{env, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn worker_port() -> u16 {
    env::var("WORKER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

/// Address advertised to the master; must be reachable by game clients.
pub fn public_host() -> String {
    env::var("PUBLIC_HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
}

pub fn master_url() -> String {
    env::var("MASTER_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string())
}

/// Shared HMAC key for session tokens. No default: a worker without the
/// fleet's key would reject every client.
pub fn session_secret() -> Option<Vec<u8>> {
    env::var("SESSION_SECRET").ok().map(String::into_bytes)
}

pub fn master_register_timeout() -> Duration {
    let millis = env::var("MASTER_REGISTER_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(1500);
    Duration::from_millis(millis)
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const EVENT_BROADCAST_CAPACITY: usize = 128;

pub const TICK_INTERVAL: Duration = Duration::from_millis(1000 / 60);
