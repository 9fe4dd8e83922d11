use std::{env, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn master_port() -> u16 {
    env::var("MASTER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5000)
}

/// Players per room before the master provisions a new one. Kept below
/// the workers' hard limit so placement has headroom for races.
pub fn room_capacity() -> usize {
    env::var("ROOM_CAPACITY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(16)
}

/// Shared HMAC key for session tokens. No default: tokens minted with an
/// ad-hoc key would be rejected by every worker.
pub fn session_secret() -> Option<Vec<u8>> {
    env::var("SESSION_SECRET").ok().map(String::into_bytes)
}

pub fn probe_interval() -> Duration {
    let secs = env::var("PROBE_INTERVAL_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(60);
    Duration::from_secs(secs)
}

pub const WORKER_HTTP_TIMEOUT: Duration = Duration::from_secs(5);
