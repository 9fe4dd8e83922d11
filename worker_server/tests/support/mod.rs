// Shared primitives for one-time server bootstrapping across integration tests.
// Each test binary uses its own subset of these helpers.
#![allow(dead_code)]

use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

pub const TEST_SECRET: &str = "integration-test-secret";

static WORKER_URL: OnceLock<String> = OnceLock::new();
static WORKER_READY: OnceLock<()> = OnceLock::new();

// Ensure the test worker is running and return the shared base URL.
pub fn ensure_worker() -> &'static str {
    WORKER_READY.get_or_init(|| {
        // Every process in the test fleet shares the same signing key.
        std::env::set_var("SESSION_SECRET", TEST_SECRET);

        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // An OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));
                worker_server::run(listener).await.expect("worker failed");
            });
        });
        let url = wait_for_readiness(published_url);
        let _ = WORKER_URL.set(url);
    });

    WORKER_URL
        .get()
        .expect("worker url should be initialized")
        .as_str()
}

// Wait for URL publication, then for the socket to accept TCP connections.
pub fn wait_for_readiness(published_url: Arc<OnceLock<String>>) -> String {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return base_url;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}

/// The `host:port` part of the worker's base URL.
pub fn worker_addr(base_url: &str) -> (String, u16) {
    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");
    let (host, port) = addr.split_once(':').expect("addr should be host:port");
    (host.to_string(), port.parse().expect("port should parse"))
}
