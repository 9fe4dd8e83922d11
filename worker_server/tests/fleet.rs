// End-to-end: a master and a worker wired together, then one client
// joining through the master and playing over the worker's socket.

mod support;

use futures_util::{SinkExt, StreamExt};
use std::sync::{Arc, OnceLock};
use tokio_tungstenite::tungstenite::Message;
use worker_server::interface_adapters::protocol::{
    decode_server, encode_client, ClientMessage, EntityDataDto, ServerMessage,
};

static MASTER_URL: OnceLock<String> = OnceLock::new();
static MASTER_READY: OnceLock<()> = OnceLock::new();

fn ensure_master() -> &'static str {
    MASTER_READY.get_or_init(|| {
        std::env::set_var("SESSION_SECRET", support::TEST_SECRET);

        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));
                master_server::run(listener).await.expect("master failed");
            });
        });
        let url = support::wait_for_readiness(published_url);
        let _ = MASTER_URL.set(url);
    });

    MASTER_URL
        .get()
        .expect("master url should be initialized")
        .as_str()
}

#[tokio::test]
async fn join_through_master_and_play() {
    let worker_url = support::ensure_worker();
    let master_url = ensure_master();
    let client = reqwest::Client::new();

    // The worker announces itself, as run_with_config would at startup.
    let (host, port) = support::worker_addr(worker_url);
    let res = client
        .put(format!("{master_url}/internal/register"))
        .json(&serde_json::json!({ "host": host, "port": port }))
        .send()
        .await
        .expect("register should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);

    // Joining provisions a room on the worker and mints a session token.
    let join: serde_json::Value = client
        .post(format!("{master_url}/api/join"))
        .json(&serde_json::json!({ "username": "ace" }))
        .send()
        .await
        .expect("join should succeed")
        .json()
        .await
        .expect("join response should be json");
    let token = join["token"].as_str().expect("token");
    let client_id = join["clientId"].as_str().expect("clientId");
    assert_eq!(join["host"].as_str(), Some(host.as_str()));

    // Connect to the assigned room with the minted token.
    let ws_url = format!("ws://{host}:{port}/api/room/ws?token={token}");
    let (mut socket, _) = tokio_tungstenite::connect_async(&ws_url)
        .await
        .expect("websocket should connect");

    // First frame is the full snapshot, including our freshly spawned ship.
    let snapshot = loop {
        let frame = socket
            .next()
            .await
            .expect("socket should stay open")
            .expect("frame should arrive");
        if let Message::Binary(bytes) = frame {
            match decode_server(&bytes).expect("frame should decode") {
                ServerMessage::Snapshot(entities) => break entities,
                other => panic!("expected snapshot first, got {other:?}"),
            }
        }
    };
    let me = snapshot
        .iter()
        .find(|e| e.id == client_id)
        .expect("snapshot should contain our player");
    match &me.data {
        EntityDataDto::Player { username, .. } => assert_eq!(username, "ace"),
        other => panic!("expected player data, got {other:?}"),
    }

    // Send an input report and wait for its echo.
    let input = encode_client(&ClientMessage::Input {
        mouse_x: 1.0,
        mouse_y: 0.0,
        mouse_pressed: false,
    })
    .expect("encode input");
    socket
        .send(Message::Binary(input.into()))
        .await
        .expect("send input");

    let mut saw_echo = false;
    let mut saw_delta_with_me = false;
    for _ in 0..200 {
        let frame = tokio::time::timeout(std::time::Duration::from_secs(2), socket.next())
            .await
            .expect("frame should arrive in time")
            .expect("socket should stay open")
            .expect("frame should decode");
        let Message::Binary(bytes) = frame else {
            continue;
        };
        match decode_server(&bytes).expect("frame should decode") {
            ServerMessage::Input { id, mouse_x, .. } if id == client_id => {
                assert_eq!(mouse_x, 1.0);
                saw_echo = true;
            }
            ServerMessage::Delta(delta) => {
                if delta.updated.iter().any(|e| e.id == client_id) {
                    saw_delta_with_me = true;
                }
            }
            _ => {}
        }
        if saw_echo && saw_delta_with_me {
            break;
        }
    }
    assert!(saw_echo, "input echo never arrived");
    assert!(saw_delta_with_me, "no delta carried the moving player");

    socket.close(None).await.expect("close socket");
}

#[tokio::test]
async fn join_without_workers_is_refused() {
    // A master with no registered workers cannot place anyone. Uses its
    // own master instance to avoid cross-test registration order issues.
    std::env::set_var("SESSION_SECRET", support::TEST_SECRET);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        let _ = master_server::run(listener).await;
    });

    let client = reqwest::Client::new();
    let mut last_status = None;
    for _ in 0..50 {
        match client
            .post(format!("http://{addr}/api/join"))
            .json(&serde_json::json!({ "username": "ace" }))
            .send()
            .await
        {
            Ok(res) => {
                last_status = Some(res.status());
                break;
            }
            Err(_) => tokio::time::sleep(std::time::Duration::from_millis(20)).await,
        }
    }
    assert_eq!(last_status, Some(reqwest::StatusCode::NOT_FOUND));
}
