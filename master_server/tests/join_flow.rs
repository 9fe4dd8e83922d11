// Master API against a stub worker that accepts every room create.

use axum::{routing::get, routing::put, Json, Router};
use std::net::SocketAddr;

const TEST_SECRET: &str = "integration-test-secret";

async fn start_stub_worker() -> SocketAddr {
    let app = Router::new()
        .route(
            "/internal/create",
            put(|| async { (axum::http::StatusCode::CREATED, Json(serde_json::json!({}))) }),
        )
        .route(
            "/internal/status",
            get(|| async { Json(serde_json::json!({ "rooms": [] })) }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub worker");
    let addr = listener.local_addr().expect("stub worker addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

async fn start_master() -> SocketAddr {
    std::env::set_var("SESSION_SECRET", TEST_SECRET);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind master");
    let addr = listener.local_addr().expect("master addr");
    tokio::spawn(async move {
        let _ = master_server::run(listener).await;
    });
    addr
}

#[tokio::test]
async fn join_mints_a_verifiable_token() {
    let worker_addr = start_stub_worker().await;
    let master_addr = start_master().await;
    let client = reqwest::Client::new();

    let res = client
        .put(format!("http://{master_addr}/internal/register"))
        .json(&serde_json::json!({
            "host": worker_addr.ip().to_string(),
            "port": worker_addr.port(),
        }))
        .send()
        .await
        .expect("register should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);

    let join: serde_json::Value = client
        .post(format!("http://{master_addr}/api/join"))
        .json(&serde_json::json!({ "username": "ace" }))
        .send()
        .await
        .expect("join should succeed")
        .json()
        .await
        .expect("join response should be json");

    let token = join["token"].as_str().expect("token");
    let claims = session::verify(token, TEST_SECRET.as_bytes()).expect("token should verify");
    assert_eq!(claims.username, "ace");
    assert_eq!(Some(claims.room_id.as_str()), join["roomId"].as_str());
    assert_eq!(Some(claims.client_id.as_str()), join["clientId"].as_str());
    assert_eq!(join["port"].as_u64(), Some(worker_addr.port() as u64));
}

#[tokio::test]
async fn join_with_blank_username_is_rejected() {
    let master_addr = start_master().await;
    let res = reqwest::Client::new()
        .post(format!("http://{master_addr}/api/join"))
        .json(&serde_json::json!({ "username": "   " }))
        .send()
        .await
        .expect("request should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn join_with_a_named_room_requires_it_to_exist() {
    let worker_addr = start_stub_worker().await;
    let master_addr = start_master().await;
    let client = reqwest::Client::new();

    client
        .put(format!("http://{master_addr}/internal/register"))
        .json(&serde_json::json!({
            "host": worker_addr.ip().to_string(),
            "port": worker_addr.port(),
        }))
        .send()
        .await
        .expect("register should succeed");

    let res = client
        .post(format!("http://{master_addr}/api/join"))
        .json(&serde_json::json!({ "username": "ace", "roomId": "no-such-room" }))
        .send()
        .await
        .expect("request should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

    // A room provisioned by an open join can then be joined by name.
    let first: serde_json::Value = client
        .post(format!("http://{master_addr}/api/join"))
        .json(&serde_json::json!({ "username": "ace" }))
        .send()
        .await
        .expect("join should succeed")
        .json()
        .await
        .expect("join response should be json");
    let room_id = first["roomId"].as_str().expect("roomId");

    let second: serde_json::Value = client
        .post(format!("http://{master_addr}/api/join"))
        .json(&serde_json::json!({ "username": "bob", "roomId": room_id }))
        .send()
        .await
        .expect("named join should succeed")
        .json()
        .await
        .expect("named join response should be json");
    assert_eq!(second["roomId"].as_str(), Some(room_id));
}
