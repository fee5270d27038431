//! Integration tests for the endpoint simulator over real HTTP connections.
//!
//! Each test serves the simulator on an ephemeral port and drives it with
//! reqwest.

use assert_json_diff::assert_json_eq;
use endpoint_simulator::{SimulatorConfig, SimulatorServer};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

const TEST_TIMEOUT: Duration = Duration::from_secs(30);

struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Start a simulator on 127.0.0.1 with an OS-assigned port
async fn start_simulator(config: SimulatorConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no local address");
    let (tx, rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown = async {
            let _ = rx.await;
        };
        SimulatorServer::new(config)
            .serve(listener, shutdown)
            .await
            .expect("Simulator server failed");
    });

    TestServer {
        addr,
        shutdown: Some(tx),
    }
}

fn client() -> Client {
    Client::builder().timeout(TEST_TIMEOUT).build().unwrap()
}

// =============================================================================
// Root and users
// =============================================================================

#[tokio::test]
async fn test_root_greeting() {
    let server = start_simulator(SimulatorConfig::default()).await;
    let response = client().get(server.url("/")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body: serde_json::Value = response.json().await.unwrap();
    assert_json_eq!(
        body,
        json!({"message": "Postman Test Server is Running! 🚀", "version": "2026.1.0"})
    );
}

#[tokio::test]
async fn test_list_users_echoes_query() {
    let server = start_simulator(SimulatorConfig::default()).await;
    let response = client()
        .get(server.url("/api/users?page=2&sort=asc&tag=a%20b"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_json_eq!(
        body,
        json!({
            "message": "Fetched users successfully",
            "queryParams": {"page": "2", "sort": "asc", "tag": "a b"},
            "data": [
                {"id": 1, "name": "Alice", "role": "Admin"},
                {"id": 2, "name": "Bob", "role": "User"}
            ]
        })
    );
}

#[tokio::test]
async fn test_create_user() {
    let server = start_simulator(SimulatorConfig::default()).await;
    let response = client()
        .post(server.url("/api/users"))
        .json(&json!({"name": "Charlie", "role": "Dev"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User created successfully");
    assert_json_eq!(body["receivedData"], json!({"name": "Charlie", "role": "Dev"}));
    let id = body["id"].as_u64().expect("id must be an integer");
    assert!(id < 1000);
}

#[tokio::test]
async fn test_create_user_from_form() {
    let server = start_simulator(SimulatorConfig::default()).await;
    let response = client()
        .post(server.url("/api/users"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("name=Charlie&role=Dev")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_json_eq!(body["receivedData"], json!({"name": "Charlie", "role": "Dev"}));
}

#[tokio::test]
async fn test_update_and_delete_user() {
    let server = start_simulator(SimulatorConfig::default()).await;
    let client = client();

    let response = client
        .put(server.url("/api/users/101"))
        .json(&json!({"role": "Lead"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_json_eq!(
        body,
        json!({"message": "User with ID 101 updated", "updates": {"role": "Lead"}})
    );

    let response = client
        .delete(server.url("/api/users/101"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_json_eq!(body, json!({"message": "User with ID 101 deleted"}));
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let server = start_simulator(SimulatorConfig::default()).await;
    let response = client()
        .post(server.url("/api/users"))
        .header("content-type", "application/json")
        .body("{\"name\":")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let mut config = SimulatorConfig::default();
    config.limits.max_body_bytes = 64;
    let server = start_simulator(config).await;

    let response = client()
        .post(server.url("/api/users"))
        .json(&json!({"name": "x".repeat(256)}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

// =============================================================================
// Headers and authorization
// =============================================================================

#[tokio::test]
async fn test_api_key_header() {
    let server = start_simulator(SimulatorConfig::default()).await;
    let client = client();

    let response = client
        .get(server.url("/api/headers"))
        .header("x-api-key", "secret123")
        .header("x-trace", "abc")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "Access Granted");
    assert_eq!(body["headers"]["x-api-key"], "secret123");
    assert_eq!(body["headers"]["x-trace"], "abc");

    for key in [Some("wrong"), None] {
        let mut request = client.get(server.url("/api/headers"));
        if let Some(key) = key {
            request = request.header("x-api-key", key);
        }
        let response = request.send().await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], "Forbidden");
    }
}

#[tokio::test]
async fn test_basic_auth() {
    let server = start_simulator(SimulatorConfig::default()).await;
    let client = client();

    let response = client
        .get(server.url("/api/auth/basic"))
        .basic_auth("admin", Some("password"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_json_eq!(body, json!({"message": "Basic Auth Successful!"}));

    let response = client
        .get(server.url("/api/auth/basic"))
        .basic_auth("admin", Some("nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(response.text().await.unwrap(), "Invalid Credentials");

    let response = client
        .get(server.url("/api/auth/basic"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.text().await.unwrap(), "Authentication required");
}

#[tokio::test]
async fn test_bearer_auth() {
    let server = start_simulator(SimulatorConfig::default()).await;
    let client = client();

    let response = client
        .get(server.url("/api/auth/bearer"))
        .bearer_auth("my-secret-token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_json_eq!(body, json!({"message": "Bearer Token Validated!"}));

    let response = client
        .get(server.url("/api/auth/bearer"))
        .bearer_auth("wrong-token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .get(server.url("/api/auth/bearer"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_json_eq!(body, json!({"message": "Invalid or missing Bearer token"}));
}

// =============================================================================
// Upload
// =============================================================================

#[tokio::test]
async fn test_upload_file() {
    let server = start_simulator(SimulatorConfig::default()).await;
    let part = Part::bytes(b"hello simulator".to_vec())
        .file_name("greeting.txt")
        .mime_str("text/plain")
        .unwrap();
    let form = Form::new().text("note", "ignored").part("file", part);

    let response = client()
        .post(server.url("/api/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_json_eq!(
        body,
        json!({
            "message": "File uploaded successfully",
            "fileInfo": {"originalName": "greeting.txt", "size": 15, "mimetype": "text/plain"}
        })
    );
}

#[tokio::test]
async fn test_upload_without_file() {
    let server = start_simulator(SimulatorConfig::default()).await;
    let client = client();

    let form = Form::new().text("note", "no file here");
    let response = client
        .post(server.url("/api/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_json_eq!(body, json!({"message": "No file uploaded"}));

    let response = client
        .post(server.url("/api/upload"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Delay and simulated errors
// =============================================================================

#[tokio::test]
async fn test_delay_route() {
    let server = start_simulator(SimulatorConfig::default()).await;
    let started = Instant::now();
    let response = client()
        .get(server.url("/api/delay/2"))
        .send()
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(2000));
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_json_eq!(body, json!({"message": "Response delayed by 2 seconds"}));
}

#[tokio::test]
async fn test_abandoned_delay_does_not_affect_server() {
    let server = start_simulator(SimulatorConfig::default()).await;

    let abandoned = Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap()
        .get(server.url("/api/delay/30"))
        .send()
        .await;
    assert!(abandoned.unwrap_err().is_timeout());

    let response = client().get(server.url("/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_simulated_errors() {
    let server = start_simulator(SimulatorConfig::default()).await;
    let client = client();

    let response = client
        .get(server.url("/api/error/500"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_json_eq!(body, json!({"error": "Internal Server Error Simulation"}));

    let response = client
        .get(server.url("/api/error/400"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_json_eq!(body, json!({"error": "Bad Request Simulation"}));
}

#[tokio::test]
async fn test_unknown_route() {
    let server = start_simulator(SimulatorConfig::default()).await;
    let response = client().get(server.url("/nope")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "Cannot GET /nope");
}
