//! HTTP endpoint tests

mod test_utils;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use fieldguard::server::{build_router, start_test_server};
use test_utils::{demo_guard, ScriptedGenerator};

fn router(reply: &str) -> Router {
    let (guard, _) = demo_guard(ScriptedGenerator::new(reply));
    build_router(Arc::new(guard))
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_metadata_known_table() {
    let (status, body) = send(router(""), get("/metadata/users")).await;

    assert_eq!(status, StatusCode::OK);
    let fields = body["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 4);
    assert_eq!(
        fields[2],
        json!({"name": "email", "type": "string", "sensitivity": "PII"})
    );
}

#[tokio::test]
async fn test_metadata_unknown_table() {
    let (status, body) = send(router(""), get("/metadata/payroll")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Table not found"}));
}

#[tokio::test]
async fn test_tables() {
    let (status, body) = send(router(""), get("/tables")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"tables": ["orders", "users"]}));
}

#[tokio::test]
async fn test_process_query_rejected() {
    let request = post_json(
        "/process_query",
        json!({"role": "basic", "table": "users", "query": "What is the average salary?"}),
    );
    let (status, body) = send(router("SELECT AVG(salary) FROM users"), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "basic");
    assert_eq!(body["table"], "users");
    assert_eq!(body["accessible_fields"], json!(["id (int)", "name (string)"]));
    assert_eq!(body["llm_response"], "SELECT AVG(salary) FROM users");
    assert_eq!(body["decision"], "rejected");
    assert_eq!(body["unauthorized_fields"], json!(["salary"]));
    assert_eq!(body["log_entry"]["decision"], "rejected");
    assert_eq!(body["log_entry"]["user_query"], "What is the average salary?");
    assert_eq!(body["log_entry"]["extraction"], "tokenizer");
}

#[tokio::test]
async fn test_process_query_unknown_table() {
    let request = post_json(
        "/process_query",
        json!({"role": "admin", "table": "payroll", "query": "anything"}),
    );
    let (status, body) = send(router("SELECT id FROM payroll"), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Table not found");
}

#[tokio::test]
async fn test_process_query_missing_role() {
    let request = post_json(
        "/process_query",
        json!({"table": "users", "query": "List all user names"}),
    );
    let (status, body) = send(router("SELECT name FROM users"), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["decision"], "rejected");
    assert_eq!(body["reason"], "no fields accessible for this role");
    assert_eq!(body["accessible_fields"], json!([]));
}

#[tokio::test]
async fn test_process_query_missing_table() {
    let request = post_json("/process_query", json!({"role": "admin"}));
    let (status, body) = send(router("SELECT name FROM users"), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Table not found"}));
}

#[tokio::test]
async fn test_log_lifecycle() {
    let app = router("SELECT name FROM users");

    let request = post_json(
        "/process_query",
        json!({"role": "basic", "table": "users", "query": "names"}),
    );
    let (status, _) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(app.clone(), get("/get_log")).await;
    let log = body["log"].as_array().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0]["decision"], "accepted");

    let (_, health) = send(app.clone(), get("/health")).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["audit_entries"], 1);

    let (status, body) = send(app.clone(), post_json("/clear_log", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Log cleared"}));

    let (_, body) = send(app, get("/get_log")).await;
    assert_eq!(body, json!({"log": []}));
}

#[tokio::test]
async fn test_real_socket() {
    let (guard, audit) = demo_guard(ScriptedGenerator::new("SELECT amount FROM orders"));
    let handle = start_test_server("127.0.0.1:0".parse().unwrap(), Arc::new(guard))
        .await
        .unwrap();

    let client = reqwest::Client::new();
    let body: Value = client
        .post(format!("http://{}/process_query", handle.addr))
        .json(&json!({"role": "basic", "table": "orders", "query": "order totals"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["decision"], "accepted");
    assert_eq!(audit.len(), 1);

    handle.shutdown();
}
