//! HTTP-level tests against the router with in-memory collaborators.

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use figment::{
    providers::{Format, Toml},
    Figment,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use circuit_rotation::{
    api,
    config::Config,
    controller::AppState,
    demo::demo_store,
    domain::{Circuit, RotationConfirmation, RotationRecord},
    repo::{MemoryStore, Repositories, RotationSink},
    rotation::TolerancePolicy,
};

const CONFIG: &str = r#"
    [server]
    host = "127.0.0.1"
    port = 0

    [rotation]
    demo_data = true
"#;

fn test_config() -> Config {
    Config::from_figment(Figment::new().merge(Toml::string(CONFIG))).unwrap()
}

fn app_with(repos: Repositories) -> Router {
    let cfg = test_config();
    let state = AppState::with_repositories(cfg.clone(), repos, TolerancePolicy::default());
    api::router(state, &cfg)
}

fn demo_app() -> Router {
    app_with(Repositories::in_memory(demo_store()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect()
}

struct RejectingSink;

#[async_trait]
impl RotationSink for RejectingSink {
    async fn record(&self, _confirmation: RotationConfirmation) -> Result<RotationRecord> {
        Err(anyhow::anyhow!("rotation ledger is read-only"))
    }

    async fn list_rotations(&self) -> Result<Vec<RotationRecord>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_healthz_and_health() {
    let app = demo_app();
    let (status, _) = send(&app, "GET", "/api/v1/healthz", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_candidate_pool_excludes_protected_and_ineligible() {
    let app = demo_app();
    let (status, body) = send(&app, "GET", "/api/v1/circuits/eligible?date=2026-01-04", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["total_count"], 6);
    let pool: Vec<i64> = body["data"]["circuits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(pool, vec![101, 107, 111, 105, 110, 113]);
}

#[tokio::test]
async fn test_list_and_get_circuits() {
    let app = demo_app();

    let (status, body) = send(&app, "GET", "/api/v1/circuits?block=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["total_count"], 4);

    let (_, body) = send(&app, "GET", "/api/v1/circuits?eligible_only=true", None).await;
    assert_eq!(body["metadata"]["total_count"], 10);

    let (status, body) = send(&app, "GET", "/api/v1/circuits/107", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["load_mw"], 19.7);

    let (status, body) = send(&app, "GET", "/api/v1/circuits/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");
}

#[tokio::test]
async fn test_propose_full_cover() {
    let app = demo_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/rotations/propose",
        Some(json!({ "target_mw": 40.0, "date": "2026-01-04" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(ids(&data["circuit_ids"]), vec![107, 113, 101]);
    assert_eq!(data["classification"], "full");
    assert_eq!(data["reason"], "Rotation of 40.00 MW with 3 circuit(s)");
    assert_eq!(data["affected_clients"], 2100 + 1320 + 1250);
    assert!(data.get("warning").is_none());
    assert!(body["metadata"]["duration_ms"].is_u64());
}

#[tokio::test]
async fn test_propose_shortfall_is_a_warning_not_an_error() {
    let app = demo_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/rotations/propose",
        Some(json!({ "target_mw": 500.0, "date": "2026-01-04" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["classification"], "insufficient");
    assert_eq!(body["data"]["selected"].as_array().unwrap().len(), 6);
    assert!(body["data"]["warning"].is_string());
}

#[tokio::test]
async fn test_propose_rejects_bad_target_and_empty_pool() {
    let app = demo_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/rotations/propose",
        Some(json!({ "target_mw": 0.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidTarget");

    let empty = app_with(Repositories::in_memory(MemoryStore::default()));
    let (status, body) = send(
        &empty,
        "POST",
        "/api/v1/rotations/propose",
        Some(json!({ "target_mw": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "NoCandidates");
}

#[tokio::test]
async fn test_confirm_and_history() {
    let app = demo_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/rotations/confirm",
        Some(json!({ "requested_mw": 40.0, "circuit_ids": [107, 113], "date": "2026-01-04" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let achieved = body["data"]["achieved_mw"].as_f64().unwrap();
    assert!((achieved - 39.1).abs() < 1e-9);
    assert_eq!(body["data"]["reason"], "Rotation of 40.00 MW with 2 circuit(s)");

    let (status, body) = send(&app, "GET", "/api/v1/rotations", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["total_count"], 1);
    assert_eq!(ids(&body["data"][0]["circuit_ids"]), vec![107, 113]);
}

#[tokio::test]
async fn test_confirm_rejections() {
    let app = demo_app();

    // 102 is under repair on that day
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/rotations/confirm",
        Some(json!({ "requested_mw": 20.0, "circuit_ids": [102], "date": "2026-01-04" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/rotations/confirm",
        Some(json!({ "requested_mw": 20.0, "circuit_ids": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/rotations/confirm",
        Some(json!({ "requested_mw": 20.0, "circuit_ids": [4242], "date": "2026-01-04" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/rotations/confirm",
        Some(json!({ "requested_mw": 30.0, "circuit_ids": [107, 113, 107], "date": "2026-01-04" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");

    let (_, body) = send(&app, "GET", "/api/v1/rotations", None).await;
    assert_eq!(body["metadata"]["total_count"], 0);
}

#[tokio::test]
async fn test_confirm_rejects_circuit_without_load_reading() {
    let store = demo_store();
    store.upsert_circuit(
        Circuit::new(120, "Circuito Sin Medición")
            .with_block(3)
            .with_clients(400),
    );
    let app = app_with(Repositories::in_memory(store));

    // still listed as a candidate, but never counted as 0 MW
    let (_, body) = send(&app, "GET", "/api/v1/circuits/eligible?date=2026-01-04", None).await;
    assert_eq!(body["data"]["unknown_load_circuits"], 1);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/rotations/confirm",
        Some(json!({ "requested_mw": 20.0, "circuit_ids": [107, 120], "date": "2026-01-04" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");

    let (_, body) = send(&app, "GET", "/api/v1/rotations", None).await;
    assert_eq!(body["metadata"]["total_count"], 0);
}

#[tokio::test]
async fn test_sink_rejection_is_passed_through() {
    let store = Arc::new(demo_store());
    let app = app_with(Repositories {
        circuits: store.clone(),
        protections: store,
        rotations: Arc::new(RejectingSink),
    });

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/rotations/confirm",
        Some(json!({ "requested_mw": 20.0, "circuit_ids": [107], "date": "2026-01-04" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "rotation ledger is read-only");
}

#[tokio::test]
async fn test_new_protection_removes_circuit_from_pool() {
    let app = demo_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/protections",
        Some(json!({
            "circuit_id": 107,
            "start": "2026-01-04",
            "end": "2026-01-04",
            "category": "temporary",
            "notes": "Acto público"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["circuit_id"], 107);

    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/rotations/propose",
        Some(json!({ "target_mw": 40.0, "date": "2026-01-04" })),
    )
    .await;
    assert_eq!(ids(&body["data"]["circuit_ids"]), vec![113, 101, 110]);

    let (_, body) = send(&app, "GET", "/api/v1/protections?date=2026-01-04", None).await;
    assert_eq!(body["metadata"]["total_count"], 7);
}

#[tokio::test]
async fn test_create_protection_validation() {
    let app = demo_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/protections",
        Some(json!({
            "circuit_id": 107,
            "start": "2026-01-10",
            "end": "2026-01-04",
            "category": "scheduled"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/protections",
        Some(json!({
            "circuit_id": 107,
            "start": "2026-01-04",
            "end": "2026-01-05",
            "category": "scheduled",
            "protected_mw": -1.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/protections",
        Some(json!({
            "circuit_id": 4242,
            "start": "2026-01-04",
            "end": "2026-01-05",
            "category": "permanent"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard() {
    let app = demo_app();
    let (status, body) = send(&app, "GET", "/api/v1/dashboard?date=2026-01-04", None).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["total_circuits"], 13);
    assert_eq!(data["eligible_circuits"], 6);
    assert_eq!(data["active_protections"], 6);
    assert_eq!(data["unknown_load_circuits"], 0);
}
