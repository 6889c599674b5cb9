use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::time::Instant;

use crate::controller::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    circuit_repository: ComponentHealth,
    protection_registry: ComponentHealth,
}

/// Health status of a component
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ComponentHealth {
    fn healthy(latency_ms: u64) -> Self {
        Self {
            status: "healthy".to_string(),
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy".to_string(),
            latency_ms: None,
            error: Some(error),
        }
    }

    fn from_probe(result: anyhow::Result<u64>) -> Self {
        match result {
            Ok(latency) => Self::healthy(latency),
            Err(e) => Self::unhealthy(e.to_string()),
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// GET /api/v1/health - reachability of the collaborators
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let circuit_repository = ComponentHealth::from_probe(probe_circuits(&state).await);
    let protection_registry = ComponentHealth::from_probe(probe_protections(&state).await);

    let all_healthy = circuit_repository.is_healthy() && protection_registry.is_healthy();

    let response = HealthResponse {
        status: if all_healthy {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        timestamp: chrono::Utc::now(),
        checks: HealthChecks {
            circuit_repository,
            protection_registry,
        },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::debug!(healthy = all_healthy, "Health check completed");

    (status_code, Json(response))
}

async fn probe_circuits(state: &AppState) -> anyhow::Result<u64> {
    let start = Instant::now();
    state.service.list_circuits().await?;
    Ok(start.elapsed().as_millis() as u64)
}

async fn probe_protections(state: &AppState) -> anyhow::Result<u64> {
    let start = Instant::now();
    state.service.protections_on(crate::controller::today()).await?;
    Ok(start.elapsed().as_millis() as u64)
}

/// GET /api/v1/healthz - liveness
pub async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
