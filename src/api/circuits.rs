use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    api::{error::ApiError, response::ApiResponse, DateQuery},
    controller::AppState,
    domain::{Circuit, CircuitId},
    rotation::{filter_by_block, total_clients, total_known_mw, unknown_load_count},
};

#[derive(Debug, Default, Deserialize)]
pub struct CircuitQuery {
    pub block: Option<u32>,
    /// Only circuits flagged eligible ("apagable"), regardless of protections
    #[serde(default)]
    pub eligible_only: bool,
}

/// GET /api/v1/circuits
pub async fn list_circuits(
    State(st): State<AppState>,
    Query(q): Query<CircuitQuery>,
) -> Result<Json<ApiResponse<Vec<Circuit>>>, ApiError> {
    let mut circuits = filter_by_block(&st.service.list_circuits().await?, q.block);
    if q.eligible_only {
        circuits.retain(|c| c.eligible);
    }
    circuits.sort_by(|a, b| a.name.cmp(&b.name));

    let count = circuits.len();
    Ok(Json(ApiResponse::success(circuits).with_count(count)))
}

/// GET /api/v1/circuits/:id
pub async fn get_circuit(
    State(st): State<AppState>,
    Path(id): Path<CircuitId>,
) -> Result<Json<ApiResponse<Circuit>>, ApiError> {
    let circuit = st.service.get_circuit(id).await?;
    Ok(Json(ApiResponse::success(circuit)))
}

#[derive(Debug, Serialize)]
pub struct CandidatePoolResponse {
    pub date: NaiveDate,
    pub circuits: Vec<Circuit>,
    pub total_known_mw: f64,
    pub total_clients: u64,
    /// Candidates that cannot take part in MW-based selection
    pub unknown_load_circuits: usize,
}

/// GET /api/v1/circuits/eligible?date=YYYY-MM-DD
pub async fn eligible_circuits(
    State(st): State<AppState>,
    Query(q): Query<DateQuery>,
) -> Result<Json<ApiResponse<CandidatePoolResponse>>, ApiError> {
    let date = q.date_or_today();
    let circuits = st.service.candidate_pool(date).await?;
    let count = circuits.len();

    let response = CandidatePoolResponse {
        date,
        total_known_mw: total_known_mw(&circuits),
        total_clients: total_clients(&circuits),
        unknown_load_circuits: unknown_load_count(&circuits),
        circuits,
    };
    Ok(Json(ApiResponse::success(response).with_count(count)))
}
