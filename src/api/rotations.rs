use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use validator::Validate;

use crate::{
    api::{error::ApiError, response::ApiResponse},
    controller::{today, AppState},
    domain::{CircuitId, RotationRecord},
    rotation::RotationProposal,
};

#[derive(Debug, Deserialize)]
pub struct ProposeRequest {
    /// Deficit to shed, in MW
    pub target_mw: f64,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ProposalResponse {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub proposal: RotationProposal,
    pub circuit_ids: Vec<CircuitId>,
    pub affected_clients: u64,
    pub tolerance_ratio: f64,
    /// Set when the proposal falls below the tolerance floor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

fn shortfall_warning(proposal: &RotationProposal) -> Option<String> {
    proposal.classification.is_warning().then(|| {
        format!(
            "Only {:.2} MW of the {:.2} MW requested could be reached with {} circuit(s)",
            proposal.achieved_mw,
            proposal.requested_mw,
            proposal.selected.len()
        )
    })
}

/// POST /api/v1/rotations/propose
pub async fn propose_rotation(
    State(st): State<AppState>,
    Json(req): Json<ProposeRequest>,
) -> Result<Json<ApiResponse<ProposalResponse>>, ApiError> {
    let started = Instant::now();
    let date = req.date.unwrap_or_else(today);
    let proposal = st.service.propose(req.target_mw, date).await?;

    let response = ProposalResponse {
        date,
        circuit_ids: proposal.circuit_ids(),
        affected_clients: proposal.affected_clients(),
        tolerance_ratio: st.service.policy().min_acceptable_ratio(),
        warning: shortfall_warning(&proposal),
        proposal,
    };

    Ok(Json(
        ApiResponse::success(response).with_duration(started.elapsed().as_millis() as u64),
    ))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmRequest {
    pub requested_mw: f64,
    #[validate(length(min = 1, max = 500))]
    pub circuit_ids: Vec<CircuitId>,
    pub date: Option<NaiveDate>,
}

/// POST /api/v1/rotations/confirm
pub async fn confirm_rotation(
    State(st): State<AppState>,
    Json(req): Json<ConfirmRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RotationRecord>>), ApiError> {
    req.validate()?;
    let date = req.date.unwrap_or_else(today);
    let record = st
        .service
        .confirm(req.requested_mw, req.circuit_ids, date)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(record))))
}

/// GET /api/v1/rotations
pub async fn list_rotations(
    State(st): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RotationRecord>>>, ApiError> {
    let rotations = st.service.rotation_history().await?;
    let count = rotations.len();
    Ok(Json(ApiResponse::success(rotations).with_count(count)))
}
