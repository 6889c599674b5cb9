use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::{
    api::{error::ApiError, response::ApiResponse},
    controller::AppState,
    domain::{CircuitId, ProtectionCategory, ProtectionWindow},
};

#[derive(Debug, Deserialize)]
pub struct ProtectionQuery {
    /// Only windows in force on this day; all windows when absent
    pub date: Option<NaiveDate>,
}

/// GET /api/v1/protections
pub async fn list_protections(
    State(st): State<AppState>,
    Query(q): Query<ProtectionQuery>,
) -> Result<Json<ApiResponse<Vec<ProtectionWindow>>>, ApiError> {
    let windows = match q.date {
        Some(date) => st.service.protections_on(date).await?,
        None => st.service.list_protections().await?,
    };
    let count = windows.len();
    Ok(Json(ApiResponse::success(windows).with_count(count)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProtectionRequest {
    pub circuit_id: CircuitId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub category: ProtectionCategory,
    #[validate(range(min = 0.0))]
    pub protected_mw: Option<f64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// POST /api/v1/protections
pub async fn create_protection(
    State(st): State<AppState>,
    Json(req): Json<CreateProtectionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProtectionWindow>>), ApiError> {
    req.validate()?;

    let window = ProtectionWindow::new(req.circuit_id, req.start, req.end, req.category)?
        .with_protected_mw(req.protected_mw)
        .with_notes(req.notes);
    let created = st.service.create_protection(window).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}
