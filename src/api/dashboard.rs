use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    api::{error::ApiError, response::ApiResponse, DateQuery},
    controller::AppState,
    rotation::DashboardSummary,
};

/// GET /api/v1/dashboard?date=YYYY-MM-DD
pub async fn get_dashboard(
    State(st): State<AppState>,
    Query(q): Query<DateQuery>,
) -> Result<Json<ApiResponse<DashboardSummary>>, ApiError> {
    let summary = st.service.dashboard(q.date_or_today()).await?;
    Ok(Json(ApiResponse::success(summary)))
}
