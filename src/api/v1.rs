use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    api::{circuits, dashboard, health, protections, rotations},
    controller::AppState,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/health", get(health::health_check))
        .route("/circuits", get(circuits::list_circuits))
        .route("/circuits/eligible", get(circuits::eligible_circuits))
        .route("/circuits/:id", get(circuits::get_circuit))
        .route(
            "/protections",
            get(protections::list_protections).post(protections::create_protection),
        )
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/rotations", get(rotations::list_rotations))
        .route("/rotations/propose", post(rotations::propose_rotation))
        .route("/rotations/confirm", post(rotations::confirm_rotation))
        .with_state(state)
}
