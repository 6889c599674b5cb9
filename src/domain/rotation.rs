use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CircuitId;

/// A finalized proposal as handed to the rotation sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationConfirmation {
    pub requested_mw: f64,
    pub achieved_mw: f64,
    pub circuit_ids: Vec<CircuitId>,
    pub reason: String,
}

impl RotationConfirmation {
    pub fn new(requested_mw: f64, achieved_mw: f64, circuit_ids: Vec<CircuitId>) -> Self {
        let reason = rotation_reason(requested_mw, circuit_ids.len());
        Self {
            requested_mw,
            achieved_mw,
            circuit_ids,
            reason,
        }
    }

    pub fn circuit_count(&self) -> usize {
        self.circuit_ids.len()
    }
}

/// Human-readable reason recorded alongside a confirmed rotation.
pub fn rotation_reason(requested_mw: f64, circuit_count: usize) -> String {
    format!(
        "Rotation of {:.2} MW with {} circuit(s)",
        requested_mw, circuit_count
    )
}

/// A confirmation after the sink accepted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationRecord {
    pub id: Uuid,
    pub confirmed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub confirmation: RotationConfirmation,
}

impl RotationRecord {
    pub fn new(confirmation: RotationConfirmation) -> Self {
        Self {
            id: Uuid::new_v4(),
            confirmed_at: Utc::now(),
            confirmation,
        }
    }
}
