use serde::{Deserialize, Serialize};

use super::{Classification, Selection};
use crate::domain::{rotation_reason, Circuit, CircuitId, RotationConfirmation};

/// Output of one selection run, pending confirmation or discard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationProposal {
    pub requested_mw: f64,
    pub selected: Vec<Circuit>,
    pub achieved_mw: f64,
    pub coverage_ratio: f64,
    pub classification: Classification,
    pub reason: String,
}

impl RotationProposal {
    pub fn circuit_ids(&self) -> Vec<CircuitId> {
        self.selected.iter().map(|c| c.id).collect()
    }

    pub fn affected_clients(&self) -> u64 {
        self.selected.iter().map(|c| u64::from(c.clients)).sum()
    }

    /// What gets handed to the rotation sink if the operator accepts it.
    pub fn confirmation(&self) -> RotationConfirmation {
        RotationConfirmation::new(self.requested_mw, self.achieved_mw, self.circuit_ids())
    }
}

pub fn build_proposal(target_mw: f64, selection: Selection) -> RotationProposal {
    let reason = rotation_reason(target_mw, selection.selected.len());
    RotationProposal {
        requested_mw: target_mw,
        selected: selection.selected,
        achieved_mw: selection.achieved_mw,
        coverage_ratio: selection.coverage_ratio,
        classification: selection.classification,
        reason,
    }
}
