use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

use super::TolerancePolicy;
use crate::domain::Circuit;

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("Target must be a positive, finite number of MW (got {0})")]
    InvalidTarget(f64),
    #[error("No eligible circuit has a known MW load")]
    NoCandidates,
}

/// How well a selection covers its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Classification {
    /// achieved >= target
    Full,
    /// Below target but within the tolerance policy
    PartialAcceptable,
    /// Below the tolerance floor; a warning, not a block
    Insufficient,
}

impl Classification {
    pub fn classify(achieved_mw: f64, target_mw: f64, policy: &TolerancePolicy) -> Self {
        if achieved_mw >= target_mw {
            Classification::Full
        } else if achieved_mw >= policy.acceptable_floor(target_mw) {
            Classification::PartialAcceptable
        } else {
            Classification::Insufficient
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Classification::Insufficient)
    }
}

/// Outcome of one greedy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// In the order they were picked (largest load first)
    pub selected: Vec<Circuit>,
    pub achieved_mw: f64,
    pub coverage_ratio: f64,
    pub classification: Classification,
}

/// Greedy largest-first cover of `target_mw` using the default tolerance policy.
pub fn select_for_target(target_mw: f64, candidates: &[Circuit]) -> Result<Selection, SelectionError> {
    select_for_target_with_policy(target_mw, candidates, &TolerancePolicy::default())
}

/// Greedy largest-first cover of `target_mw`.
///
/// Candidates without a known load are skipped. The rest are taken by
/// descending load, ties broken by ascending id, until the running total
/// reaches the target; the circuit that crosses it is included. When the
/// pool runs out first the whole pool is returned and the shortfall shows
/// up in `coverage_ratio` and `classification`.
pub fn select_for_target_with_policy(
    target_mw: f64,
    candidates: &[Circuit],
    policy: &TolerancePolicy,
) -> Result<Selection, SelectionError> {
    if !(target_mw.is_finite() && target_mw > 0.0) {
        return Err(SelectionError::InvalidTarget(target_mw));
    }

    let ranked: Vec<(&Circuit, f64)> = candidates
        .iter()
        .filter_map(|c| c.known_load_mw().map(|mw| (c, mw)))
        .sorted_by(|(a, a_mw), (b, b_mw)| {
            OrderedFloat(*b_mw)
                .cmp(&OrderedFloat(*a_mw))
                .then_with(|| a.id.cmp(&b.id))
        })
        .collect();

    if ranked.is_empty() {
        return Err(SelectionError::NoCandidates);
    }

    let mut selected = Vec::new();
    let mut running_mw = 0.0;
    for (circuit, mw) in ranked {
        selected.push(circuit.clone());
        running_mw += mw;
        if running_mw >= target_mw {
            break;
        }
    }

    let achieved_mw: f64 = selected.iter().filter_map(Circuit::known_load_mw).sum();
    let classification = Classification::classify(achieved_mw, target_mw, policy);

    tracing::debug!(
        target_mw,
        achieved_mw,
        selected = selected.len(),
        pool = candidates.len(),
        %classification,
        "rotation selection computed"
    );

    Ok(Selection {
        selected,
        achieved_mw,
        coverage_ratio: achieved_mw / target_mw,
        classification,
    })
}
