use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fraction of the requested MW that still counts as an acceptable partial cover.
pub const DEFAULT_TOLERANCE_RATIO: f64 = 0.9;

#[derive(Debug, Error, PartialEq)]
#[error("tolerance ratio must be within (0, 1], got {0}")]
pub struct InvalidTolerance(pub f64);

/// How far below the target a selection may fall before it is flagged
/// as insufficient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TolerancePolicy {
    min_acceptable_ratio: f64,
}

impl Default for TolerancePolicy {
    fn default() -> Self {
        Self {
            min_acceptable_ratio: DEFAULT_TOLERANCE_RATIO,
        }
    }
}

impl TolerancePolicy {
    pub fn new(min_acceptable_ratio: f64) -> Result<Self, InvalidTolerance> {
        if !(min_acceptable_ratio > 0.0 && min_acceptable_ratio <= 1.0) {
            return Err(InvalidTolerance(min_acceptable_ratio));
        }
        Ok(Self {
            min_acceptable_ratio,
        })
    }

    pub fn min_acceptable_ratio(&self) -> f64 {
        self.min_acceptable_ratio
    }

    /// Lowest achieved MW that is still classified as partially acceptable.
    pub fn acceptable_floor(&self, target_mw: f64) -> f64 {
        self.min_acceptable_ratio * target_mw
    }
}
