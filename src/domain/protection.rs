use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use super::CircuitId;

#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("Protection window for circuit {circuit_id} ends ({end}) before it starts ({start})")]
    InvertedWindow {
        circuit_id: CircuitId,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// Kind of exemption ("aseguramiento").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum ProtectionCategory {
    #[serde(alias = "Permanente", alias = "permanente")]
    #[strum(to_string = "permanent", serialize = "permanente")]
    Permanent,
    #[serde(alias = "Programado", alias = "programado")]
    #[strum(to_string = "scheduled", serialize = "programado")]
    Scheduled,
    #[serde(alias = "Temporal", alias = "temporal")]
    #[strum(to_string = "temporary", serialize = "temporal")]
    Temporary,
}

/// Date range during which a circuit is exempt from rotation.
///
/// Both bounds are inclusive and `start <= end` always holds; deserialization
/// goes through the same check as [`ProtectionWindow::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProtectionWindow")]
pub struct ProtectionWindow {
    circuit_id: CircuitId,
    start: NaiveDate,
    end: NaiveDate,
    protected_mw: Option<f64>,
    category: ProtectionCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

#[derive(Deserialize)]
struct RawProtectionWindow {
    circuit_id: CircuitId,
    start: NaiveDate,
    end: NaiveDate,
    #[serde(default)]
    protected_mw: Option<f64>,
    category: ProtectionCategory,
    #[serde(default)]
    notes: Option<String>,
}

impl TryFrom<RawProtectionWindow> for ProtectionWindow {
    type Error = DomainError;

    fn try_from(raw: RawProtectionWindow) -> Result<Self, Self::Error> {
        Ok(ProtectionWindow::new(raw.circuit_id, raw.start, raw.end, raw.category)?
            .with_protected_mw(raw.protected_mw)
            .with_notes(raw.notes))
    }
}

impl ProtectionWindow {
    pub fn new(
        circuit_id: CircuitId,
        start: NaiveDate,
        end: NaiveDate,
        category: ProtectionCategory,
    ) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvertedWindow {
                circuit_id,
                start,
                end,
            });
        }
        Ok(Self {
            circuit_id,
            start,
            end,
            protected_mw: None,
            category,
            notes: None,
        })
    }

    pub fn with_protected_mw(mut self, mw: Option<f64>) -> Self {
        self.protected_mw = mw;
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    pub fn circuit_id(&self) -> CircuitId {
        self.circuit_id
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn protected_mw(&self) -> Option<f64> {
        self.protected_mw
    }

    pub fn category(&self) -> ProtectionCategory {
        self.category
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// `start <= date <= end`
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn protects(&self, circuit_id: CircuitId, date: NaiveDate) -> bool {
        self.circuit_id == circuit_id && self.covers(date)
    }
}
