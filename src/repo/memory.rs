use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;

use super::{CircuitRepository, ProtectionRegistry, RotationSink};
use crate::domain::{Circuit, CircuitId, ProtectionWindow, RotationConfirmation, RotationRecord};
use crate::rotation::active_windows;

/// Process-local store backing all three collaborators.
///
/// Used for demo mode, tests and deployments without the `db` feature.
/// Nothing is persisted across restarts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    circuits: RwLock<Vec<Circuit>>,
    windows: RwLock<Vec<ProtectionWindow>>,
    rotations: RwLock<Vec<RotationRecord>>,
}

impl MemoryStore {
    pub fn new(circuits: Vec<Circuit>, windows: Vec<ProtectionWindow>) -> Self {
        Self {
            circuits: RwLock::new(circuits),
            windows: RwLock::new(windows),
            rotations: RwLock::new(Vec::new()),
        }
    }

    /// Insert or replace a circuit by id.
    pub fn upsert_circuit(&self, circuit: Circuit) {
        let mut circuits = self.circuits.write();
        match circuits.iter_mut().find(|c| c.id == circuit.id) {
            Some(existing) => *existing = circuit,
            None => circuits.push(circuit),
        }
    }
}

#[async_trait]
impl CircuitRepository for MemoryStore {
    async fn list_circuits(&self) -> Result<Vec<Circuit>> {
        Ok(self.circuits.read().clone())
    }

    async fn get_circuit(&self, id: CircuitId) -> Result<Option<Circuit>> {
        Ok(self.circuits.read().iter().find(|c| c.id == id).cloned())
    }
}

#[async_trait]
impl ProtectionRegistry for MemoryStore {
    async fn active_on(&self, date: NaiveDate) -> Result<Vec<ProtectionWindow>> {
        Ok(active_windows(&self.windows.read(), date))
    }

    async fn list_windows(&self) -> Result<Vec<ProtectionWindow>> {
        Ok(self.windows.read().clone())
    }

    async fn create_window(&self, window: ProtectionWindow) -> Result<ProtectionWindow> {
        self.windows.write().push(window.clone());
        Ok(window)
    }
}

#[async_trait]
impl RotationSink for MemoryStore {
    async fn record(&self, confirmation: RotationConfirmation) -> Result<RotationRecord> {
        let record = RotationRecord::new(confirmation);
        self.rotations.write().push(record.clone());
        Ok(record)
    }

    /// Most recent first.
    async fn list_rotations(&self) -> Result<Vec<RotationRecord>> {
        Ok(self.rotations.read().iter().rev().cloned().collect())
    }
}
