use serde::{Deserialize, Serialize};

/// Stable identifier of a distribution circuit.
pub type CircuitId = i64;

/// A switchable segment of the distribution network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    pub id: CircuitId,
    pub name: String,
    /// Rotation block (1, 2, 3, ...) the circuit is staged in
    #[serde(default)]
    pub block: Option<u32>,
    /// Current load; `None` means unknown, never zero
    #[serde(default)]
    pub load_mw: Option<f64>,
    #[serde(default)]
    pub clients: u32,
    /// "Apagable": the circuit may be selected for rotation
    pub eligible: bool,
    /// 33 kV feeder code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feeder_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_zone: Option<String>,
}

impl Circuit {
    pub fn new(id: CircuitId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            block: None,
            load_mw: None,
            clients: 0,
            eligible: true,
            feeder_code: None,
            affected_zone: None,
        }
    }

    pub fn with_load(mut self, load_mw: f64) -> Self {
        self.load_mw = Some(load_mw);
        self
    }

    pub fn with_block(mut self, block: u32) -> Self {
        self.block = Some(block);
        self
    }

    pub fn with_clients(mut self, clients: u32) -> Self {
        self.clients = clients;
        self
    }

    pub fn with_eligible(mut self, eligible: bool) -> Self {
        self.eligible = eligible;
        self
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.affected_zone = Some(zone.into());
        self
    }

    pub fn with_feeder(mut self, code: impl Into<String>) -> Self {
        self.feeder_code = Some(code.into());
        self
    }

    /// Load usable for MW arithmetic.
    ///
    /// NaN, infinite and negative readings count as unknown.
    pub fn known_load_mw(&self) -> Option<f64> {
        self.load_mw.filter(|mw| mw.is_finite() && *mw >= 0.0)
    }
}
