use std::collections::BTreeMap;

use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;

use super::{active_windows, filter_eligible};
use crate::domain::{Circuit, ProtectionWindow};

/// Key for per-block aggregates. Circuits without a block sort last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockLabel {
    Block(u32),
    Unassigned,
}

impl From<Option<u32>> for BlockLabel {
    fn from(block: Option<u32>) -> Self {
        block.map_or(BlockLabel::Unassigned, BlockLabel::Block)
    }
}

impl std::fmt::Display for BlockLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockLabel::Block(n) => write!(f, "{}", n),
            BlockLabel::Unassigned => write!(f, "unassigned"),
        }
    }
}

impl Serialize for BlockLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub fn total_clients(circuits: &[Circuit]) -> u64 {
    circuits.iter().map(|c| u64::from(c.clients)).sum()
}

/// Sum of the loads that are known; unknown loads are left out, not zeroed.
pub fn total_known_mw(circuits: &[Circuit]) -> f64 {
    circuits.iter().filter_map(Circuit::known_load_mw).sum()
}

/// Circuits whose load is unknown and therefore cannot join a selection.
pub fn unknown_load_count(circuits: &[Circuit]) -> usize {
    circuits.iter().filter(|c| c.known_load_mw().is_none()).count()
}

pub fn mw_by_block(circuits: &[Circuit]) -> BTreeMap<BlockLabel, f64> {
    let mut totals = BTreeMap::new();
    for circuit in circuits {
        if let Some(mw) = circuit.known_load_mw() {
            *totals.entry(BlockLabel::from(circuit.block)).or_insert(0.0) += mw;
        }
    }
    totals
}

/// Distinct block numbers in ascending order.
pub fn blocks(circuits: &[Circuit]) -> Vec<u32> {
    circuits.iter().filter_map(|c| c.block).sorted().dedup().collect()
}

pub fn filter_by_block(circuits: &[Circuit], block: Option<u32>) -> Vec<Circuit> {
    match block {
        Some(b) => circuits.iter().filter(|c| c.block == Some(b)).cloned().collect(),
        None => circuits.to_vec(),
    }
}

/// Headline figures for the operations dashboard on a given day.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub date: NaiveDate,
    pub total_circuits: usize,
    pub eligible_circuits: usize,
    pub active_protections: usize,
    pub protected_mw: f64,
    /// Known load of the candidate pool
    pub available_mw: f64,
    pub available_clients: u64,
    pub unknown_load_circuits: usize,
    pub mw_by_block: BTreeMap<BlockLabel, f64>,
}

impl DashboardSummary {
    pub fn compute(circuits: &[Circuit], windows: &[ProtectionWindow], date: NaiveDate) -> Self {
        let active = active_windows(windows, date);
        let pool = filter_eligible(circuits, &active, date);
        Self {
            date,
            total_circuits: circuits.len(),
            eligible_circuits: pool.len(),
            active_protections: active.len(),
            protected_mw: active.iter().filter_map(|w| w.protected_mw()).sum(),
            available_mw: total_known_mw(&pool),
            available_clients: total_clients(&pool),
            unknown_load_circuits: unknown_load_count(&pool),
            mw_by_block: mw_by_block(&pool),
        }
    }
}
