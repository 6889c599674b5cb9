use chrono::NaiveDate;

use crate::domain::{Circuit, ProtectionWindow};

/// Candidate pool for `date`: circuits flagged eligible that no protection
/// window covers on that day.
///
/// Circuits with an unknown load are kept; the selector decides what to do
/// with them. Input order is preserved.
pub fn filter_eligible(
    circuits: &[Circuit],
    windows: &[ProtectionWindow],
    date: NaiveDate,
) -> Vec<Circuit> {
    circuits
        .iter()
        .filter(|c| c.eligible)
        .filter(|c| !windows.iter().any(|w| w.protects(c.id, date)))
        .cloned()
        .collect()
}

/// Windows in force on `date`.
pub fn active_windows(windows: &[ProtectionWindow], date: NaiveDate) -> Vec<ProtectionWindow> {
    windows.iter().filter(|w| w.covers(date)).cloned().collect()
}
