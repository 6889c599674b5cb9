//! Sample network for demos and local development.
//!
//! Only loaded when `rotation.demo_data = true`. Never used as a fallback
//! when a real collaborator fails.

use chrono::NaiveDate;

use crate::domain::{Circuit, ProtectionCategory, ProtectionWindow};
use crate::repo::MemoryStore;

struct DemoCircuit {
    id: i64,
    feeder: &'static str,
    block: u32,
    name: &'static str,
    clients: u32,
    zone: &'static str,
    eligible: bool,
    load_mw: Option<f64>,
}

const CIRCUITS: &[DemoCircuit] = &[
    DemoCircuit { id: 101, feeder: "CIRC-33-A", block: 1, name: "Circuito Comercial Centro", clients: 1250, zone: "Centro Comercial", eligible: true, load_mw: Some(18.5) },
    DemoCircuit { id: 102, feeder: "CIRC-33-B", block: 1, name: "Circuito Espartaco", clients: 1890, zone: "Reparto Espartaco", eligible: true, load_mw: Some(22.3) },
    DemoCircuit { id: 107, feeder: "CIRC-33-G", block: 1, name: "Circuito Residencial Pérez Leyva", clients: 2100, zone: "Pérez Leyva", eligible: true, load_mw: Some(19.7) },
    DemoCircuit { id: 111, feeder: "CIRC-33-K", block: 1, name: "Circuito Santa Elena", clients: 1560, zone: "Santa Elena", eligible: true, load_mw: Some(14.2) },
    DemoCircuit { id: 104, feeder: "CIRC-33-D", block: 2, name: "Circuito Cruces", clients: 750, zone: "Cruces", eligible: true, load_mw: Some(8.9) },
    DemoCircuit { id: 108, feeder: "CIRC-33-H", block: 2, name: "Circuito Hospitalario Provincial", clients: 320, zone: "Hospital", eligible: false, load_mw: None },
    DemoCircuit { id: 103, feeder: "CIRC-33-C", block: 2, name: "Circuito Castillo de Jagua", clients: 1450, zone: "Castillo de Jagua", eligible: false, load_mw: None },
    DemoCircuit { id: 112, feeder: "CIRC-33-L", block: 2, name: "Circuito Industrial Sur", clients: 890, zone: "Zona Industrial", eligible: true, load_mw: Some(25.1) },
    DemoCircuit { id: 105, feeder: "CIRC-33-E", block: 3, name: "Circuito Oeste Industrial", clients: 1100, zone: "Zona Oeste", eligible: true, load_mw: Some(15.2) },
    DemoCircuit { id: 109, feeder: "CIRC-33-I", block: 3, name: "Circuito Educativo", clients: 680, zone: "Zona Educativa", eligible: true, load_mw: Some(11.6) },
    DemoCircuit { id: 106, feeder: "CIRC-33-F", block: 3, name: "Circuito Reserva Puerto", clients: 520, zone: "Puerto", eligible: false, load_mw: None },
    DemoCircuit { id: 110, feeder: "CIRC-33-J", block: 3, name: "Circuito Residencial Oeste", clients: 950, zone: "Residencial Oeste", eligible: true, load_mw: Some(16.8) },
    DemoCircuit { id: 113, feeder: "CIRC-33-M", block: 3, name: "Circuito Comercial Este", clients: 1320, zone: "Este Comercial", eligible: true, load_mw: Some(19.4) },
];

// (circuit, start, end, protected MW, category, notes)
type DemoWindow = (i64, (i32, u32, u32), (i32, u32, u32), f64, ProtectionCategory, &'static str);

const WINDOWS: &[DemoWindow] = &[
    (108, (2026, 1, 1), (2026, 12, 31), 15.7, ProtectionCategory::Permanent, "Protección hospitalaria prioritaria"),
    (103, (2026, 1, 1), (2026, 12, 31), 8.5, ProtectionCategory::Permanent, "Protección de patrimonio histórico"),
    (104, (2026, 1, 2), (2026, 1, 8), 12.3, ProtectionCategory::Scheduled, "Mantenimiento programado de infraestructura vial"),
    (109, (2026, 1, 4), (2026, 1, 10), 9.8, ProtectionCategory::Temporary, "Período de exámenes"),
    (102, (2026, 1, 3), (2026, 1, 15), 22.1, ProtectionCategory::Temporary, "Reparación de red de distribución"),
    (112, (2026, 1, 4), (2026, 1, 6), 18.9, ProtectionCategory::Scheduled, "Mantenimiento de equipos industriales críticos"),
];

pub fn demo_circuits() -> Vec<Circuit> {
    CIRCUITS
        .iter()
        .map(|c| Circuit {
            id: c.id,
            name: c.name.to_string(),
            block: Some(c.block),
            load_mw: c.load_mw,
            clients: c.clients,
            eligible: c.eligible,
            feeder_code: Some(c.feeder.to_string()),
            affected_zone: Some(c.zone.to_string()),
        })
        .collect()
}

pub fn demo_windows() -> Vec<ProtectionWindow> {
    WINDOWS
        .iter()
        .filter_map(|&(circuit_id, start, end, mw, category, notes)| {
            let start = NaiveDate::from_ymd_opt(start.0, start.1, start.2)?;
            let end = NaiveDate::from_ymd_opt(end.0, end.1, end.2)?;
            let window = ProtectionWindow::new(circuit_id, start, end, category).ok()?;
            Some(
                window
                    .with_protected_mw(Some(mw))
                    .with_notes(Some(notes.to_string())),
            )
        })
        .collect()
}

pub fn demo_store() -> MemoryStore {
    MemoryStore::new(demo_circuits(), demo_windows())
}
