#![cfg(feature = "db")]

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::{CircuitRepository, ProtectionRegistry, RotationSink};
use crate::domain::{
    Circuit, CircuitId, ProtectionCategory, ProtectionWindow, RotationConfirmation, RotationRecord,
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CircuitRow {
    pub id: i64,
    pub name: String,
    pub block: Option<i32>,
    pub load_mw: Option<f64>,
    pub clients: Option<i32>,
    pub eligible: bool,
    pub feeder_code: Option<String>,
    pub affected_zone: Option<String>,
}

impl From<CircuitRow> for Circuit {
    fn from(row: CircuitRow) -> Self {
        Circuit {
            id: row.id,
            name: row.name,
            block: row.block.and_then(|b| u32::try_from(b).ok()),
            load_mw: row.load_mw,
            clients: row.clients.and_then(|c| u32::try_from(c).ok()).unwrap_or(0),
            eligible: row.eligible,
            feeder_code: row.feeder_code,
            affected_zone: row.affected_zone,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProtectionRow {
    pub circuit_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub protected_mw: Option<f64>,
    pub category: String,
    pub notes: Option<String>,
}

impl TryFrom<ProtectionRow> for ProtectionWindow {
    type Error = anyhow::Error;

    fn try_from(row: ProtectionRow) -> Result<Self> {
        let category: ProtectionCategory = row
            .category
            .parse()
            .with_context(|| format!("unknown protection category '{}'", row.category))?;
        Ok(
            ProtectionWindow::new(row.circuit_id, row.start_date, row.end_date, category)?
                .with_protected_mw(row.protected_mw)
                .with_notes(row.notes),
        )
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RotationRow {
    pub id: Uuid,
    pub confirmed_at: DateTime<Utc>,
    pub requested_mw: f64,
    pub achieved_mw: f64,
    pub circuit_ids: Vec<i64>,
    pub reason: String,
}

impl From<RotationRow> for RotationRecord {
    fn from(row: RotationRow) -> Self {
        RotationRecord {
            id: row.id,
            confirmed_at: row.confirmed_at,
            confirmation: RotationConfirmation {
                requested_mw: row.requested_mw,
                achieved_mw: row.achieved_mw,
                circuit_ids: row.circuit_ids,
                reason: row.reason,
            },
        }
    }
}

/// PostgreSQL-backed collaborators.
///
/// `connect` applies the embedded `migrations/` before returning, so a fresh
/// database only needs to exist and be reachable at `db.url`.
pub struct PgRepo {
    pub pool: PgPool,
}

impl PgRepo {
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await
            .context("failed to connect to the rotation database")?;
        MIGRATOR
            .run(&pool)
            .await
            .context("failed to apply database migrations")?;
        tracing::info!(migrations = MIGRATOR.iter().count(), "database schema up to date");
        Ok(Self { pool })
    }
}

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

const CIRCUIT_COLUMNS: &str =
    "id, name, block, load_mw, clients, eligible, feeder_code, affected_zone";
const PROTECTION_COLUMNS: &str =
    "circuit_id, start_date, end_date, protected_mw, category, notes";

#[async_trait]
impl CircuitRepository for PgRepo {
    async fn list_circuits(&self) -> Result<Vec<Circuit>> {
        let rows = sqlx::query_as::<_, CircuitRow>(&format!(
            "SELECT {} FROM circuits ORDER BY id",
            CIRCUIT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Circuit::from).collect())
    }

    async fn get_circuit(&self, id: CircuitId) -> Result<Option<Circuit>> {
        let row = sqlx::query_as::<_, CircuitRow>(&format!(
            "SELECT {} FROM circuits WHERE id = $1",
            CIRCUIT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Circuit::from))
    }
}

#[async_trait]
impl ProtectionRegistry for PgRepo {
    async fn active_on(&self, date: NaiveDate) -> Result<Vec<ProtectionWindow>> {
        let rows = sqlx::query_as::<_, ProtectionRow>(&format!(
            "SELECT {} FROM protection_windows WHERE start_date <= $1 AND end_date >= $1 ORDER BY id",
            PROTECTION_COLUMNS
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ProtectionWindow::try_from).collect()
    }

    async fn list_windows(&self) -> Result<Vec<ProtectionWindow>> {
        let rows = sqlx::query_as::<_, ProtectionRow>(&format!(
            "SELECT {} FROM protection_windows ORDER BY id",
            PROTECTION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ProtectionWindow::try_from).collect()
    }

    async fn create_window(&self, window: ProtectionWindow) -> Result<ProtectionWindow> {
        sqlx::query(
            r#"
            INSERT INTO protection_windows (circuit_id, start_date, end_date, protected_mw, category, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(window.circuit_id())
        .bind(window.start())
        .bind(window.end())
        .bind(window.protected_mw())
        .bind(window.category().to_string())
        .bind(window.notes())
        .execute(&self.pool)
        .await?;
        Ok(window)
    }
}

#[async_trait]
impl RotationSink for PgRepo {
    async fn record(&self, confirmation: RotationConfirmation) -> Result<RotationRecord> {
        let record = RotationRecord::new(confirmation);
        sqlx::query(
            r#"
            INSERT INTO rotations (id, confirmed_at, requested_mw, achieved_mw, circuit_ids, reason)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id)
        .bind(record.confirmed_at)
        .bind(record.confirmation.requested_mw)
        .bind(record.confirmation.achieved_mw)
        .bind(&record.confirmation.circuit_ids)
        .bind(&record.confirmation.reason)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn list_rotations(&self) -> Result<Vec<RotationRecord>> {
        let rows = sqlx::query_as::<_, RotationRow>(
            r#"
            SELECT id, confirmed_at, requested_mw, achieved_mw, circuit_ids, reason
            FROM rotations
            ORDER BY confirmed_at DESC
            LIMIT 500
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(RotationRecord::from).collect())
    }
}
