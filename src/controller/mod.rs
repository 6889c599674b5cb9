use anyhow::Result;
use chrono::{Local, NaiveDate};
use itertools::Itertools;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{Circuit, CircuitId, ProtectionWindow, RotationConfirmation, RotationRecord};
use crate::repo::Repositories;
use crate::rotation::{
    build_proposal, filter_eligible, select_for_target_with_policy, Classification,
    DashboardSummary, RotationProposal, SelectionError, TolerancePolicy,
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("A rotation needs at least one circuit")]
    EmptyRotation,
    #[error("Circuit {0} is not eligible for rotation on {1}")]
    NotEligible(CircuitId, NaiveDate),
    #[error("Circuit {0} appears more than once in the rotation")]
    DuplicateCircuit(CircuitId),
    #[error("Circuit {0} has no known load and cannot be counted towards a rotation")]
    UnknownLoad(CircuitId),
    /// The rotation sink refused the confirmation; its message is kept as is.
    #[error(transparent)]
    Sink(anyhow::Error),
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub service: Arc<RotationService>,
}

impl AppState {
    pub async fn new(cfg: Config) -> Result<Self> {
        let repos = Repositories::new(&cfg).await?;
        let policy = cfg.rotation.tolerance_policy()?;
        Ok(Self::with_repositories(cfg, repos, policy))
    }

    pub fn with_repositories(cfg: Config, repos: Repositories, policy: TolerancePolicy) -> Self {
        Self {
            cfg,
            service: Arc::new(RotationService::new(repos, policy)),
        }
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Glue between the collaborators and the rotation core.
///
/// Fetches circuits and protection windows, hands plain data to the core and
/// forwards confirmations to the sink. Keeps no state between calls.
pub struct RotationService {
    repos: Repositories,
    policy: TolerancePolicy,
}

impl RotationService {
    pub fn new(repos: Repositories, policy: TolerancePolicy) -> Self {
        Self { repos, policy }
    }

    pub fn policy(&self) -> &TolerancePolicy {
        &self.policy
    }

    pub async fn list_circuits(&self) -> Result<Vec<Circuit>> {
        self.repos.circuits.list_circuits().await
    }

    pub async fn get_circuit(&self, id: CircuitId) -> Result<Circuit, ServiceError> {
        self.repos
            .circuits
            .get_circuit(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Circuit {}", id)))
    }

    pub async fn protections_on(&self, date: NaiveDate) -> Result<Vec<ProtectionWindow>> {
        self.repos.protections.active_on(date).await
    }

    pub async fn list_protections(&self) -> Result<Vec<ProtectionWindow>> {
        self.repos.protections.list_windows().await
    }

    pub async fn create_protection(
        &self,
        window: ProtectionWindow,
    ) -> Result<ProtectionWindow, ServiceError> {
        self.get_circuit(window.circuit_id()).await?;
        let created = self.repos.protections.create_window(window).await?;
        info!(
            circuit_id = created.circuit_id(),
            start = %created.start(),
            end = %created.end(),
            category = %created.category(),
            "protection window created"
        );
        Ok(created)
    }

    /// Eligible, unprotected circuits for `date`.
    pub async fn candidate_pool(&self, date: NaiveDate) -> Result<Vec<Circuit>> {
        let circuits = self.repos.circuits.list_circuits().await?;
        let windows = self.repos.protections.active_on(date).await?;
        Ok(filter_eligible(&circuits, &windows, date))
    }

    pub async fn propose(
        &self,
        target_mw: f64,
        date: NaiveDate,
    ) -> Result<RotationProposal, ServiceError> {
        if !(target_mw.is_finite() && target_mw > 0.0) {
            return Err(SelectionError::InvalidTarget(target_mw).into());
        }
        let pool = self.candidate_pool(date).await?;
        let selection = select_for_target_with_policy(target_mw, &pool, &self.policy)?;
        let proposal = build_proposal(target_mw, selection);

        if proposal.classification == Classification::Insufficient {
            warn!(
                target_mw,
                achieved_mw = proposal.achieved_mw,
                coverage_ratio = proposal.coverage_ratio,
                "proposal falls short of the tolerance floor"
            );
        }
        info!(
            %date,
            target_mw,
            achieved_mw = proposal.achieved_mw,
            circuits = proposal.selected.len(),
            classification = %proposal.classification,
            "rotation proposed"
        );
        Ok(proposal)
    }

    /// Record an operator-approved rotation.
    ///
    /// The achieved MW is recomputed from the current circuit loads. Every
    /// circuit must exist, appear once, have a known load and be in the
    /// candidate pool for `date`.
    pub async fn confirm(
        &self,
        requested_mw: f64,
        circuit_ids: Vec<CircuitId>,
        date: NaiveDate,
    ) -> Result<RotationRecord, ServiceError> {
        if !(requested_mw.is_finite() && requested_mw > 0.0) {
            return Err(SelectionError::InvalidTarget(requested_mw).into());
        }
        if circuit_ids.is_empty() {
            return Err(ServiceError::EmptyRotation);
        }
        if let Some(id) = circuit_ids.iter().duplicates().next() {
            return Err(ServiceError::DuplicateCircuit(*id));
        }

        let circuits = self.repos.circuits.list_circuits().await?;
        let windows = self.repos.protections.active_on(date).await?;
        let pool = filter_eligible(&circuits, &windows, date);

        let mut achieved_mw = 0.0;
        for id in &circuit_ids {
            if !circuits.iter().any(|c| c.id == *id) {
                return Err(ServiceError::NotFound(format!("Circuit {}", id)));
            }
            let circuit = pool
                .iter()
                .find(|c| c.id == *id)
                .ok_or(ServiceError::NotEligible(*id, date))?;
            achieved_mw += circuit
                .known_load_mw()
                .ok_or(ServiceError::UnknownLoad(*id))?;
        }

        let confirmation = RotationConfirmation::new(requested_mw, achieved_mw, circuit_ids);
        let record = self
            .repos
            .rotations
            .record(confirmation)
            .await
            .map_err(ServiceError::Sink)?;

        info!(
            rotation_id = %record.id,
            requested_mw,
            achieved_mw,
            circuits = record.confirmation.circuit_count(),
            "rotation confirmed"
        );
        Ok(record)
    }

    pub async fn rotation_history(&self) -> Result<Vec<RotationRecord>> {
        self.repos.rotations.list_rotations().await
    }

    pub async fn dashboard(&self, date: NaiveDate) -> Result<DashboardSummary> {
        let circuits = self.repos.circuits.list_circuits().await?;
        let windows = self.repos.protections.active_on(date).await?;
        Ok(DashboardSummary::compute(&circuits, &windows, date))
    }
}
