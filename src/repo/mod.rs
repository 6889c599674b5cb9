//! Collaborators the rotation service reads from and writes to.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::config::Config;
use crate::domain::{Circuit, CircuitId, ProtectionWindow, RotationConfirmation, RotationRecord};

pub mod memory;
#[cfg(feature = "db")]
pub mod pg;

pub use memory::MemoryStore;

/// Source of circuits with their eligibility, load and client attributes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CircuitRepository: Send + Sync {
    async fn list_circuits(&self) -> Result<Vec<Circuit>>;
    async fn get_circuit(&self, id: CircuitId) -> Result<Option<Circuit>>;
}

/// Registry of protection windows ("aseguramientos").
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProtectionRegistry: Send + Sync {
    /// Windows covering `date`, bounds inclusive.
    async fn active_on(&self, date: NaiveDate) -> Result<Vec<ProtectionWindow>>;
    async fn list_windows(&self) -> Result<Vec<ProtectionWindow>>;
    async fn create_window(&self, window: ProtectionWindow) -> Result<ProtectionWindow>;
}

/// Accepts confirmed rotations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RotationSink: Send + Sync {
    async fn record(&self, confirmation: RotationConfirmation) -> Result<RotationRecord>;
    async fn list_rotations(&self) -> Result<Vec<RotationRecord>>;
}

#[derive(Clone)]
pub struct Repositories {
    pub circuits: Arc<dyn CircuitRepository>,
    pub protections: Arc<dyn ProtectionRegistry>,
    pub rotations: Arc<dyn RotationSink>,
}

impl Repositories {
    pub async fn new(cfg: &Config) -> Result<Self> {
        if cfg.rotation.demo_data {
            tracing::warn!("demo data enabled, serving the built-in sample network");
            return Ok(Self::in_memory(crate::demo::demo_store()));
        }

        #[cfg(feature = "db")]
        {
            let repo = Arc::new(pg::PgRepo::connect(&cfg.db.url).await?);
            return Ok(Self {
                circuits: repo.clone(),
                protections: repo.clone(),
                rotations: repo,
            });
        }

        #[cfg(not(feature = "db"))]
        {
            tracing::info!("no database backend compiled in, starting with an empty in-memory store");
            return Ok(Self::in_memory(MemoryStore::default()));
        }
    }

    pub fn in_memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            circuits: store.clone(),
            protections: store.clone(),
            rotations: store,
        }
    }
}
