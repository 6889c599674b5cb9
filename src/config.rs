use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::net::SocketAddr;

use crate::rotation::{TolerancePolicy, DEFAULT_TOLERANCE_RATIO};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub db: DbConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub enable_cors: bool,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RotationConfig {
    /// Fraction of the target below which a proposal is flagged insufficient
    #[serde(default = "default_tolerance_ratio")]
    pub tolerance_ratio: f64,
    /// Serve the built-in sample network instead of real collaborators
    #[serde(default)]
    pub demo_data: bool,
}

fn default_tolerance_ratio() -> f64 {
    DEFAULT_TOLERANCE_RATIO
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            tolerance_ratio: DEFAULT_TOLERANCE_RATIO,
            demo_data: false,
        }
    }
}

impl RotationConfig {
    pub fn tolerance_policy(&self) -> Result<TolerancePolicy> {
        Ok(TolerancePolicy::new(self.tolerance_ratio)?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DbConfig {
    #[serde(default)]
    pub url: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file("config/default.toml"))
                .merge(Env::prefixed("ROTATION__").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.rotation.tolerance_policy()?;
        #[cfg(feature = "db")]
        if !self.rotation.demo_data && self.db.url.is_empty() {
            anyhow::bail!("db.url must be set when the db feature is enabled");
        }
        Ok(())
    }
}
