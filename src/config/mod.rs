//! Configuration module for the advisor.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Analysis, Providers, Delivery, and Observability.

mod analysis_env_config;
mod delivery_config;
mod observability_config;
mod provider_config;

pub use analysis_env_config::AnalysisEnvConfig;
pub use delivery_config::{DeliveryEnvConfig, DeliverySink};
pub use observability_config::ObservabilityEnvConfig;
pub use provider_config::{NewsSource, PriceSource, ProviderEnvConfig};

use crate::domain::config::AnalysisConfig;
use anyhow::{Context, Result};
use std::env;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub provider: ProviderEnvConfig,
    pub delivery: DeliveryEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Sub-configurations are loaded independently and the analysis
    /// parameters are validated before the config is returned.
    pub fn from_env() -> Result<Self> {
        let analysis = AnalysisEnvConfig::from_env()
            .context("Failed to load analysis config")?
            .to_analysis_config()?;
        let provider = ProviderEnvConfig::from_env().context("Failed to load provider config")?;
        let delivery = DeliveryEnvConfig::from_env().context("Failed to load delivery config")?;
        let observability = ObservabilityEnvConfig::from_env();

        Ok(Self {
            analysis,
            provider,
            delivery,
            observability,
        })
    }
}

fn parse_usize(key: &str, default: usize) -> Result<usize> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .context(format!("Failed to parse {}", key))
}

fn parse_f64(key: &str, default: f64) -> Result<f64> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<f64>()
        .context(format!("Failed to parse {}", key))
}

fn parse_u32(key: &str, default: u32) -> Result<u32> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u32>()
        .context(format!("Failed to parse {}", key))
}

fn parse_u64(key: &str, default: u64) -> Result<u64> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .context(format!("Failed to parse {}", key))
}

fn parse_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<bool>()
        .unwrap_or(default)
}
