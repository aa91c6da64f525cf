//! Configuration domain module
//!
//! Value objects holding the tunable parameters of the analysis core. Each one
//! has documented defaults and validates its own invariants.

pub mod fusion_config;
pub mod indicator_config;

pub use fusion_config::FusionConfig;
pub use indicator_config::IndicatorConfig;

use thiserror::Error;

/// Error type for analysis configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisConfigError {
    #[error("Invalid count: {field} = {value}")]
    InvalidCount { field: String, value: usize },

    #[error("Invalid fraction: {field} = {value}. Must be in (0.0, 1.0]")]
    InvalidFraction { field: String, value: f64 },

    #[error("Invalid multiple: {field} = {value}. Must be finite and non-negative")]
    InvalidMultiple { field: String, value: f64 },

    #[error("Invalid weight: {field} = {value}. Must be between 0.0 and 1.0")]
    InvalidWeight { field: String, value: f64 },

    #[error("Weights {group} sum to {sum}, expected 1.0")]
    WeightsDoNotSum { group: String, sum: f64 },

    #[error("Sentiment weight {sentiment} exceeds technical weight {technical}")]
    SentimentDominates { technical: f64, sentiment: f64 },
}

/// Full configuration of the pure analysis core.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisConfig {
    pub indicators: IndicatorConfig,
    pub fusion: FusionConfig,
}

impl AnalysisConfig {
    /// Create a new AnalysisConfig with validation
    pub fn new(
        indicators: IndicatorConfig,
        fusion: FusionConfig,
    ) -> Result<Self, AnalysisConfigError> {
        let config = Self { indicators, fusion };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisConfigError> {
        self.indicators.validate()?;
        self.fusion.validate()
    }
}
