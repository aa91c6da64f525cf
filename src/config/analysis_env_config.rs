//! Analysis parameter parsing from environment variables.
//!
//! Every indicator and fusion knob can be overridden; unset variables fall back
//! to the documented defaults of the domain value objects.

use super::{parse_bool, parse_f64, parse_usize};
use crate::domain::config::{AnalysisConfig, FusionConfig, IndicatorConfig};
use anyhow::{Context, Result};

/// Analysis environment configuration
#[derive(Debug, Clone)]
pub struct AnalysisEnvConfig {
    pub indicators: IndicatorConfig,
    pub fusion: FusionConfig,
}

impl AnalysisEnvConfig {
    pub fn from_env() -> Result<Self> {
        let i = IndicatorConfig::default();
        let indicators = IndicatorConfig {
            min_candles: parse_usize("MIN_CANDLES", i.min_candles)?,
            short_window_fraction: parse_f64("SHORT_WINDOW_FRACTION", i.short_window_fraction)?,
            long_window_fraction: parse_f64("LONG_WINDOW_FRACTION", i.long_window_fraction)?,
            min_window: parse_usize("MIN_WINDOW", i.min_window)?,
            trend_noise_atr: parse_f64("TREND_NOISE_ATR", i.trend_noise_atr)?,
            momentum_fraction: parse_f64("MOMENTUM_FRACTION", i.momentum_fraction)?,
            extremum_window: parse_usize("EXTREMUM_WINDOW", i.extremum_window)?,
            cluster_tolerance_atr: parse_f64("CLUSTER_TOLERANCE_ATR", i.cluster_tolerance_atr)?,
            max_levels: parse_usize("MAX_LEVELS", i.max_levels)?,
            volume_change_threshold: parse_f64(
                "VOLUME_CHANGE_THRESHOLD",
                i.volume_change_threshold,
            )?,
            require_volume: parse_bool("REQUIRE_VOLUME", i.require_volume),
        };

        let f = FusionConfig::default();
        let fusion = FusionConfig {
            technical_weight: parse_f64("TECHNICAL_WEIGHT", f.technical_weight)?,
            sentiment_weight: parse_f64("SENTIMENT_WEIGHT", f.sentiment_weight)?,
            trend_weight: parse_f64("TREND_WEIGHT", f.trend_weight)?,
            momentum_weight: parse_f64("MOMENTUM_WEIGHT", f.momentum_weight)?,
            proximity_weight: parse_f64("PROXIMITY_WEIGHT", f.proximity_weight)?,
            action_threshold: parse_f64("ACTION_THRESHOLD", f.action_threshold)?,
            proximity_range_atr: parse_f64("PROXIMITY_RANGE_ATR", f.proximity_range_atr)?,
            fallback_atr_multiple: parse_f64("FALLBACK_ATR_MULTIPLE", f.fallback_atr_multiple)?,
            negligible_contribution: parse_f64(
                "NEGLIGIBLE_CONTRIBUTION",
                f.negligible_contribution,
            )?,
            zero_volatility_fraction: f.zero_volatility_fraction,
            min_stop_fraction: f.min_stop_fraction,
        };

        Ok(Self { indicators, fusion })
    }

    /// Validated analysis configuration.
    pub fn to_analysis_config(&self) -> Result<AnalysisConfig> {
        AnalysisConfig::new(self.indicators.clone(), self.fusion.clone())
            .context("Invalid analysis configuration")
    }
}
