//! Technical indicator engine.
//!
//! Turns a validated [`PriceSeries`] into a [`TechnicalSignal`]. Everything
//! here is pure and deterministic over its input.

pub mod levels;
pub mod momentum;
pub mod moving_average;
pub mod volatility;
pub mod volume;

use crate::domain::config::IndicatorConfig;
use crate::domain::errors::AnalysisError;
use crate::domain::market::PriceSeries;
use crate::domain::signal::{TechnicalSignal, VolumeTrend};
use levels::ExtremumKind;
use tracing::{debug, warn};

pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    pub fn compute(&self, series: &PriceSeries) -> Result<TechnicalSignal, AnalysisError> {
        let n = series.len();
        if n < self.config.min_candles {
            return Err(AnalysisError::InsufficientData {
                required: self.config.min_candles,
                available: n,
            });
        }

        let closes = series.closes();
        let volatility = volatility::average_true_range(series.candles());

        let short_window = moving_average::window_length(
            n,
            self.config.short_window_fraction,
            self.config.min_window,
        );
        let long_window = moving_average::window_length(
            n,
            self.config.long_window_fraction,
            self.config.min_window,
        );
        let insufficient = || AnalysisError::InsufficientData {
            required: long_window,
            available: n,
        };
        let short_ma = moving_average::trailing_sma(&closes, short_window).ok_or_else(insufficient)?;
        let long_ma = moving_average::trailing_sma(&closes, long_window).ok_or_else(insufficient)?;
        let trend = moving_average::classify_trend(
            short_ma,
            long_ma,
            self.config.trend_noise_atr * volatility,
        );

        let momentum = momentum::momentum(&closes, self.config.momentum_fraction, volatility);

        let tolerance = self.config.cluster_tolerance_atr * volatility;
        let k = self.config.extremum_window;
        let support_levels = levels::cluster_levels(
            &levels::local_extrema(&closes, k, ExtremumKind::Minimum),
            tolerance,
            self.config.max_levels,
        );
        let resistance_levels = levels::cluster_levels(
            &levels::local_extrema(&closes, k, ExtremumKind::Maximum),
            tolerance,
            self.config.max_levels,
        );

        let volume_trend = self.volume_trend(series)?;

        debug!(
            "IndicatorEngine [{}]: n={} atr={:.6} sma{}={:.6} sma{}={:.6} trend={} momentum={:.3} supports={} resistances={} volume={}",
            series.ticker(),
            n,
            volatility,
            short_window,
            short_ma,
            long_window,
            long_ma,
            trend,
            momentum,
            support_levels.len(),
            resistance_levels.len(),
            volume_trend
        );

        Ok(TechnicalSignal {
            trend,
            momentum,
            support_levels,
            resistance_levels,
            volume_trend,
            volatility,
            short_ma,
            long_ma,
        })
    }

    fn volume_trend(&self, series: &PriceSeries) -> Result<VolumeTrend, AnalysisError> {
        if !series.has_volume() {
            if self.config.require_volume {
                let err = AnalysisError::MalformedCandle {
                    index: 0,
                    reason: "volume required but missing".to_string(),
                };
                warn!("IndicatorEngine [{}]: {}", series.ticker(), err);
                return Err(err);
            }
            return Ok(VolumeTrend::Stable);
        }

        // Once a feed reports volume, every candle must carry it
        let mut volumes = Vec::with_capacity(series.len());
        for (index, candle) in series.candles().iter().enumerate() {
            match candle.volume {
                Some(v) => volumes.push(v),
                None => {
                    let err = AnalysisError::MalformedCandle {
                        index,
                        reason: "missing volume".to_string(),
                    };
                    warn!("IndicatorEngine [{}]: {}", series.ticker(), err);
                    return Err(err);
                }
            }
        }

        Ok(volume::volume_trend(
            &volumes,
            self.config.volume_change_threshold,
        ))
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(IndicatorConfig::default())
    }
}
