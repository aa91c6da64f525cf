//! Indicator Configuration Domain Value Object
//!
//! Window fractions, extremum detection and clustering parameters for the
//! indicator engine.

use super::AnalysisConfigError;

/// Indicator engine configuration value object
///
/// # Invariants
///
/// - `min_candles` >= 3 and leaves room for at least one full extremum window
/// - All fractions must be in (0.0, 1.0]
/// - All ATR multiples must be finite and >= 0.0
/// - `max_levels` and `extremum_window` must be > 0
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    /// Fewest candles the engine accepts
    pub min_candles: usize,

    // Moving averages
    pub short_window_fraction: f64,
    pub long_window_fraction: f64,
    pub min_window: usize,
    /// Trend noise band, in ATR units
    pub trend_noise_atr: f64,

    // Momentum
    pub momentum_fraction: f64,

    // Support / resistance
    /// Neighbours on each side a point must dominate to count as an extremum
    pub extremum_window: usize,
    pub cluster_tolerance_atr: f64,
    pub max_levels: usize,

    // Volume
    pub volume_change_threshold: f64,
    /// Treat a series without any volume as malformed
    pub require_volume: bool,
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), AnalysisConfigError> {
        if self.min_candles < 3 {
            return Err(AnalysisConfigError::InvalidCount {
                field: "min_candles".to_string(),
                value: self.min_candles,
            });
        }
        if self.extremum_window == 0 || 2 * self.extremum_window + 1 > self.min_candles {
            return Err(AnalysisConfigError::InvalidCount {
                field: "extremum_window".to_string(),
                value: self.extremum_window,
            });
        }
        if self.max_levels == 0 {
            return Err(AnalysisConfigError::InvalidCount {
                field: "max_levels".to_string(),
                value: self.max_levels,
            });
        }
        if self.min_window < 2 {
            return Err(AnalysisConfigError::InvalidCount {
                field: "min_window".to_string(),
                value: self.min_window,
            });
        }

        validate_fraction("short_window_fraction", self.short_window_fraction)?;
        validate_fraction("long_window_fraction", self.long_window_fraction)?;
        validate_fraction("momentum_fraction", self.momentum_fraction)?;
        validate_fraction("volume_change_threshold", self.volume_change_threshold)?;

        if self.short_window_fraction >= self.long_window_fraction {
            return Err(AnalysisConfigError::InvalidFraction {
                field: "short_window_fraction".to_string(),
                value: self.short_window_fraction,
            });
        }

        validate_multiple("trend_noise_atr", self.trend_noise_atr)?;
        validate_multiple("cluster_tolerance_atr", self.cluster_tolerance_atr)?;

        Ok(())
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            min_candles: 30,
            short_window_fraction: 0.1,
            long_window_fraction: 1.0 / 3.0,
            min_window: 2,
            trend_noise_atr: 0.25,
            momentum_fraction: 0.2,
            extremum_window: 2,
            cluster_tolerance_atr: 0.5,
            max_levels: 3,
            volume_change_threshold: 0.10,
            require_volume: false,
        }
    }
}

pub(super) fn validate_fraction(field: &str, value: f64) -> Result<(), AnalysisConfigError> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(AnalysisConfigError::InvalidFraction {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

pub(super) fn validate_multiple(field: &str, value: f64) -> Result<(), AnalysisConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AnalysisConfigError::InvalidMultiple {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(IndicatorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_short_window_must_be_shorter() {
        let config = IndicatorConfig {
            short_window_fraction: 0.5,
            long_window_fraction: 0.4,
            ..Default::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            AnalysisConfigError::InvalidFraction {
                field: "short_window_fraction".to_string(),
                value: 0.5,
            }
        );
    }

    #[test]
    fn test_lowered_minimum_is_allowed() {
        let config = IndicatorConfig {
            min_candles: 10,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = IndicatorConfig {
            min_candles: 4,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalysisConfigError::InvalidCount { ref field, .. }) if field == "extremum_window"
        ));
    }

    #[test]
    fn test_zero_fraction_rejected() {
        let config = IndicatorConfig {
            momentum_fraction: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
