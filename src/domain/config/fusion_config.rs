//! Fusion Configuration Domain Value Object
//!
//! Weights and thresholds the recommendation synthesizer combines the
//! technical and sentiment signals with.

use super::AnalysisConfigError;
use super::indicator_config::{validate_fraction, validate_multiple};

const WEIGHT_EPSILON: f64 = 1e-6;

/// Fusion configuration value object
///
/// # Invariants
///
/// - `technical_weight + sentiment_weight == 1` and `technical_weight >= sentiment_weight`
/// - `trend_weight + momentum_weight + proximity_weight == 1`
/// - `action_threshold` in (0.0, 1.0]
#[derive(Debug, Clone, PartialEq)]
pub struct FusionConfig {
    /// w_t
    pub technical_weight: f64,
    /// w_s
    pub sentiment_weight: f64,

    // Technical score composition
    pub trend_weight: f64,
    pub momentum_weight: f64,
    pub proximity_weight: f64,

    /// |combined| must exceed this to trade
    pub action_threshold: f64,
    /// Distance, in ATR units, at which level proximity fades to zero
    pub proximity_range_atr: f64,
    /// k in `entry ± k × ATR` when no level is available
    pub fallback_atr_multiple: f64,
    /// Contributions at or below this magnitude stay out of the rationale
    pub negligible_contribution: f64,
    /// Price scale used when ATR is zero, as a fraction of entry
    pub zero_volatility_fraction: f64,
    /// Floor for a fallback stop, as a fraction of entry
    pub min_stop_fraction: f64,
}

impl FusionConfig {
    pub fn validate(&self) -> Result<(), AnalysisConfigError> {
        for (field, value) in [
            ("technical_weight", self.technical_weight),
            ("sentiment_weight", self.sentiment_weight),
            ("trend_weight", self.trend_weight),
            ("momentum_weight", self.momentum_weight),
            ("proximity_weight", self.proximity_weight),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(AnalysisConfigError::InvalidWeight {
                    field: field.to_string(),
                    value,
                });
            }
        }

        let fusion_sum = self.technical_weight + self.sentiment_weight;
        if (fusion_sum - 1.0).abs() > WEIGHT_EPSILON {
            return Err(AnalysisConfigError::WeightsDoNotSum {
                group: "technical/sentiment".to_string(),
                sum: fusion_sum,
            });
        }
        if self.technical_weight < self.sentiment_weight {
            return Err(AnalysisConfigError::SentimentDominates {
                technical: self.technical_weight,
                sentiment: self.sentiment_weight,
            });
        }

        let technical_sum = self.trend_weight + self.momentum_weight + self.proximity_weight;
        if (technical_sum - 1.0).abs() > WEIGHT_EPSILON {
            return Err(AnalysisConfigError::WeightsDoNotSum {
                group: "trend/momentum/proximity".to_string(),
                sum: technical_sum,
            });
        }

        validate_fraction("action_threshold", self.action_threshold)?;
        validate_fraction("zero_volatility_fraction", self.zero_volatility_fraction)?;
        validate_fraction("min_stop_fraction", self.min_stop_fraction)?;
        validate_multiple("negligible_contribution", self.negligible_contribution)?;
        validate_multiple("fallback_atr_multiple", self.fallback_atr_multiple)?;

        if !self.proximity_range_atr.is_finite() || self.proximity_range_atr <= 0.0 {
            return Err(AnalysisConfigError::InvalidMultiple {
                field: "proximity_range_atr".to_string(),
                value: self.proximity_range_atr,
            });
        }

        Ok(())
    }
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            technical_weight: 0.7,
            sentiment_weight: 0.3,
            trend_weight: 0.55,
            momentum_weight: 0.35,
            proximity_weight: 0.10,
            action_threshold: 0.15,
            proximity_range_atr: 2.0,
            fallback_atr_multiple: 2.0,
            negligible_contribution: 0.01,
            zero_volatility_fraction: 0.01,
            min_stop_fraction: 0.01,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(FusionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_fusion_weights_must_sum_to_one() {
        let config = FusionConfig {
            technical_weight: 0.6,
            sentiment_weight: 0.3,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalysisConfigError::WeightsDoNotSum { .. })
        ));
    }

    #[test]
    fn test_sentiment_cannot_dominate() {
        let config = FusionConfig {
            technical_weight: 0.4,
            sentiment_weight: 0.6,
            ..Default::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            AnalysisConfigError::SentimentDominates {
                technical: 0.4,
                sentiment: 0.6,
            }
        );
    }

    #[test]
    fn test_equal_weights_allowed() {
        let config = FusionConfig {
            technical_weight: 0.5,
            sentiment_weight: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_technical_components_must_sum_to_one() {
        let config = FusionConfig {
            trend_weight: 0.6,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalysisConfigError::WeightsDoNotSum { ref group, .. }) if group == "trend/momentum/proximity"
        ));
    }
}
