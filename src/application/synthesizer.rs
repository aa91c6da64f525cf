use crate::domain::config::FusionConfig;
use crate::domain::recommendation::{Action, Recommendation, ScoreBreakdown};
use crate::domain::sentiment::SentimentSignal;
use crate::domain::signal::{TechnicalSignal, Trend};

/// One named input to the combined score, with its signed contribution.
#[derive(Debug, Clone)]
struct Factor {
    contribution: f64,
    description: String,
}

/// Fuses the technical and sentiment signals into a single recommendation.
#[derive(Debug, Clone, Default)]
pub struct RecommendationSynthesizer {
    config: FusionConfig,
}

impl RecommendationSynthesizer {
    pub fn new(config: FusionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn synthesize(
        &self,
        technical: &TechnicalSignal,
        sentiment: &SentimentSignal,
        current_price: f64,
    ) -> Recommendation {
        let cfg = &self.config;
        let entry = current_price;
        let scale = self.price_scale(technical, entry);

        let (support_closeness, resistance_closeness) = self.level_closeness(technical, entry, scale);
        let proximity = support_closeness - resistance_closeness;
        let momentum = technical.momentum.clamp(-1.0, 1.0);

        let trend_part = cfg.trend_weight * technical.trend.direction();
        let momentum_part = cfg.momentum_weight * momentum;
        let proximity_part = cfg.proximity_weight * proximity;
        let technical_score = (trend_part + momentum_part + proximity_part).clamp(-1.0, 1.0);

        let sentiment_score = sentiment.effective_polarity().clamp(-1.0, 1.0);
        let combined = cfg.technical_weight * technical_score + cfg.sentiment_weight * sentiment_score;

        // Boundary resolves to hold
        let action = if combined > cfg.action_threshold {
            Action::Buy
        } else if combined < -cfg.action_threshold {
            Action::Sell
        } else {
            Action::Hold
        };

        let mut confidence = combined.abs();
        if sentiment.strength > 0.0 {
            confidence *= (1.0 - sentiment.dispersion).clamp(0.0, 1.0);
        }
        let confidence = confidence.clamp(0.0, 1.0);

        let (target_price, stop_loss_price) = self.price_targets(action, technical, entry, scale);

        let factors = vec![
            Factor {
                contribution: cfg.technical_weight * trend_part,
                description: describe_trend(technical),
            },
            Factor {
                contribution: cfg.technical_weight * momentum_part,
                description: describe_momentum(momentum),
            },
            Factor {
                contribution: cfg.technical_weight * proximity_part,
                description: describe_proximity(technical, entry, support_closeness, resistance_closeness),
            },
            Factor {
                contribution: cfg.sentiment_weight * sentiment_score,
                description: describe_sentiment(sentiment),
            },
        ];
        let rationale = self.rank_factors(factors);

        tracing::debug!(
            "Synthesizer: technical={:.3} sentiment={:.3} combined={:.3} threshold={:.3} -> {} (confidence={:.3})",
            technical_score,
            sentiment_score,
            combined,
            cfg.action_threshold,
            action,
            confidence
        );

        Recommendation {
            action,
            confidence,
            entry_price: entry,
            target_price,
            stop_loss_price,
            rationale,
            scores: ScoreBreakdown {
                technical: technical_score,
                sentiment: sentiment_score,
                combined,
            },
        }
    }

    /// ATR, or a small fraction of price when the series never moved.
    fn price_scale(&self, technical: &TechnicalSignal, entry: f64) -> f64 {
        if technical.volatility > 0.0 {
            technical.volatility
        } else {
            (entry * self.config.zero_volatility_fraction).abs()
        }
    }

    /// Linear closeness in [0, 1] to the nearest support at or below and the
    /// nearest resistance at or above the entry.
    fn level_closeness(&self, technical: &TechnicalSignal, entry: f64, scale: f64) -> (f64, f64) {
        let range = self.config.proximity_range_atr;
        let closeness = |distance: Option<f64>| match distance {
            Some(d) if scale > 0.0 => (1.0 - (d / scale) / range).max(0.0),
            Some(_) => 1.0,
            None => 0.0,
        };
        (
            closeness(technical.support_distance(entry)),
            closeness(technical.resistance_distance(entry)),
        )
    }

    fn price_targets(
        &self,
        action: Action,
        technical: &TechnicalSignal,
        entry: f64,
        scale: f64,
    ) -> (f64, f64) {
        let offset = self.config.fallback_atr_multiple * scale;
        let floor = entry * self.config.min_stop_fraction;
        let below = |fallback: f64| fallback.max(floor);

        match action {
            Action::Hold => (entry, entry),
            Action::Buy => (
                technical
                    .nearest_resistance_above(entry)
                    .unwrap_or(entry + offset),
                technical
                    .nearest_support_below(entry)
                    .unwrap_or_else(|| below(entry - offset)),
            ),
            Action::Sell => (
                technical
                    .nearest_support_below(entry)
                    .unwrap_or_else(|| below(entry - offset)),
                technical
                    .nearest_resistance_above(entry)
                    .unwrap_or(entry + offset),
            ),
        }
    }

    /// Non-negligible factors, largest absolute contribution first.
    fn rank_factors(&self, mut factors: Vec<Factor>) -> Vec<String> {
        factors.retain(|f| f.contribution.abs() > self.config.negligible_contribution);
        factors.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
        factors.into_iter().map(|f| f.description).collect()
    }
}

fn describe_trend(technical: &TechnicalSignal) -> String {
    match technical.trend {
        Trend::Up => format!(
            "Uptrend: short MA {:.2} above long MA {:.2}",
            technical.short_ma, technical.long_ma
        ),
        Trend::Down => format!(
            "Downtrend: short MA {:.2} below long MA {:.2}",
            technical.short_ma, technical.long_ma
        ),
        Trend::Flat => "No clear trend".to_string(),
    }
}

fn describe_momentum(momentum: f64) -> String {
    let strength = match momentum.abs() {
        m if m >= 0.6 => "strong",
        m if m >= 0.3 => "moderate",
        _ => "weak",
    };
    let direction = if momentum >= 0.0 { "positive" } else { "negative" };
    format!("Momentum {:+.2} ({} {})", momentum, strength, direction)
}

fn describe_proximity(
    technical: &TechnicalSignal,
    entry: f64,
    support_closeness: f64,
    resistance_closeness: f64,
) -> String {
    if support_closeness >= resistance_closeness {
        match technical.support_distance(entry) {
            Some(d) => format!("Price near support {:.2} ({:.2}% above)", entry - d, d / entry * 100.0),
            None => "No nearby support".to_string(),
        }
    } else {
        match technical.resistance_distance(entry) {
            Some(d) => format!("Price near resistance {:.2} ({:.2}% below)", entry + d, d / entry * 100.0),
            None => "No nearby resistance".to_string(),
        }
    }
}

fn describe_sentiment(sentiment: &SentimentSignal) -> String {
    format!(
        "{} news sentiment: polarity {:+.2}, strength {:.2} across {} articles (dispersion {:.2})",
        sentiment.label(),
        sentiment.aggregate_polarity,
        sentiment.strength,
        sentiment.article_count,
        sentiment.dispersion
    )
}
