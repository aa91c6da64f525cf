use crate::application::indicators::IndicatorEngine;
use crate::application::sentiment_aggregator;
use crate::application::synthesizer::RecommendationSynthesizer;
use crate::domain::config::AnalysisConfig;
use crate::domain::errors::AnalysisError;
use crate::domain::market::{Candle, PriceSeries, TimeframeSelector};
use crate::domain::report::AnalysisReport;
use crate::domain::sentiment::NewsItemScore;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

/// The I/O-free analysis core.
///
/// Holds only configuration, so one instance can serve any number of
/// concurrent requests.
#[derive(Default)]
pub struct AnalysisCore {
    engine: IndicatorEngine,
    synthesizer: RecommendationSynthesizer,
}

impl AnalysisCore {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            engine: IndicatorEngine::new(config.indicators),
            synthesizer: RecommendationSynthesizer::new(config.fusion),
        }
    }

    /// Validates the candles, runs the indicator engine and the sentiment
    /// aggregator side by side, then fuses them.
    pub fn analyze(
        &self,
        ticker: &str,
        timeframe: TimeframeSelector,
        candles: Vec<Candle>,
        scores: &[NewsItemScore],
    ) -> Result<AnalysisReport, AnalysisError> {
        let granularity = timeframe.resolve().granularity;
        let series = PriceSeries::new(ticker, granularity, candles)?;

        let (technical, sentiment) = rayon::join(
            || self.engine.compute(&series),
            || sentiment_aggregator::aggregate(scores),
        );
        let technical = technical?;

        let summary = series.summary().ok_or(AnalysisError::InsufficientData {
            required: self.engine.config().min_candles,
            available: 0,
        })?;

        let recommendation =
            self.synthesizer
                .synthesize(&technical, &sentiment, summary.current_price);

        info!(
            "AnalysisCore [{} {}]: {} confidence={:.2} entry={:.4} target={:.4} stop={:.4}",
            ticker,
            timeframe,
            recommendation.action,
            recommendation.confidence,
            recommendation.entry_price,
            recommendation.target_price,
            recommendation.stop_loss_price
        );

        Ok(AnalysisReport {
            id: Uuid::new_v4(),
            ticker: ticker.to_string(),
            timeframe,
            granularity,
            summary,
            technical,
            sentiment,
            recommendation,
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recommendation::Action;
    use chrono::{Duration, TimeZone};

    fn rising_candles(n: usize) -> Vec<Candle> {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64;
                Candle::new(
                    start + Duration::minutes(i as i64),
                    close - 0.5,
                    close + 0.5,
                    close - 1.0,
                    close,
                    Some(1000.0),
                )
            })
            .collect()
    }

    #[test]
    fn test_rising_market_without_news_buys() {
        let report = AnalysisCore::default()
            .analyze("BTC/USD", TimeframeSelector::OneHour, rising_candles(60), &[])
            .unwrap();

        assert_eq!(report.recommendation.action, Action::Buy);
        assert_eq!(report.recommendation.entry_price, 159.0);
        assert_eq!(report.sentiment.article_count, 0);
        assert_eq!(report.summary.candle_count, 60);
        assert!(report.recommendation.stop_loss_price < report.recommendation.entry_price);
        assert!(report.recommendation.target_price > report.recommendation.entry_price);
    }

    #[test]
    fn test_short_history_produces_no_report() {
        let err = AnalysisCore::default()
            .analyze("BTC/USD", TimeframeSelector::OneHour, rising_candles(12), &[])
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientData {
                required: 30,
                available: 12
            }
        ));
    }
}
