use crate::domain::market::{Granularity, SeriesSummary, TimeframeSelector};
use crate::domain::recommendation::Recommendation;
use crate::domain::sentiment::SentimentSignal;
use crate::domain::signal::TechnicalSignal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything one analysis produced, as handed to report delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub ticker: String,
    pub timeframe: TimeframeSelector,
    pub granularity: Granularity,
    pub summary: SeriesSummary,
    pub technical: TechnicalSignal,
    pub sentiment: SentimentSignal,
    pub recommendation: Recommendation,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// One-line subject, e.g. `BTC/USD Hourly Analysis: BUY (62%)`.
    pub fn subject(&self) -> String {
        format!(
            "{} {} Analysis: {} ({:.0}%)",
            self.ticker,
            self.timeframe.label(),
            self.recommendation.action,
            self.recommendation.confidence * 100.0
        )
    }
}
