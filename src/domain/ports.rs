use crate::domain::errors::ProviderError;
use crate::domain::market::{Candle, Granularity};
use crate::domain::report::AnalysisReport;
use crate::domain::sentiment::{NewsArticle, NewsItemScore};
use async_trait::async_trait;
use chrono::Duration;

#[async_trait]
pub trait PriceDataService: Send + Sync {
    /// Candles covering `lookback` up to now, oldest first.
    async fn get_candles(
        &self,
        ticker: &str,
        lookback: Duration,
        granularity: Granularity,
    ) -> Result<Vec<Candle>, ProviderError>;
}

#[async_trait]
pub trait NewsDataService: Send + Sync {
    /// Articles about `ticker` published within `lookback`. May be empty.
    async fn get_articles(
        &self,
        ticker: &str,
        lookback: Duration,
    ) -> Result<Vec<NewsArticle>, ProviderError>;
}

#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Scores one article. Fails with `ScoringUnavailable` for that article only.
    async fn score(
        &self,
        ticker: &str,
        article: &NewsArticle,
    ) -> Result<NewsItemScore, ProviderError>;
}

#[async_trait]
pub trait ReportDelivery: Send + Sync {
    async fn deliver(
        &self,
        report: &AnalysisReport,
        destination: &str,
    ) -> Result<(), ProviderError>;
}
