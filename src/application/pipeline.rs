use crate::application::analysis::AnalysisCore;
use crate::application::retry::RetryPolicy;
use crate::domain::config::AnalysisConfig;
use crate::domain::errors::{AdvisorError, AnalysisError, ProviderError};
use crate::domain::market::{Candle, TimeframeResolution, TimeframeSelector};
use crate::domain::ports::{NewsDataService, PriceDataService, ReportDelivery, SentimentScorer};
use crate::domain::report::AnalysisReport;
use crate::domain::sentiment::{NewsArticle, NewsItemScore};
use crate::infrastructure::observability::Metrics;
use futures::stream::{self, StreamExt};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// What happened to the report after it was computed.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryStatus {
    Delivered { destination: String },
    Failed { error: ProviderError },
    /// No destination was given
    Skipped,
}

impl DeliveryStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, DeliveryStatus::Failed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    pub delivery: DeliveryStatus,
    /// Articles whose scoring failed and that were left out of the sentiment signal
    pub dropped_articles: usize,
}

/// Orchestrates one analysis request end to end.
///
/// Holds no per-request state; every call to [`run`](Self::run) builds its
/// own values and discards them when it returns.
pub struct AnalysisPipeline {
    price: Arc<dyn PriceDataService>,
    news: Arc<dyn NewsDataService>,
    scorer: Arc<dyn SentimentScorer>,
    delivery: Arc<dyn ReportDelivery>,
    core: AnalysisCore,
    retry: RetryPolicy,
    scoring_concurrency: usize,
    metrics: Option<Metrics>,
}

impl AnalysisPipeline {
    pub fn new(
        price: Arc<dyn PriceDataService>,
        news: Arc<dyn NewsDataService>,
        scorer: Arc<dyn SentimentScorer>,
        delivery: Arc<dyn ReportDelivery>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            price,
            news,
            scorer,
            delivery,
            core: AnalysisCore::new(config),
            retry: RetryPolicy::default(),
            scoring_concurrency: 4,
            metrics: None,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_scoring_concurrency(mut self, concurrency: usize) -> Self {
        self.scoring_concurrency = concurrency.max(1);
        self
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Runs a full analysis and, when `destination` is set, delivers the report.
    ///
    /// A delivery failure does not fail the call: the computed report is still
    /// returned, with [`DeliveryStatus::Failed`].
    pub async fn run(
        &self,
        ticker: &str,
        timeframe: &str,
        destination: Option<&str>,
    ) -> Result<AnalysisOutcome, AdvisorError> {
        let started = Instant::now();
        let result = self.run_inner(ticker, timeframe, destination).await;

        if let Some(metrics) = &self.metrics {
            metrics.observe_duration(started.elapsed().as_secs_f64());
            match &result {
                Ok(_) => metrics.inc_analyses("ok"),
                Err(e) => metrics.inc_analyses(outcome_label(e)),
            }
        }

        if let Err(e) = &result {
            error!("AnalysisPipeline [{} {}]: analysis failed: {}", ticker, timeframe, e);
        }
        result
    }

    async fn run_inner(
        &self,
        ticker: &str,
        timeframe: &str,
        destination: Option<&str>,
    ) -> Result<AnalysisOutcome, AdvisorError> {
        let selector = TimeframeSelector::from_str(timeframe)?;
        let resolution = selector.resolve();

        info!(
            "AnalysisPipeline [{} {}]: lookback={}m granularity={} news_window={}d",
            ticker,
            selector,
            resolution.lookback.num_minutes(),
            resolution.granularity,
            resolution.news_lookback.num_days()
        );

        let (candles, articles) = tokio::join!(
            self.fetch_candles(ticker, &resolution),
            self.fetch_news(ticker, &resolution)
        );
        let candles = candles?;

        let (scores, dropped_articles) = self.score_articles(ticker, articles).await;

        let report = self.core.analyze(ticker, selector, candles, &scores)?;

        let delivery = match destination {
            Some(destination) => self.deliver(&report, destination).await,
            None => DeliveryStatus::Skipped,
        };

        Ok(AnalysisOutcome {
            report,
            delivery,
            dropped_articles,
        })
    }

    async fn fetch_candles(
        &self,
        ticker: &str,
        resolution: &TimeframeResolution,
    ) -> Result<Vec<Candle>, ProviderError> {
        let candles = self
            .retry
            .run_observed("price", || self.record_retry("price"), || {
                self.price
                    .get_candles(ticker, resolution.lookback, resolution.granularity)
            })
            .await?;

        info!(
            "AnalysisPipeline [{}]: fetched {} candles",
            ticker,
            candles.len()
        );
        Ok(candles)
    }

    /// News is optional: a provider that stays down is treated as no coverage.
    async fn fetch_news(&self, ticker: &str, resolution: &TimeframeResolution) -> Vec<NewsArticle> {
        let result = self
            .retry
            .run_observed("news", || self.record_retry("news"), || {
                self.news.get_articles(ticker, resolution.news_lookback)
            })
            .await;

        match result {
            Ok(articles) => {
                info!(
                    "AnalysisPipeline [{}]: fetched {} articles",
                    ticker,
                    articles.len()
                );
                articles
            }
            Err(e) => {
                warn!(
                    "AnalysisPipeline [{}]: news unavailable, continuing without sentiment: {}",
                    ticker, e
                );
                Vec::new()
            }
        }
    }

    /// Scores articles with bounded concurrency, dropping the ones that fail.
    async fn score_articles(
        &self,
        ticker: &str,
        articles: Vec<NewsArticle>,
    ) -> (Vec<NewsItemScore>, usize) {
        let total = articles.len();
        if total == 0 {
            return (Vec::new(), 0);
        }

        let results: Vec<Result<NewsItemScore, ProviderError>> = stream::iter(articles)
            .map(|article| async move {
                self.retry
                    .run_observed("scorer", || self.record_retry("scorer"), || {
                        self.scorer.score(ticker, &article)
                    })
                    .await
            })
            .buffer_unordered(self.scoring_concurrency)
            .collect()
            .await;

        let mut scores = Vec::with_capacity(total);
        for result in results {
            match result {
                Ok(score) => scores.push(score),
                Err(e) => warn!("AnalysisPipeline [{}]: dropping article: {}", ticker, e),
            }
        }

        let dropped = total - scores.len();
        if dropped > 0 {
            warn!(
                "AnalysisPipeline [{}]: {}/{} articles dropped after scoring failures",
                ticker, dropped, total
            );
            if let Some(metrics) = &self.metrics {
                metrics.add_dropped_articles(dropped);
            }
        }

        (scores, dropped)
    }

    async fn deliver(&self, report: &AnalysisReport, destination: &str) -> DeliveryStatus {
        let result = self
            .retry
            .run_observed("delivery", || self.record_retry("delivery"), || {
                self.delivery.deliver(report, destination)
            })
            .await;

        let status = match result {
            Ok(()) => {
                info!(
                    "AnalysisPipeline [{}]: report {} delivered to {}",
                    report.ticker, report.id, destination
                );
                DeliveryStatus::Delivered {
                    destination: destination.to_string(),
                }
            }
            Err(e) => {
                error!(
                    "AnalysisPipeline [{}]: report {} computed but not delivered: {}",
                    report.ticker, report.id, e
                );
                DeliveryStatus::Failed { error: e }
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics.inc_deliveries(if status.is_failed() { "failed" } else { "delivered" });
        }
        status
    }

    fn record_retry(&self, source: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.inc_retries(source);
        }
    }
}

fn outcome_label(err: &AdvisorError) -> &'static str {
    match err {
        AdvisorError::Analysis(AnalysisError::InvalidTimeframe { .. }) => "invalid_timeframe",
        AdvisorError::Analysis(AnalysisError::InsufficientData { .. }) => "insufficient_data",
        AdvisorError::Analysis(AnalysisError::MalformedCandle { .. }) => "malformed_candle",
        AdvisorError::Provider(ProviderError::RateLimited { .. }) => "rate_limited",
        AdvisorError::Provider(_) => "provider_error",
    }
}
