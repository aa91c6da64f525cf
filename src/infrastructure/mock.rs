//! In-memory collaborators for offline runs and tests.

use crate::domain::errors::ProviderError;
use crate::domain::market::{Candle, Granularity};
use crate::domain::ports::{NewsDataService, PriceDataService, ReportDelivery, SentimentScorer};
use crate::domain::report::AnalysisReport;
use crate::domain::sentiment::{NewsArticle, NewsItemScore};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::Mutex;
use tracing::info;

/// Queue of errors handed out by the next calls before the mock succeeds.
#[derive(Default)]
struct FailureScript {
    queue: Mutex<VecDeque<ProviderError>>,
}

impl FailureScript {
    async fn push(&self, error: ProviderError, times: usize) {
        let mut queue = self.queue.lock().await;
        for _ in 0..times {
            queue.push_back(error.clone());
        }
    }

    async fn next(&self) -> Option<ProviderError> {
        self.queue.lock().await.pop_front()
    }
}

enum PriceMode {
    Fixed(Vec<Candle>),
    /// Seeded random walk generated per request
    RandomWalk { start_price: f64, seed: u64 },
}

pub struct MockPriceService {
    mode: PriceMode,
    failures: FailureScript,
    calls: AtomicU32,
}

impl MockPriceService {
    /// Always returns `candles`, whatever window is asked for.
    pub fn new(candles: Vec<Candle>) -> Self {
        Self {
            mode: PriceMode::Fixed(candles),
            failures: FailureScript::default(),
            calls: AtomicU32::new(0),
        }
    }

    /// Generates a ±0.5% per-candle random walk covering the requested lookback.
    pub fn random_walk(start_price: f64, seed: u64) -> Self {
        Self {
            mode: PriceMode::RandomWalk { start_price, seed },
            failures: FailureScript::default(),
            calls: AtomicU32::new(0),
        }
    }

    /// The next `times` calls fail with `error`.
    pub async fn fail_next(&self, error: ProviderError, times: usize) {
        self.failures.push(error, times).await;
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Random-walk candles ending at `end`, oldest first.
pub fn random_walk_candles(
    start_price: f64,
    seed: u64,
    count: usize,
    granularity: Granularity,
    end: DateTime<Utc>,
) -> Vec<Candle> {
    let mut rng = StdRng::seed_from_u64(seed);
    let step = granularity.duration();
    let start = end - step * count as i32;

    let mut price = start_price;
    (0..count)
        .map(|i| {
            let open = price;
            let close = open * (1.0 + rng.random_range(-0.005..0.005));
            let high = open.max(close) * (1.0 + rng.random_range(0.0..0.002));
            let low = open.min(close) * (1.0 - rng.random_range(0.0..0.002));
            let volume = rng.random_range(10.0..100.0);
            price = close;
            Candle::new(start + step * i as i32, open, high, low, close, Some(volume))
        })
        .collect()
}

#[async_trait]
impl PriceDataService for MockPriceService {
    async fn get_candles(
        &self,
        ticker: &str,
        lookback: Duration,
        granularity: Granularity,
    ) -> Result<Vec<Candle>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failures.next().await {
            return Err(error);
        }

        match &self.mode {
            PriceMode::Fixed(candles) => Ok(candles.clone()),
            PriceMode::RandomWalk { start_price, seed } => {
                let count = (lookback.num_minutes() / granularity.to_minutes()).max(1) as usize;
                info!(
                    "MockPriceService: generating {} {} candles for {}",
                    count, granularity, ticker
                );
                Ok(random_walk_candles(
                    *start_price,
                    *seed,
                    count,
                    granularity,
                    Utc::now(),
                ))
            }
        }
    }
}

pub struct MockNewsService {
    articles: Vec<NewsArticle>,
    failures: FailureScript,
    calls: AtomicU32,
}

impl MockNewsService {
    pub fn new(articles: Vec<NewsArticle>) -> Self {
        Self {
            articles,
            failures: FailureScript::default(),
            calls: AtomicU32::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub async fn fail_next(&self, error: ProviderError, times: usize) {
        self.failures.push(error, times).await;
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsDataService for MockNewsService {
    async fn get_articles(
        &self,
        _ticker: &str,
        _lookback: Duration,
    ) -> Result<Vec<NewsArticle>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failures.next().await {
            return Err(error);
        }
        Ok(self.articles.clone())
    }
}

/// Scores articles from a lookup table keyed by article id.
pub struct MockScorer {
    scores: HashMap<String, (f64, f64)>,
    default_score: (f64, f64),
    failing_ids: HashSet<String>,
    fail_all: bool,
    calls: AtomicU32,
}

impl MockScorer {
    /// Every article gets `(polarity, relevance)` unless overridden.
    pub fn new(polarity: f64, relevance: f64) -> Self {
        Self {
            scores: HashMap::new(),
            default_score: (polarity, relevance),
            failing_ids: HashSet::new(),
            fail_all: false,
            calls: AtomicU32::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::new(0.0, 0.0)
        }
    }

    pub fn with_score(mut self, article_id: &str, polarity: f64, relevance: f64) -> Self {
        self.scores
            .insert(article_id.to_string(), (polarity, relevance));
        self
    }

    pub fn with_failure(mut self, article_id: &str) -> Self {
        self.failing_ids.insert(article_id.to_string());
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentimentScorer for MockScorer {
    async fn score(
        &self,
        _ticker: &str,
        article: &NewsArticle,
    ) -> Result<NewsItemScore, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all || self.failing_ids.contains(&article.id) {
            return Err(ProviderError::ScoringUnavailable {
                article_id: article.id.clone(),
                reason: "mock scorer failure".to_string(),
            });
        }

        let (polarity, relevance) = self
            .scores
            .get(&article.id)
            .copied()
            .unwrap_or(self.default_score);
        NewsItemScore::new(article.id.clone(), polarity, relevance).map_err(|e| {
            ProviderError::ScoringUnavailable {
                article_id: article.id.clone(),
                reason: e.to_string(),
            }
        })
    }
}

/// Records delivered reports instead of sending them anywhere.
#[derive(Default)]
pub struct MockDelivery {
    delivered: Mutex<Vec<(AnalysisReport, String)>>,
    failures: FailureScript,
    always_fail: bool,
    calls: AtomicU32,
}

impl MockDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            always_fail: true,
            ..Self::default()
        }
    }

    pub async fn fail_next(&self, destination: &str, times: usize) {
        let error = ProviderError::DeliveryFailed {
            destination: destination.to_string(),
            reason: "mock delivery failure".to_string(),
        };
        self.failures.push(error, times).await;
    }

    pub async fn delivered(&self) -> Vec<(AnalysisReport, String)> {
        self.delivered.lock().await.clone()
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportDelivery for MockDelivery {
    async fn deliver(
        &self,
        report: &AnalysisReport,
        destination: &str,
    ) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.always_fail {
            return Err(ProviderError::DeliveryFailed {
                destination: destination.to_string(),
                reason: "mock delivery failure".to_string(),
            });
        }
        if let Some(error) = self.failures.next().await {
            return Err(error);
        }
        self.delivered
            .lock()
            .await
            .push((report.clone(), destination.to_string()));
        Ok(())
    }
}
