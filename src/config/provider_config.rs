//! External provider configuration parsing from environment variables.
//!
//! Covers the price feed, the news source, sentiment scoring concurrency and
//! the shared timeout/retry policy.

use super::{parse_f64, parse_u32, parse_u64, parse_usize};
use crate::application::retry::RetryPolicy;
use anyhow::Result;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Where candles come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    TwelveData,
    /// Seeded random walk, for offline runs
    Mock,
}

impl FromStr for PriceSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "twelvedata" => Ok(PriceSource::TwelveData),
            "mock" => Ok(PriceSource::Mock),
            _ => anyhow::bail!("Invalid PRICE_SOURCE: {}. Must be 'twelvedata' or 'mock'", s),
        }
    }
}

/// Where news articles come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsSource {
    NewsApi,
    Rss,
    /// No news; sentiment is always neutral
    Disabled,
}

impl FromStr for NewsSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newsapi" => Ok(NewsSource::NewsApi),
            "rss" => Ok(NewsSource::Rss),
            "none" | "disabled" => Ok(NewsSource::Disabled),
            _ => anyhow::bail!(
                "Invalid NEWS_SOURCE: {}. Must be 'newsapi', 'rss', or 'none'",
                s
            ),
        }
    }
}

/// Provider environment configuration
#[derive(Debug, Clone)]
pub struct ProviderEnvConfig {
    // Price feed
    pub price_source: PriceSource,
    pub twelvedata_api_key: String,
    pub twelvedata_base_url: String,

    // News
    pub news_source: NewsSource,
    pub newsapi_key: String,
    pub newsapi_base_url: String,
    pub rss_feeds: Vec<String>,
    pub max_articles: usize,

    // Scoring
    pub scoring_concurrency: usize,
    /// Weight of the headline versus the body when scoring an article
    pub title_weight: f64,

    // Timeouts and retries
    pub request_timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

impl ProviderEnvConfig {
    pub fn from_env() -> Result<Self> {
        let price_source_str =
            env::var("PRICE_SOURCE").unwrap_or_else(|_| "twelvedata".to_string());
        let price_source = PriceSource::from_str(&price_source_str)?;

        let news_source_str = env::var("NEWS_SOURCE").unwrap_or_else(|_| "newsapi".to_string());
        let news_source = NewsSource::from_str(&news_source_str)?;

        let rss_feeds = env::var("RSS_FEEDS")
            .unwrap_or_else(|_| {
                "https://www.coindesk.com/arc/outboundfeeds/rss/,https://cointelegraph.com/rss"
                    .to_string()
            })
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            price_source,
            twelvedata_api_key: env::var("TWELVEDATA_API_KEY").unwrap_or_default(),
            twelvedata_base_url: env::var("TWELVEDATA_BASE_URL")
                .unwrap_or_else(|_| "https://api.twelvedata.com".to_string()),
            news_source,
            newsapi_key: env::var("NEWSAPI_KEY").unwrap_or_default(),
            newsapi_base_url: env::var("NEWSAPI_BASE_URL")
                .unwrap_or_else(|_| "https://newsapi.org".to_string()),
            rss_feeds,
            max_articles: parse_usize("MAX_ARTICLES", 25)?,
            scoring_concurrency: parse_usize("SCORING_CONCURRENCY", 4)?,
            title_weight: parse_f64("SCORING_TITLE_WEIGHT", 0.7)?,
            request_timeout_secs: parse_u64("REQUEST_TIMEOUT_SECS", 15)?,
            max_attempts: parse_u32("RETRY_MAX_ATTEMPTS", 3)?,
            retry_base_delay_ms: parse_u64("RETRY_BASE_DELAY_MS", 500)?,
            retry_max_delay_ms: parse_u64("RETRY_MAX_DELAY_MS", 8000)?,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            timeout: self.request_timeout(),
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
            ..RetryPolicy::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_source_parsing() {
        assert_eq!(NewsSource::from_str("NewsAPI").unwrap(), NewsSource::NewsApi);
        assert_eq!(NewsSource::from_str("rss").unwrap(), NewsSource::Rss);
        assert_eq!(NewsSource::from_str("none").unwrap(), NewsSource::Disabled);
        assert!(NewsSource::from_str("twitter").is_err());
    }

    #[test]
    fn test_price_source_parsing() {
        assert_eq!(PriceSource::from_str("TwelveData").unwrap(), PriceSource::TwelveData);
        assert_eq!(PriceSource::from_str("mock").unwrap(), PriceSource::Mock);
        assert!(PriceSource::from_str("binance").is_err());
    }
}
