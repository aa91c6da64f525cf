use crate::domain::errors::ProviderError;
use crate::domain::ports::NewsDataService;
use crate::domain::sentiment::NewsArticle;
use crate::infrastructure::core::http_client_factory::{check_status, transport_error};
use crate::infrastructure::news::{mentions_any, ticker_keywords};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use reqwest::Client;
use rss::Channel;
use std::collections::HashSet;
use std::io::Cursor;
use tracing::{debug, info, warn};
use uuid::Uuid;

const SOURCE: &str = "rss";

/// Pulls articles from a fixed set of RSS feeds and keeps those that mention
/// the ticker within the lookback window.
pub struct RssNewsService {
    feeds: Vec<String>,
    client: Client,
    max_articles: usize,
}

impl RssNewsService {
    pub fn new(feeds: Vec<String>, client: Client, max_articles: usize) -> Self {
        Self {
            feeds,
            client,
            max_articles,
        }
    }

    async fn fetch_feed(&self, url: &str) -> Result<Channel, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(SOURCE, e))?;
        let response = check_status(SOURCE, response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(SOURCE, e))?;
        Channel::read_from(Cursor::new(bytes))
            .map_err(|e| ProviderError::unavailable(SOURCE, format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl NewsDataService for RssNewsService {
    async fn get_articles(
        &self,
        ticker: &str,
        lookback: Duration,
    ) -> Result<Vec<NewsArticle>, ProviderError> {
        if self.feeds.is_empty() {
            return Ok(Vec::new());
        }

        let results = join_all(self.feeds.iter().map(|url| self.fetch_feed(url))).await;

        let mut channels = Vec::new();
        let mut last_error = None;
        for (url, result) in self.feeds.iter().zip(results) {
            match result {
                Ok(channel) => channels.push(channel),
                Err(e) => {
                    warn!("RSS feed {} failed: {}", url, e);
                    last_error = Some(e);
                }
            }
        }

        if channels.is_empty() {
            return Err(last_error
                .unwrap_or_else(|| ProviderError::unavailable(SOURCE, "no feeds reachable")));
        }

        let since = Utc::now() - lookback;
        let articles = collect_articles(&channels, ticker, since, self.max_articles);
        info!(
            "RSS: {} articles for {} from {}/{} feeds",
            articles.len(),
            ticker,
            channels.len(),
            self.feeds.len()
        );
        Ok(articles)
    }
}

/// Flattens channels into ticker-relevant articles published at or after `since`,
/// newest first, without duplicates.
pub fn collect_articles(
    channels: &[Channel],
    ticker: &str,
    since: DateTime<Utc>,
    max_articles: usize,
) -> Vec<NewsArticle> {
    let keywords = ticker_keywords(ticker);
    let mut seen = HashSet::new();
    let mut articles = Vec::new();

    for channel in channels {
        for item in channel.items() {
            let Some(title) = item.title().filter(|t| !t.trim().is_empty()) else {
                continue;
            };
            let content = item.description().unwrap_or("");
            if !mentions_any(title, &keywords) && !mentions_any(content, &keywords) {
                continue;
            }

            // RSS dates are RFC-2822; undated items are treated as fresh
            let published_at = item
                .pub_date()
                .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                .map(|d| d.with_timezone(&Utc))
                .unwrap_or_else(Utc::now);
            if published_at < since {
                continue;
            }

            let id = item
                .guid()
                .map(|g| g.value().to_string())
                .or_else(|| item.link().map(|l| l.to_string()))
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            if !seen.insert(id.clone()) {
                continue;
            }

            articles.push(NewsArticle {
                id,
                source: channel.title().to_string(),
                title: title.to_string(),
                content: content.to_string(),
                url: item.link().map(|l| l.to_string()),
                published_at,
            });
        }
    }

    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    articles.truncate(max_articles);
    debug!("RSS: kept {} matching items", articles.len());
    articles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(xml: &str) -> Channel {
        Channel::read_from(Cursor::new(xml.as_bytes())).unwrap()
    }

    fn rfc2822(at: DateTime<Utc>) -> String {
        at.to_rfc2822()
    }

    #[test]
    fn test_collect_filters_by_ticker_and_window() {
        let now = Utc::now();
        let xml = format!(
            r#"<?xml version="1.0"?>
            <rss version="2.0"><channel>
                <title>CoinDesk</title><link>https://coindesk.com</link><description>news</description>
                <item><title>Bitcoin tops $70k</title><guid>a</guid><pubDate>{}</pubDate></item>
                <item><title>Solana outage</title><guid>b</guid><pubDate>{}</pubDate></item>
                <item><title>Old BTC story</title><guid>c</guid><pubDate>{}</pubDate></item>
                <item><title>Markets</title><description>BTC dominance rises</description><guid>d</guid><pubDate>{}</pubDate></item>
            </channel></rss>"#,
            rfc2822(now - Duration::minutes(10)),
            rfc2822(now - Duration::minutes(5)),
            rfc2822(now - Duration::days(3)),
            rfc2822(now - Duration::minutes(1)),
        );

        let articles = collect_articles(
            &[channel(&xml)],
            "BTC/USD",
            now - Duration::hours(24),
            10,
        );
        let ids: Vec<&str> = articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "a"]);
        assert_eq!(articles[0].source, "CoinDesk");
    }

    #[test]
    fn test_collect_dedups_across_feeds_and_caps() {
        let now = Utc::now();
        let xml = format!(
            r#"<?xml version="1.0"?>
            <rss version="2.0"><channel>
                <title>Feed</title><link>https://x</link><description>d</description>
                <item><title>ETH one</title><guid>1</guid><pubDate>{0}</pubDate></item>
                <item><title>ETH two</title><guid>2</guid><pubDate>{0}</pubDate></item>
                <item><title>ETH three</title><guid>3</guid><pubDate>{0}</pubDate></item>
            </channel></rss>"#,
            rfc2822(now - Duration::minutes(2)),
        );
        let feed = channel(&xml);

        let articles = collect_articles(
            &[feed.clone(), feed],
            "ETH/USD",
            now - Duration::hours(1),
            10,
        );
        assert_eq!(articles.len(), 3);

        let capped = collect_articles(&[channel(&xml)], "ETH/USD", now - Duration::hours(1), 2);
        assert_eq!(capped.len(), 2);
    }
}
