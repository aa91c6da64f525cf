//! NewsAPI `/v2/everything` news provider.

use crate::domain::errors::ProviderError;
use crate::domain::ports::NewsDataService;
use crate::domain::sentiment::NewsArticle;
use crate::infrastructure::core::http_client_factory::{build_url, check_status, transport_error};
use crate::infrastructure::news::base_asset;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

const SOURCE: &str = "newsapi";

#[derive(Debug, Deserialize)]
pub struct EverythingResponse {
    pub status: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub source: Option<RawSource>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub name: Option<String>,
}

pub struct NewsApiService {
    client: Client,
    api_key: String,
    base_url: String,
    max_articles: usize,
}

impl NewsApiService {
    pub fn new(client: Client, api_key: String, base_url: String, max_articles: usize) -> Self {
        Self {
            client,
            api_key,
            base_url,
            max_articles,
        }
    }
}

#[async_trait]
impl NewsDataService for NewsApiService {
    async fn get_articles(
        &self,
        ticker: &str,
        lookback: Duration,
    ) -> Result<Vec<NewsArticle>, ProviderError> {
        let from = (Utc::now() - lookback).format("%Y-%m-%d").to_string();
        let page_size = self.max_articles.clamp(1, 100).to_string();
        let url = build_url(
            SOURCE,
            &self.base_url,
            "/v2/everything",
            &[
                ("q", base_asset(ticker)),
                ("from", from.as_str()),
                ("sortBy", "publishedAt"),
                ("language", "en"),
                ("pageSize", page_size.as_str()),
                ("apiKey", self.api_key.as_str()),
            ],
        )?;

        debug!("NewsAPI: searching '{}' since {}", base_asset(ticker), from);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(SOURCE, e))?;
        let response = check_status(SOURCE, response).await?;
        let body: EverythingResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::unavailable(SOURCE, format!("invalid JSON: {}", e)))?;

        let articles = convert_articles(body, self.max_articles)?;
        info!("NewsAPI: {} articles for {}", articles.len(), ticker);
        Ok(articles)
    }
}

/// Validates a NewsAPI payload into articles, skipping entries without a usable title.
pub fn convert_articles(
    body: EverythingResponse,
    max_articles: usize,
) -> Result<Vec<NewsArticle>, ProviderError> {
    if body.status != "ok" {
        let code = body.code.unwrap_or_default();
        if code == "rateLimited" {
            return Err(ProviderError::RateLimited {
                source_name: SOURCE.to_string(),
                retry_after_secs: None,
            });
        }
        return Err(ProviderError::unavailable(
            SOURCE,
            format!("{}: {}", code, body.message.unwrap_or_default()),
        ));
    }

    let articles = body
        .articles
        .into_iter()
        .filter_map(|raw| {
            let title = raw.title.filter(|t| !t.trim().is_empty() && t != "[Removed]")?;
            let content = match (raw.description, raw.content) {
                (Some(d), Some(c)) => format!("{} {}", d, c),
                (Some(d), None) => d,
                (None, Some(c)) => c,
                (None, None) => String::new(),
            };
            let published_at = raw
                .published_at
                .as_deref()
                .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
                .map(|d| d.with_timezone(&Utc))
                .unwrap_or_else(Utc::now);

            Some(NewsArticle {
                id: raw
                    .url
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
                source: raw
                    .source
                    .and_then(|s| s.name)
                    .unwrap_or_else(|| "NewsAPI".to_string()),
                title,
                content,
                url: raw.url,
                published_at,
            })
        })
        .take(max_articles)
        .collect();

    Ok(articles)
}
