use crate::application::pipeline::AnalysisPipeline;
use crate::config::{Config, DeliverySink, NewsSource, PriceSource};
use crate::domain::ports::{NewsDataService, PriceDataService, ReportDelivery, SentimentScorer};
use crate::infrastructure::core::HttpClientFactory;
use crate::infrastructure::delivery::{FileReportDelivery, WebhookReportDelivery};
use crate::infrastructure::mock::{MockNewsService, MockPriceService};
use crate::infrastructure::news::{NewsApiService, RssNewsService, VaderSentimentScorer};
use crate::infrastructure::observability::Metrics;
use crate::infrastructure::twelvedata::TwelveDataPriceService;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

pub struct ServiceFactory;

impl ServiceFactory {
    pub fn create_price_service(config: &Config) -> Result<Arc<dyn PriceDataService>> {
        let provider = &config.provider;
        match provider.price_source {
            PriceSource::TwelveData => {
                if provider.twelvedata_api_key.is_empty() {
                    anyhow::bail!("TWELVEDATA_API_KEY must be set when PRICE_SOURCE=twelvedata");
                }
                Ok(Arc::new(TwelveDataPriceService::new(
                    HttpClientFactory::create_client(provider.request_timeout()),
                    provider.twelvedata_api_key.clone(),
                    provider.twelvedata_base_url.clone(),
                )))
            }
            PriceSource::Mock => {
                warn!("Using simulated prices (PRICE_SOURCE=mock)");
                Ok(Arc::new(MockPriceService::random_walk(100.0, 42)))
            }
        }
    }

    pub fn create_news_service(config: &Config) -> Arc<dyn NewsDataService> {
        let provider = &config.provider;
        match provider.news_source {
            NewsSource::NewsApi if provider.newsapi_key.is_empty() => {
                warn!("NEWSAPI_KEY not set: running without news, sentiment will be neutral");
                Arc::new(MockNewsService::empty())
            }
            NewsSource::NewsApi => Arc::new(NewsApiService::new(
                HttpClientFactory::create_client(provider.request_timeout()),
                provider.newsapi_key.clone(),
                provider.newsapi_base_url.clone(),
                provider.max_articles,
            )),
            NewsSource::Rss => Arc::new(RssNewsService::new(
                provider.rss_feeds.clone(),
                HttpClientFactory::create_client(provider.request_timeout()),
                provider.max_articles,
            )),
            NewsSource::Disabled => Arc::new(MockNewsService::empty()),
        }
    }

    pub fn create_scorer(config: &Config) -> Arc<dyn SentimentScorer> {
        Arc::new(VaderSentimentScorer::new(config.provider.title_weight))
    }

    pub fn create_delivery(config: &Config) -> Result<Arc<dyn ReportDelivery>> {
        let delivery = &config.delivery;
        match delivery.sink {
            DeliverySink::File => Ok(Arc::new(FileReportDelivery::new(
                delivery.output_dir.clone(),
            ))),
            DeliverySink::Webhook => {
                let url = delivery
                    .webhook_url
                    .clone()
                    .context("REPORT_WEBHOOK_URL must be set when DELIVERY_SINK=webhook")?;
                Ok(Arc::new(WebhookReportDelivery::new(
                    HttpClientFactory::create_client(config.provider.request_timeout()),
                    url,
                )))
            }
        }
    }

    /// Wires every collaborator named by `config` into a ready pipeline.
    pub fn create_pipeline(config: &Config, metrics: Option<Metrics>) -> Result<AnalysisPipeline> {
        let pipeline = AnalysisPipeline::new(
            Self::create_price_service(config)?,
            Self::create_news_service(config),
            Self::create_scorer(config),
            Self::create_delivery(config)?,
            config.analysis.clone(),
        )
        .with_retry_policy(config.provider.retry_policy())
        .with_scoring_concurrency(config.provider.scoring_concurrency);

        info!(
            "Pipeline ready: prices={:?} news={:?} delivery={:?}",
            config.provider.price_source, config.provider.news_source, config.delivery.sink
        );

        Ok(match metrics {
            Some(metrics) => pipeline.with_metrics(metrics),
            None => pipeline,
        })
    }
}
