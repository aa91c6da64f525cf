use crate::domain::errors::ProviderError;
use crate::domain::ports::ReportDelivery;
use crate::domain::report::AnalysisReport;
use crate::infrastructure::delivery::render::{render_html, render_text};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub destination: &'a str,
    pub subject: String,
    pub text: String,
    pub html: String,
    pub report: &'a AnalysisReport,
}

impl<'a> WebhookPayload<'a> {
    pub fn new(report: &'a AnalysisReport, destination: &'a str) -> Self {
        Self {
            destination,
            subject: report.subject(),
            text: render_text(report),
            html: render_html(report),
            report,
        }
    }
}

/// POSTs each report as JSON to a relay (mail gateway, chat bot, ...).
pub struct WebhookReportDelivery {
    client: Client,
    url: String,
}

impl WebhookReportDelivery {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl ReportDelivery for WebhookReportDelivery {
    async fn deliver(
        &self,
        report: &AnalysisReport,
        destination: &str,
    ) -> Result<(), ProviderError> {
        let failed = |reason: String| ProviderError::DeliveryFailed {
            destination: destination.to_string(),
            reason,
        };

        debug!("Webhook: posting report {} to {}", report.id, self.url);
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload::new(report, destination))
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(failed(format!("HTTP {}: {}", status, body.trim())));
        }

        info!("Webhook accepted report {} for {}", report.id, destination);
        Ok(())
    }
}
