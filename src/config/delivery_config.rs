//! Report delivery configuration parsing from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliverySink {
    /// Write rendered reports under `output_dir`
    File,
    /// POST the report as JSON to `webhook_url`
    Webhook,
}

impl FromStr for DeliverySink {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(DeliverySink::File),
            "webhook" => Ok(DeliverySink::Webhook),
            _ => anyhow::bail!("Invalid DELIVERY_SINK: {}. Must be 'file' or 'webhook'", s),
        }
    }
}

/// Delivery environment configuration
#[derive(Debug, Clone)]
pub struct DeliveryEnvConfig {
    pub sink: DeliverySink,
    pub output_dir: PathBuf,
    pub webhook_url: Option<String>,
    /// Destination used when the CLI is not given one
    pub default_recipient: Option<String>,
}

impl DeliveryEnvConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let sink_str = env::var("DELIVERY_SINK").unwrap_or_else(|_| "file".to_string());

        Ok(Self {
            sink: DeliverySink::from_str(&sink_str)?,
            output_dir: env::var("REPORT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("reports")),
            webhook_url: env::var("REPORT_WEBHOOK_URL").ok().filter(|s| !s.is_empty()),
            default_recipient: env::var("REPORT_RECIPIENT").ok().filter(|s| !s.is_empty()),
        })
    }
}
