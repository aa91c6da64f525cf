//! TwelveData `time_series` price provider.

use crate::domain::errors::ProviderError;
use crate::domain::market::{Candle, Granularity};
use crate::domain::ports::PriceDataService;
use crate::infrastructure::core::http_client_factory::{build_url, check_status, transport_error};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

const SOURCE: &str = "twelvedata";

#[derive(Debug, Deserialize)]
pub struct TimeSeriesResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub values: Vec<TimeSeriesValue>,
}

#[derive(Debug, Deserialize)]
pub struct TimeSeriesValue {
    pub datetime: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    #[serde(default)]
    pub volume: Option<String>,
}

pub struct TwelveDataPriceService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TwelveDataPriceService {
    pub fn new(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl PriceDataService for TwelveDataPriceService {
    async fn get_candles(
        &self,
        ticker: &str,
        lookback: Duration,
        granularity: Granularity,
    ) -> Result<Vec<Candle>, ProviderError> {
        let outputsize = (lookback.num_minutes() / granularity.to_minutes()).max(1);
        let url = build_url(
            SOURCE,
            &self.base_url,
            "/time_series",
            &[
                ("symbol", ticker.to_string()),
                ("interval", granularity.to_twelvedata_string().to_string()),
                ("outputsize", outputsize.to_string()),
                ("timezone", "UTC".to_string()),
                ("apikey", self.api_key.clone()),
            ],
        )?;

        debug!(
            "TwelveData: requesting {} {} x{}",
            ticker, granularity, outputsize
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(SOURCE, e))?;
        let response = check_status(SOURCE, response).await?;
        let body: TimeSeriesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::unavailable(SOURCE, format!("invalid JSON: {}", e)))?;

        let candles = parse_time_series(body)?;
        info!("TwelveData: {} candles for {}", candles.len(), ticker);
        Ok(candles)
    }
}

/// Converts a TwelveData payload into candles, oldest first.
///
/// Prices or volumes that fail to parse become NaN so that series validation
/// reports the exact row. Rows without a volume field stay volume-less.
pub fn parse_time_series(body: TimeSeriesResponse) -> Result<Vec<Candle>, ProviderError> {
    if body.status != "ok" {
        let message = body.message.unwrap_or_else(|| "unknown error".to_string());
        return Err(match body.code {
            Some(429) => ProviderError::RateLimited {
                source_name: SOURCE.to_string(),
                retry_after_secs: None,
            },
            _ => ProviderError::unavailable(
                SOURCE,
                format!("status '{}': {}", body.status, message),
            ),
        });
    }

    let mut candles = Vec::with_capacity(body.values.len());
    for value in &body.values {
        let timestamp = parse_datetime(&value.datetime).ok_or_else(|| {
            ProviderError::unavailable(SOURCE, format!("unparseable datetime '{}'", value.datetime))
        })?;
        candles.push(Candle::new(
            timestamp,
            parse_number(&value.open),
            parse_number(&value.high),
            parse_number(&value.low),
            parse_number(&value.close),
            value.volume.as_deref().map(parse_number),
        ));
    }

    candles.sort_by_key(|c| c.timestamp);
    Ok(candles)
}

fn parse_number(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::AnalysisError;
    use crate::domain::market::PriceSeries;

    fn response(json: &str) -> TimeSeriesResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_sorts_oldest_first() {
        let body = response(
            r#"{
                "meta": {"symbol": "BTC/USD", "interval": "1min"},
                "status": "ok",
                "values": [
                    {"datetime": "2024-01-01 00:02:00", "open": "3", "high": "3.5", "low": "2.5", "close": "3"},
                    {"datetime": "2024-01-01 00:01:00", "open": "2", "high": "2.5", "low": "1.5", "close": "2"},
                    {"datetime": "2024-01-01 00:00:00", "open": "1", "high": "1.5", "low": "0.5", "close": "1"}
                ]
            }"#,
        );
        let candles = parse_time_series(body).unwrap();
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
        assert!(candles.iter().all(|c| c.volume.is_none()));
    }

    #[test]
    fn test_daily_dates_and_volume() {
        let body = response(
            r#"{
                "status": "ok",
                "values": [
                    {"datetime": "2024-01-02", "open": "1", "high": "2", "low": "1", "close": "2", "volume": "10"},
                    {"datetime": "2024-01-01", "open": "1", "high": "2", "low": "1", "close": "1", "volume": "12"}
                ]
            }"#,
        );
        let candles = parse_time_series(body).unwrap();
        assert_eq!(candles[0].volume, Some(12.0));
        assert_eq!(candles[1].volume, Some(10.0));
    }

    #[test]
    fn test_zero_volume_row_is_kept_and_rejected_by_series() {
        let body = response(
            r#"{
                "status": "ok",
                "values": [
                    {"datetime": "2024-01-03", "open": "1", "high": "2", "low": "1", "close": "2", "volume": "100"},
                    {"datetime": "2024-01-02", "open": "1", "high": "2", "low": "1", "close": "2", "volume": "0"},
                    {"datetime": "2024-01-01", "open": "1", "high": "2", "low": "1", "close": "1", "volume": "100"}
                ]
            }"#,
        );
        let candles = parse_time_series(body).unwrap();
        let volumes: Vec<Option<f64>> = candles.iter().map(|c| c.volume).collect();
        assert_eq!(volumes, vec![Some(100.0), Some(0.0), Some(100.0)]);

        let err = PriceSeries::new("BTC/USD", Granularity::OneDay, candles).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedCandle { index: 1, .. }));
    }

    #[test]
    fn test_unparseable_volume_becomes_nan() {
        let body = response(
            r#"{"status": "ok", "values": [
                {"datetime": "2024-01-01 00:00:00", "open": "1", "high": "2", "low": "1", "close": "1", "volume": "n/a"}
            ]}"#,
        );
        let candles = parse_time_series(body).unwrap();
        assert!(candles[0].volume.is_some_and(f64::is_nan));
    }

    #[test]
    fn test_unparseable_price_becomes_nan() {
        let body = response(
            r#"{"status": "ok", "values": [
                {"datetime": "2024-01-01 00:00:00", "open": "x", "high": "2", "low": "1", "close": "1"}
            ]}"#,
        );
        let candles = parse_time_series(body).unwrap();
        assert!(candles[0].open.is_nan());
    }

    #[test]
    fn test_error_payloads() {
        let err = parse_time_series(response(
            r#"{"status": "error", "code": 429, "message": "You have run out of API credits"}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited { .. }));

        let err = parse_time_series(response(
            r#"{"status": "error", "code": 400, "message": "symbol not found"}"#,
        ))
        .unwrap_err();
        match err {
            ProviderError::DataUnavailable { reason, .. } => assert!(reason.contains("symbol not found")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
