use crate::domain::errors::ProviderError;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use url::Url;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a pooled HTTP client.
    ///
    /// Retries are not configured here; callers go through `RetryPolicy` so
    /// that failures can be classified before deciding to retry.
    pub fn create_client(timeout: Duration) -> Client {
        Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("crypto-advisor/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}

/// Joins `path` onto `base_url` and appends the encoded query parameters.
pub fn build_url<K, V>(
    source: &str,
    base_url: &str,
    path: &str,
    params: &[(K, V)],
) -> Result<Url, ProviderError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let joined = format!("{}{}", base_url.trim_end_matches('/'), path);
    Url::parse_with_params(
        &joined,
        params.iter().map(|(k, v)| (k.as_ref(), v.as_ref())),
    )
    .map_err(|e| ProviderError::unavailable(source, format!("invalid URL '{}': {}", joined, e)))
}

/// Maps a non-success response to the provider error taxonomy.
///
/// 429 becomes `RateLimited` (honouring `Retry-After` when it is given in
/// seconds); anything else that is not 2xx becomes `DataUnavailable`.
pub async fn check_status(source: &str, response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited {
            source_name: source.to_string(),
            retry_after_secs: parse_retry_after(response.headers()),
        });
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::unavailable(
        source,
        format!("HTTP {}: {}", status, truncate(&body, 200)),
    ))
}

pub fn transport_error(source: &str, err: reqwest::Error) -> ProviderError {
    let reason = if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    };
    ProviderError::unavailable(source, reason)
}

pub fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_build_url_encodes_params() {
        let url = build_url(
            "twelvedata",
            "https://api.twelvedata.com/",
            "/time_series",
            &[("symbol", "BTC/USD"), ("interval", "1min")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.twelvedata.com/time_series?symbol=BTC%2FUSD&interval=1min"
        );
    }

    #[test]
    fn test_build_url_rejects_garbage() {
        let params: [(&str, &str); 0] = [];
        let err = build_url("newsapi", "not a url", "/v2/everything", &params).unwrap_err();
        assert!(matches!(err, ProviderError::DataUnavailable { .. }));
    }

    #[test]
    fn test_retry_after_seconds() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("12"));
        assert_eq!(parse_retry_after(&headers), Some(12));

        // HTTP-date form is not interpreted
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
