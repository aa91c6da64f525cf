use crate::config::{Config, DeliverySink, NewsSource, PriceSource};
use std::env;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::time::Duration;

// Global lock to prevent race conditions when modifying environment variables in tests
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

fn set(key: &str, value: &str) {
    // SAFETY: every test touching the environment holds ENV_LOCK
    unsafe { env::set_var(key, value) };
}

fn unset(key: &str) {
    // SAFETY: every test touching the environment holds ENV_LOCK
    unsafe { env::remove_var(key) };
}

#[test]
fn test_config_defaults() {
    let _guard = get_env_lock().lock().unwrap();
    for key in [
        "TECHNICAL_WEIGHT",
        "SENTIMENT_WEIGHT",
        "PRICE_SOURCE",
        "NEWS_SOURCE",
        "DELIVERY_SINK",
    ] {
        unset(key);
    }

    let config = Config::from_env().unwrap();

    assert_eq!(config.analysis.fusion.technical_weight, 0.7);
    assert_eq!(config.analysis.fusion.action_threshold, 0.15);
    assert_eq!(config.analysis.indicators.min_candles, 30);
    assert_eq!(config.provider.price_source, PriceSource::TwelveData);
    assert_eq!(config.provider.news_source, NewsSource::NewsApi);
    assert_eq!(config.delivery.sink, DeliverySink::File);
    assert!(config.observability.metrics_enabled);
}

#[test]
fn test_fusion_weights_override() {
    let _guard = get_env_lock().lock().unwrap();
    set("TECHNICAL_WEIGHT", "0.6");
    set("SENTIMENT_WEIGHT", "0.4");
    set("ACTION_THRESHOLD", "0.2");

    let config = Config::from_env().unwrap();

    assert!((config.analysis.fusion.technical_weight - 0.6).abs() < 1e-9);
    assert!((config.analysis.fusion.sentiment_weight - 0.4).abs() < 1e-9);
    assert!((config.analysis.fusion.action_threshold - 0.2).abs() < 1e-9);

    // Cleanup
    unset("TECHNICAL_WEIGHT");
    unset("SENTIMENT_WEIGHT");
    unset("ACTION_THRESHOLD");
}

#[test]
fn test_sentiment_dominant_weights_rejected() {
    let _guard = get_env_lock().lock().unwrap();
    set("TECHNICAL_WEIGHT", "0.3");
    set("SENTIMENT_WEIGHT", "0.7");

    let result = Config::from_env();
    assert!(result.is_err());
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("Invalid analysis configuration"));

    unset("TECHNICAL_WEIGHT");
    unset("SENTIMENT_WEIGHT");
}

#[test]
fn test_unparseable_number_fails() {
    let _guard = get_env_lock().lock().unwrap();
    set("MIN_CANDLES", "thirty");

    let result = Config::from_env();
    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("MIN_CANDLES"));

    unset("MIN_CANDLES");
}

#[test]
fn test_retry_policy_from_env() {
    let _guard = get_env_lock().lock().unwrap();
    set("RETRY_MAX_ATTEMPTS", "5");
    set("REQUEST_TIMEOUT_SECS", "3");
    set("NEWS_SOURCE", "rss");
    set("RSS_FEEDS", "https://a.example/rss, ,https://b.example/feed");

    let config = Config::from_env().unwrap();
    let policy = config.provider.retry_policy();

    assert_eq!(policy.max_attempts, 5);
    assert_eq!(policy.timeout, Duration::from_secs(3));
    assert_eq!(config.provider.news_source, NewsSource::Rss);
    assert_eq!(
        config.provider.rss_feeds,
        vec!["https://a.example/rss", "https://b.example/feed"]
    );

    unset("RETRY_MAX_ATTEMPTS");
    unset("REQUEST_TIMEOUT_SECS");
    unset("NEWS_SOURCE");
    unset("RSS_FEEDS");
}

#[test]
fn test_webhook_sink() {
    let _guard = get_env_lock().lock().unwrap();
    set("DELIVERY_SINK", "webhook");
    set("REPORT_WEBHOOK_URL", "https://hooks.example/advisor");

    let config = Config::from_env().unwrap();
    assert_eq!(config.delivery.sink, DeliverySink::Webhook);
    assert_eq!(
        config.delivery.webhook_url.as_deref(),
        Some("https://hooks.example/advisor")
    );

    unset("DELIVERY_SINK");
    unset("REPORT_WEBHOOK_URL");
}
