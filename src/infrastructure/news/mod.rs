pub mod newsapi;
pub mod rss;
pub mod sentiment_analyzer;

pub use newsapi::NewsApiService;
pub use rss::RssNewsService;
pub use sentiment_analyzer::{SentimentAnalyzer, VaderSentimentScorer};

/// Base asset of a pair, e.g. `BTC` for `BTC/USD`.
pub fn base_asset(ticker: &str) -> &str {
    ticker.split('/').next().unwrap_or(ticker).trim()
}

/// Lowercase terms an article about `ticker` is expected to mention.
pub fn ticker_keywords(ticker: &str) -> Vec<String> {
    let base = base_asset(ticker).to_lowercase();
    let mut keywords = vec![base.clone()];

    let alias = match base.as_str() {
        "btc" => Some("bitcoin"),
        "eth" => Some("ethereum"),
        "sol" => Some("solana"),
        "xrp" => Some("ripple"),
        "ada" => Some("cardano"),
        "doge" => Some("dogecoin"),
        "dot" => Some("polkadot"),
        "ltc" => Some("litecoin"),
        "avax" => Some("avalanche"),
        "link" => Some("chainlink"),
        "bnb" => Some("binance coin"),
        _ => None,
    };
    if let Some(alias) = alias {
        keywords.push(alias.to_string());
    }
    keywords
}

/// True when `text` mentions any keyword as a whole word.
pub fn mentions_any(text: &str, keywords: &[String]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|keyword| {
        lower.match_indices(keyword.as_str()).any(|(start, matched)| {
            let before = lower[..start].chars().next_back();
            let after = lower[start + matched.len()..].chars().next();
            !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
        })
    })
}
