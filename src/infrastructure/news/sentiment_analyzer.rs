//! Local NLP-based sentiment analysis using VADER
//!
//! VADER (Valence Aware Dictionary and sEntiment Reasoner) compound scores are
//! combined with a small financial lexicon so that crypto jargon like "pump"
//! or "rug pull" moves the needle.
//!
//! # Example
//! ```rust,ignore
//! use crypto_advisor::infrastructure::news::sentiment_analyzer::SentimentAnalyzer;
//!
//! let analyzer = SentimentAnalyzer::new();
//! let score = analyzer.analyze("Bitcoin surges to new all-time high!");
//! assert!(score > 0.3);
//! ```

use crate::domain::errors::ProviderError;
use crate::domain::ports::SentimentScorer;
use crate::domain::sentiment::{NewsArticle, NewsItemScore};
use crate::infrastructure::news::{mentions_any, ticker_keywords};
use async_trait::async_trait;
use tracing::debug;
use vader_sentiment::SentimentIntensityAnalyzer;

const BULLISH_KEYWORDS: &[(&str, f64)] = &[
    ("surge", 0.4),
    ("surges", 0.4),
    ("rally", 0.4),
    ("rallies", 0.4),
    ("soar", 0.5),
    ("soars", 0.5),
    ("skyrocket", 0.6),
    ("skyrockets", 0.6),
    ("bullish", 0.5),
    ("bull run", 0.5),
    ("all-time high", 0.5),
    ("breakout", 0.3),
    ("mooning", 0.5),
    ("adoption", 0.2),
    ("etf approval", 0.4),
    ("inflows", 0.3),
    ("accumulation", 0.2),
    ("upgrade", 0.3),
    ("record high", 0.4),
];

const BEARISH_KEYWORDS: &[(&str, f64)] = &[
    ("crash", -0.5),
    ("crashes", -0.5),
    ("plunge", -0.5),
    ("plunges", -0.5),
    ("dump", -0.4),
    ("dumps", -0.4),
    ("bearish", -0.5),
    ("collapse", -0.5),
    ("lawsuit", -0.4),
    ("ban", -0.4),
    ("hack", -0.5),
    ("hacked", -0.5),
    ("exploit", -0.5),
    ("rug pull", -0.6),
    ("stolen", -0.5),
    ("scam", -0.6),
    ("fraud", -0.5),
    ("liquidations", -0.3),
    ("outflows", -0.3),
    ("sell-off", -0.4),
    ("selloff", -0.4),
    ("panic", -0.4),
    ("delisting", -0.4),
];

/// VADER compound score with financial keyword boosting.
pub struct SentimentAnalyzer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    fn financial_boost(&self, text: &str) -> f64 {
        let text_lower = text.to_lowercase();
        BULLISH_KEYWORDS
            .iter()
            .chain(BEARISH_KEYWORDS)
            .filter(|(keyword, _)| text_lower.contains(keyword))
            .map(|(_, score)| score)
            .sum()
    }

    /// Sentiment of `text` in [-1, 1]. Blank text scores 0.
    pub fn analyze(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let scores = self.analyzer.polarity_scores(text);
        let vader_score = scores["compound"];
        let combined = vader_score + self.financial_boost(text) * 0.5;
        combined.clamp(-1.0, 1.0)
    }

    /// Weighted blend of title and body sentiment. A blank body gives the title full weight.
    pub fn analyze_news(&self, title: &str, content: &str, title_weight: f64) -> f64 {
        let title_score = self.analyze(title);
        if content.trim().is_empty() {
            return title_score;
        }
        let content_score = self.analyze(content);
        (title_score * title_weight + content_score * (1.0 - title_weight)).clamp(-1.0, 1.0)
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Relevance of an article that names the ticker in its headline.
const TITLE_MENTION_RELEVANCE: f64 = 1.0;
/// Relevance of an article that names the ticker only in its body.
const BODY_MENTION_RELEVANCE: f64 = 0.6;
/// General market news that never names the ticker.
const NO_MENTION_RELEVANCE: f64 = 0.3;

/// `SentimentScorer` backed by the local VADER analyzer.
pub struct VaderSentimentScorer {
    analyzer: SentimentAnalyzer,
    title_weight: f64,
}

impl VaderSentimentScorer {
    pub fn new(title_weight: f64) -> Self {
        Self {
            analyzer: SentimentAnalyzer::new(),
            title_weight: title_weight.clamp(0.0, 1.0),
        }
    }

    /// Scores synchronously; the async trait impl delegates here.
    pub fn score_article(
        &self,
        ticker: &str,
        article: &NewsArticle,
    ) -> Result<NewsItemScore, ProviderError> {
        let unavailable = |reason: String| ProviderError::ScoringUnavailable {
            article_id: article.id.clone(),
            reason,
        };

        if article.title.trim().is_empty() && article.content.trim().is_empty() {
            return Err(unavailable("article has no text".to_string()));
        }

        let polarity = self
            .analyzer
            .analyze_news(&article.title, &article.content, self.title_weight);

        let keywords = ticker_keywords(ticker);
        let relevance = if mentions_any(&article.title, &keywords) {
            TITLE_MENTION_RELEVANCE
        } else if mentions_any(&article.content, &keywords) {
            BODY_MENTION_RELEVANCE
        } else {
            NO_MENTION_RELEVANCE
        };

        debug!(
            "Scored '{}': polarity {:.2}, relevance {:.1}",
            article.title, polarity, relevance
        );
        NewsItemScore::new(article.id.clone(), polarity, relevance)
            .map_err(|e| unavailable(e.to_string()))
    }
}

impl Default for VaderSentimentScorer {
    fn default() -> Self {
        Self::new(0.7)
    }
}

#[async_trait]
impl SentimentScorer for VaderSentimentScorer {
    async fn score(
        &self,
        ticker: &str,
        article: &NewsArticle,
    ) -> Result<NewsItemScore, ProviderError> {
        self.score_article(ticker, article)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn article(id: &str, title: &str, content: &str) -> NewsArticle {
        NewsArticle {
            id: id.to_string(),
            source: "test".to_string(),
            title: title.to_string(),
            content: content.to_string(),
            url: None,
            published_at: Utc::now(),
        }
    }

    #[test]
    fn test_bullish_headlines() {
        let analyzer = SentimentAnalyzer::new();

        let headlines = [
            "Bitcoin surges to new all-time high as adoption grows",
            "Crypto market rallies 15% in massive bull run",
            "Ethereum breaks resistance, investors extremely bullish",
        ];

        for headline in headlines {
            let score = analyzer.analyze(headline);
            assert!(score > 0.0, "Expected bullish score for '{}', got {}", headline, score);
        }
    }

    #[test]
    fn test_bearish_headlines() {
        let analyzer = SentimentAnalyzer::new();

        let headlines = [
            "Bitcoin crashes 20% in devastating market collapse",
            "Crypto exchange hacked, millions stolen in security breach",
            "Massive sell-off triggers panic",
        ];

        for headline in headlines {
            let score = analyzer.analyze(headline);
            assert!(score < 0.0, "Expected bearish score for '{}', got {}", headline, score);
        }
    }

    #[test]
    fn test_empty_text() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.analyze(""), 0.0);
        assert_eq!(analyzer.analyze("   "), 0.0);
    }

    #[test]
    fn test_blank_body_uses_title_only() {
        let analyzer = SentimentAnalyzer::new();
        let title = "Bitcoin surges to record high!";
        assert_eq!(analyzer.analyze_news(title, "", 0.7), analyzer.analyze(title));
    }

    #[test]
    fn test_relevance_tiers() {
        let scorer = VaderSentimentScorer::default();

        let in_title = scorer
            .score_article("BTC/USD", &article("a", "Bitcoin rallies", "Markets up."))
            .unwrap();
        assert_eq!(in_title.relevance(), TITLE_MENTION_RELEVANCE);

        let in_body = scorer
            .score_article("BTC/USD", &article("b", "Crypto rallies", "BTC led the move."))
            .unwrap();
        assert_eq!(in_body.relevance(), BODY_MENTION_RELEVANCE);

        let general = scorer
            .score_article("BTC/USD", &article("c", "Stocks rally", "Equities climbed."))
            .unwrap();
        assert_eq!(general.relevance(), NO_MENTION_RELEVANCE);
        assert_eq!(general.article_id(), "c");
    }

    #[test]
    fn test_blank_article_is_unscorable() {
        let scorer = VaderSentimentScorer::default();
        let err = tokio_test::block_on(scorer.score("ETH/USD", &article("x", " ", ""))).unwrap_err();
        assert!(matches!(err, ProviderError::ScoringUnavailable { ref article_id, .. } if article_id == "x"));
    }
}
