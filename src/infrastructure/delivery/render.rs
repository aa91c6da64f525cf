//! Plain-text and HTML renderings of an analysis report.

use crate::domain::recommendation::Action;
use crate::domain::report::AnalysisReport;
use crate::domain::signal::PriceLevel;
use std::fmt::Write;

fn format_levels(levels: &[PriceLevel]) -> String {
    if levels.is_empty() {
        return "none".to_string();
    }
    levels
        .iter()
        .map(|l| format!("{:.2} (x{})", l.price, l.touches))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Lines shared by both renderings: (heading, body lines).
fn sections(report: &AnalysisReport) -> Vec<(&'static str, Vec<String>)> {
    let s = &report.summary;
    let t = &report.technical;
    let n = &report.sentiment;
    let r = &report.recommendation;

    let market = vec![
        format!("Current price: {:.2}", s.current_price),
        format!(
            "Period change: {:+.2} ({:+.2}%)",
            s.total_change, s.total_change_pct
        ),
        format!(
            "Range: {:.2} - {:.2} (avg close {:.2})",
            s.period_low, s.period_high, s.avg_close
        ),
        format!(
            "{} candles at {} from {} to {}",
            s.candle_count,
            report.granularity,
            s.start.format("%Y-%m-%d %H:%M"),
            s.end.format("%Y-%m-%d %H:%M")
        ),
    ];

    let technical = vec![
        format!(
            "Trend: {} (short MA {:.2}, long MA {:.2})",
            t.trend, t.short_ma, t.long_ma
        ),
        format!("Momentum: {:+.2}", t.momentum),
        format!("Volatility (ATR): {:.2}", t.volatility),
        format!("Volume: {}", t.volume_trend),
        format!("Support: {}", format_levels(&t.support_levels)),
        format!("Resistance: {}", format_levels(&t.resistance_levels)),
    ];

    let sentiment = vec![
        format!("{} ({} articles)", n.label(), n.article_count),
        format!(
            "Polarity {:+.2}, strength {:.2}, dispersion {:.2}",
            n.aggregate_polarity, n.strength, n.dispersion
        ),
    ];

    let mut recommendation = vec![format!(
        "{} with {:.0}% confidence",
        r.action,
        r.confidence * 100.0
    )];
    if r.action != Action::Hold {
        recommendation.push(format!("Entry: {:.2}", r.entry_price));
        recommendation.push(format!(
            "Target: {:.2} ({:+.2}%)",
            r.target_price,
            r.target_pct()
        ));
        recommendation.push(format!(
            "Stop loss: {:.2} ({:+.2}%)",
            r.stop_loss_price,
            r.stop_pct()
        ));
        if let Some(rr) = r.risk_reward() {
            recommendation.push(format!("Risk/reward: {:.2}", rr));
        }
    }
    recommendation.push(format!(
        "Scores: technical {:+.2}, sentiment {:+.2}, combined {:+.2}",
        r.scores.technical, r.scores.sentiment, r.scores.combined
    ));

    vec![
        ("Market", market),
        ("Technical", technical),
        ("Sentiment", sentiment),
        ("Recommendation", recommendation),
        ("Rationale", r.rationale.clone()),
    ]
}

pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", report.subject());
    let _ = writeln!(
        out,
        "Suited to {}",
        report.timeframe.trading_style()
    );

    for (heading, lines) in sections(report) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", heading.to_uppercase());
        if lines.is_empty() {
            let _ = writeln!(out, "- no notable factors");
        }
        for line in lines {
            let _ = writeln!(out, "- {}", line);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    out
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Email-style HTML body: banner, one block per section, generation footer.
pub fn render_html(report: &AnalysisReport) -> String {
    let mut body = String::new();
    for (heading, lines) in sections(report) {
        let _ = write!(body, "<h3>{}</h3><ul>", heading);
        if lines.is_empty() {
            body.push_str("<li>no notable factors</li>");
        }
        for line in lines {
            let _ = write!(body, "<li>{}</li>", escape_html(&line));
        }
        body.push_str("</ul>");
    }

    format!(
        r#"<html>
<head><meta charset="utf-8"><title>{subject}</title></head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
  <div style="background: #1a1a1a; color: white; padding: 20px; border-radius: 8px; text-align: center; margin-bottom: 20px;">
    <h1>CRYPTO TRADING ALERT</h1>
    <h2>{ticker} {label} Analysis</h2>
  </div>
  <div style="background: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0;">
    {body}
  </div>
  <hr>
  <p style="text-align: center; color: #666; font-size: 12px;">Generated: {generated}</p>
</body>
</html>
"#,
        subject = escape_html(&report.subject()),
        ticker = escape_html(&report.ticker),
        label = report.timeframe.label(),
        body = body,
        generated = report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}
