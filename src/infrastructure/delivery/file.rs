use crate::domain::errors::ProviderError;
use crate::domain::ports::ReportDelivery;
use crate::domain::report::AnalysisReport;
use crate::infrastructure::delivery::render::render_html;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes each report as an HTML page plus a JSON sidecar.
///
/// The destination becomes a subdirectory of `output_dir`, so reports for
/// different recipients stay apart.
pub struct FileReportDelivery {
    output_dir: PathBuf,
}

impl FileReportDelivery {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Base path (without extension) a report for `destination` is written to.
    pub fn report_path(&self, report: &AnalysisReport, destination: &str) -> PathBuf {
        let stem = format!(
            "{}-{}-{}",
            sanitize(&report.ticker),
            report.timeframe.as_str(),
            report.generated_at.format("%Y%m%dT%H%M%S")
        );
        self.output_dir.join(sanitize(destination)).join(stem)
    }
}

fn sanitize(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "default".to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl ReportDelivery for FileReportDelivery {
    async fn deliver(
        &self,
        report: &AnalysisReport,
        destination: &str,
    ) -> Result<(), ProviderError> {
        let failed = |reason: String| ProviderError::DeliveryFailed {
            destination: destination.to_string(),
            reason,
        };

        let base = self.report_path(report, destination);
        if let Some(folder) = base.parent() {
            tokio::fs::create_dir_all(folder)
                .await
                .map_err(|e| failed(format!("create {}: {}", folder.display(), e)))?;
        }

        let html_path = base.with_extension("html");
        tokio::fs::write(&html_path, render_html(report))
            .await
            .map_err(|e| failed(format!("write {}: {}", html_path.display(), e)))?;

        let json = serde_json::to_string_pretty(report)
            .map_err(|e| failed(format!("serialize report: {}", e)))?;
        let json_path = base.with_extension("json");
        tokio::fs::write(&json_path, json)
            .await
            .map_err(|e| failed(format!("write {}: {}", json_path.display(), e)))?;

        info!("Saved report: {}", html_path.display());
        Ok(())
    }
}
