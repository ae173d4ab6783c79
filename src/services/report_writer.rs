//! Report writer - capability layer
//!
//! Persists the final report, nothing else. One Markdown file per session,
//! named by wall-clock timestamp so repeated runs never collide.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::info;

/// Report file sink
pub struct ReportWriter {
    report_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
        }
    }

    /// Write the report to `<report_dir>/interview-<timestamp>.md` and
    /// return the path.
    pub async fn write(&self, report: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.report_dir)
            .await
            .with_context(|| {
                format!("failed to create report dir: {}", self.report_dir.display())
            })?;

        let filename = format!(
            "interview-{}.md",
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        let path = self.report_dir.join(filename);

        let content = format!(
            "# Excel Interview Report\n\nGenerated: {}\n\n{}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            report
        );

        fs::write(&path, content)
            .await
            .with_context(|| format!("failed to write report: {}", path.display()))?;

        info!("report written to {}", path.display());

        Ok(path)
    }
}
