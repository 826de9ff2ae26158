//! Report sinks
//!
//! Persisting a report is optional and must never affect the caller; the use
//! case only logs a failed store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::entities::SynthesizedReport;
use crate::domain::services::{ReportSink, ReportSinkError};

/// Writes each report to its own pretty-printed JSON file
pub struct FileSystemReportSink {
    report_dir: PathBuf,
}

impl FileSystemReportSink {
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
        }
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// `report-<timestamp>-<uuid>.json`, unique even for reports generated
    /// in the same instant
    fn file_name_for(report: &SynthesizedReport) -> String {
        format!(
            "report-{}-{}.json",
            report.generated_at.format("%Y%m%dT%H%M%S%.3fZ"),
            Uuid::new_v4().simple()
        )
    }
}

#[async_trait]
impl ReportSink for FileSystemReportSink {
    async fn store(&self, report: &SynthesizedReport) -> Result<(), ReportSinkError> {
        let json = serde_json::to_string_pretty(report)?;

        fs::create_dir_all(&self.report_dir).await?;
        let path = self.report_dir.join(Self::file_name_for(report));
        debug!("Writing report to {:?}", path);

        fs::write(&path, json).await?;

        info!(path = %path.display(), "Stored analysis report");
        Ok(())
    }
}

/// Discards every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReportSink;

#[async_trait]
impl ReportSink for NoopReportSink {
    async fn store(&self, _report: &SynthesizedReport) -> Result<(), ReportSinkError> {
        Ok(())
    }
}
