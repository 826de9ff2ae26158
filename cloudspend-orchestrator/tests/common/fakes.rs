//! Test doubles for analyzers and report sinks

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use cloudspend_core::domain::analyzer::AnalyzerError;
use cloudspend_core::domain::provider::ProviderError;
use cloudspend_orchestrator::domain::{
    AnalyzerParams, AnalyzerPayload, Category, CategoryAnalyzer, ReportSink, ReportSinkError,
    SynthesizedReport,
};

/// Returns a fixed payload
pub struct FixedAnalyzer {
    pub category: Category,
    pub payload: AnalyzerPayload,
}

impl FixedAnalyzer {
    pub fn arc(category: Category, payload: AnalyzerPayload) -> Arc<dyn CategoryAnalyzer> {
        Arc::new(Self { category, payload })
    }
}

#[async_trait]
impl CategoryAnalyzer for FixedAnalyzer {
    fn category(&self) -> Category {
        self.category
    }

    async fn analyze(&self, _params: &AnalyzerParams) -> Result<AnalyzerPayload, AnalyzerError> {
        Ok(self.payload.clone())
    }
}

/// Always fails with a provider error
pub struct FailingAnalyzer {
    pub category: Category,
    pub message: String,
}

impl FailingAnalyzer {
    pub fn arc(category: Category, message: &str) -> Arc<dyn CategoryAnalyzer> {
        Arc::new(Self {
            category,
            message: message.to_string(),
        })
    }
}

#[async_trait]
impl CategoryAnalyzer for FailingAnalyzer {
    fn category(&self) -> Category {
        self.category
    }

    async fn analyze(&self, _params: &AnalyzerParams) -> Result<AnalyzerPayload, AnalyzerError> {
        Err(ProviderError::Unavailable(self.message.clone()).into())
    }
}

/// Sleeps before returning an empty payload
pub struct SlowAnalyzer {
    pub category: Category,
    pub delay: Duration,
}

impl SlowAnalyzer {
    pub fn arc(category: Category, delay: Duration) -> Arc<dyn CategoryAnalyzer> {
        Arc::new(Self { category, delay })
    }
}

#[async_trait]
impl CategoryAnalyzer for SlowAnalyzer {
    fn category(&self) -> Category {
        self.category
    }

    async fn analyze(&self, _params: &AnalyzerParams) -> Result<AnalyzerPayload, AnalyzerError> {
        tokio::time::sleep(self.delay).await;
        Ok(AnalyzerPayload::default())
    }
}

/// Panics on every call
pub struct PanickingAnalyzer {
    pub category: Category,
}

impl PanickingAnalyzer {
    pub fn arc(category: Category) -> Arc<dyn CategoryAnalyzer> {
        Arc::new(Self { category })
    }
}

#[async_trait]
impl CategoryAnalyzer for PanickingAnalyzer {
    fn category(&self) -> Category {
        self.category
    }

    async fn analyze(&self, _params: &AnalyzerParams) -> Result<AnalyzerPayload, AnalyzerError> {
        panic!("{} analyzer exploded", self.category)
    }
}

/// Records the params it was called with and how many calls overlapped
pub struct RecordingAnalyzer {
    pub category: Category,
    pub delay: Duration,
    pub in_flight: Arc<AtomicUsize>,
    pub peak_in_flight: Arc<AtomicUsize>,
    pub seen: Arc<std::sync::Mutex<Vec<AnalyzerParams>>>,
}

impl RecordingAnalyzer {
    pub fn new(category: Category, delay: Duration, in_flight: Arc<AtomicUsize>, peak: Arc<AtomicUsize>) -> Self {
        Self {
            category,
            delay,
            in_flight,
            peak_in_flight: peak,
            seen: Arc::default(),
        }
    }
}

#[async_trait]
impl CategoryAnalyzer for RecordingAnalyzer {
    fn category(&self) -> Category {
        self.category
    }

    async fn analyze(&self, params: &AnalyzerParams) -> Result<AnalyzerPayload, AnalyzerError> {
        self.seen.lock().unwrap().push(params.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(AnalyzerPayload::default())
    }
}

/// Forwards every stored report to a channel
pub struct ChannelReportSink {
    pub tx: mpsc::UnboundedSender<SynthesizedReport>,
}

impl ChannelReportSink {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<SynthesizedReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

#[async_trait]
impl ReportSink for ChannelReportSink {
    async fn store(&self, report: &SynthesizedReport) -> Result<(), ReportSinkError> {
        self.tx
            .send(report.clone())
            .map_err(|e| ReportSinkError::Rejected(e.to_string()))
    }
}

/// Rejects every report
pub struct FailingReportSink;

#[async_trait]
impl ReportSink for FailingReportSink {
    async fn store(&self, _report: &SynthesizedReport) -> Result<(), ReportSinkError> {
        Err(ReportSinkError::Rejected("disk full".to_string()))
    }
}
