//! Orchestrator domain services

use async_trait::async_trait;

use cloudspend_core::domain::analyzer::WorkerResult;

use super::entities::{AnalysisPlan, AnalysisRequest, SynthesizedReport, WorkerInvocation};

/// Turns a request into a dispatch plan. Total: every request yields a plan.
pub trait QueryPlanner: Send + Sync {
    fn plan(&self, request: &AnalysisRequest) -> AnalysisPlan;
}

/// Runs analyzer invocations and collects exactly one result per invocation
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Never fails as a whole; individual failures are returned as results.
    /// Results are returned in invocation order.
    async fn dispatch(&self, invocations: Vec<WorkerInvocation>) -> Vec<WorkerResult>;
}

/// Optional destination for finished reports
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn store(&self, report: &SynthesizedReport) -> Result<(), ReportSinkError>;
}

/// Report persistence error
#[derive(Debug, thiserror::Error)]
pub enum ReportSinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Report rejected: {0}")]
    Rejected(String),
}
