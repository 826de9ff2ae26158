//! Category analyzer trait definition

use std::num::NonZeroU32;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entities::{AnalyzerPayload, WorkerFailure};
use super::value_objects::{AnalysisDepth, Category, WorkerFailureKind};
use crate::domain::provider::ProviderError;

/// Parameters of one analyzer invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerParams {
    /// Request this invocation belongs to
    pub request_id: Uuid,
    pub time_window_days: NonZeroU32,
    pub depth: AnalysisDepth,
    /// Explicit targets; empty means "ask the inventory"
    #[serde(default)]
    pub resource_ids: Vec<String>,
}

impl AnalyzerParams {
    pub fn new(request_id: Uuid, time_window_days: NonZeroU32, depth: AnalysisDepth) -> Self {
        Self {
            request_id,
            time_window_days,
            depth,
            resource_ids: Vec::new(),
        }
    }

    pub fn with_resource_ids(mut self, resource_ids: Vec<String>) -> Self {
        self.resource_ids = resource_ids;
        self
    }
}

/// Analyzer execution error
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Malformed provider data: {0}")]
    MalformedData(String),
}

impl AnalyzerError {
    pub fn failure_kind(&self) -> WorkerFailureKind {
        match self {
            Self::Provider(_) | Self::MalformedData(_) => WorkerFailureKind::Provider,
            Self::InvalidParams(_) => WorkerFailureKind::InvalidParams,
        }
    }

    /// Convert into the serializable failure recorded in a worker result
    pub fn to_failure(&self) -> WorkerFailure {
        WorkerFailure::new(self.failure_kind(), self.to_string())
    }
}

/// Trait that every category analyzer implements
///
/// Analyzers receive their providers and thresholds at construction time and
/// hold no mutable state, so one instance can serve concurrent invocations.
#[async_trait]
pub trait CategoryAnalyzer: Send + Sync {
    /// Category this analyzer is responsible for
    fn category(&self) -> Category;

    /// Analyze the category over the requested window
    ///
    /// # Returns
    /// * `Ok(AnalyzerPayload)` - cost summary and recommendations
    /// * `Err(AnalyzerError)` - unrecoverable provider or parameter error
    async fn analyze(&self, params: &AnalyzerParams) -> Result<AnalyzerPayload, AnalyzerError>;
}
