//! Orchestrator domain entities

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cloudspend_core::domain::analyzer::{
    AnalyzerParams, CategorySummary, Recommendation, WorkerFailureKind,
};

use super::value_objects::{AnalysisDepth, AnalysisScope, Category, Priority};

/// Days analyzed when the request does not say otherwise
pub const DEFAULT_TIME_WINDOW_DAYS: NonZeroU32 = match NonZeroU32::new(30) {
    Some(days) => days,
    None => unreachable!(),
};

/// A single user request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub query: String,
    #[serde(default = "default_time_window_days")]
    pub time_window_days: NonZeroU32,
    #[serde(default)]
    pub depth: AnalysisDepth,
    /// Explicit resources per category; categories absent here use the inventory
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resource_ids: BTreeMap<Category, Vec<String>>,
}

fn default_time_window_days() -> NonZeroU32 {
    DEFAULT_TIME_WINDOW_DAYS
}

impl AnalysisRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            time_window_days: DEFAULT_TIME_WINDOW_DAYS,
            depth: AnalysisDepth::default(),
            resource_ids: BTreeMap::new(),
        }
    }

    pub fn with_time_window_days(mut self, days: NonZeroU32) -> Self {
        self.time_window_days = days;
        self
    }

    pub fn with_depth(mut self, depth: AnalysisDepth) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_resource_ids(mut self, category: Category, ids: Vec<String>) -> Self {
        self.resource_ids.insert(category, ids);
        self
    }
}

/// Which analyzers to run, how urgently and how deep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisPlan {
    /// Never empty
    pub target_categories: BTreeSet<Category>,
    pub priority: Priority,
    pub scope: AnalysisScope,
    pub depth: AnalysisDepth,
}

impl AnalysisPlan {
    /// One invocation per target category, in category order
    pub fn invocations(&self, request_id: Uuid, request: &AnalysisRequest) -> Vec<WorkerInvocation> {
        self.target_categories
            .iter()
            .map(|&category| {
                let params = AnalyzerParams::new(request_id, request.time_window_days, self.depth)
                    .with_resource_ids(
                        request
                            .resource_ids
                            .get(&category)
                            .cloned()
                            .unwrap_or_default(),
                    );
                WorkerInvocation { category, params }
            })
            .collect()
    }
}

/// One analyzer call to be dispatched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerInvocation {
    pub category: Category,
    pub params: AnalyzerParams,
}

/// Aggregate cost impact of all successful analyzers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostImpact {
    pub current_monthly_cost: f64,
    pub potential_monthly_savings: f64,
    /// `potential / current * 100`, or 0 when nothing is currently spent
    pub savings_percentage: f64,
}

impl CostImpact {
    pub fn new(current_monthly_cost: f64, potential_monthly_savings: f64) -> Self {
        let savings_percentage = if current_monthly_cost > 0.0 {
            potential_monthly_savings / current_monthly_cost * 100.0
        } else {
            0.0
        };
        Self {
            current_monthly_cost,
            potential_monthly_savings,
            savings_percentage,
        }
    }
}

/// A failed analyzer as reported to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFailure {
    pub category: Category,
    pub kind: WorkerFailureKind,
    pub message: String,
}

/// The merged, ranked and narrated result of one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedReport {
    pub query: String,
    /// Categories whose analyzers succeeded
    pub categories_consulted: BTreeSet<Category>,
    pub aggregate: CostImpact,
    pub ranked_recommendations: Vec<Recommendation>,
    pub next_steps: Vec<String>,
    pub narrative: String,
    pub generated_at: DateTime<Utc>,
    pub category_summaries: BTreeMap<Category, CategorySummary>,
    pub failures: Vec<CategoryFailure>,
    /// Count before truncation to the ranked list
    pub total_recommendations: usize,
    pub high_priority_recommendations: usize,
    /// Set only when the pipeline itself broke
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SynthesizedReport {
    pub fn with_narrative(mut self, narrative: String) -> Self {
        self.narrative = narrative;
        self
    }

    /// Minimal report returned when the pipeline fails unexpectedly
    pub fn degraded(request: &AnalysisRequest, error: impl Into<String>) -> Self {
        Self {
            query: request.query.clone(),
            categories_consulted: BTreeSet::new(),
            aggregate: CostImpact::default(),
            ranked_recommendations: Vec::new(),
            next_steps: Vec::new(),
            narrative: "The cost analysis could not be completed. No recommendations are available for this request.".to_string(),
            generated_at: Utc::now(),
            category_summaries: BTreeMap::new(),
            failures: Vec::new(),
            total_recommendations: 0,
            high_priority_recommendations: 0,
            error: Some(error.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}
