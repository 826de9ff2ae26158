//! Analyzer entities

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::value_objects::{Category, Priority, RecommendationType, WorkerFailureKind};

/// One actionable finding produced by an analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub recommendation_type: RecommendationType,
    /// Resource the finding applies to; absent for account-wide findings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub category: Category,
    pub priority: Priority,
    /// Estimated monthly savings, never negative; absent when not quantified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_monthly_savings: Option<f64>,
    pub rationale: String,
}

impl Recommendation {
    /// Account-wide recommendation without a resource
    pub fn new(
        recommendation_type: RecommendationType,
        category: Category,
        priority: Priority,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            recommendation_type,
            resource_id: None,
            category,
            priority,
            estimated_monthly_savings: None,
            rationale: rationale.into(),
        }
    }

    pub fn for_resource(
        recommendation_type: RecommendationType,
        resource_id: impl Into<String>,
        category: Category,
        priority: Priority,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            resource_id: Some(resource_id.into()),
            ..Self::new(recommendation_type, category, priority, rationale)
        }
    }

    /// Attach a savings estimate, clamped at zero
    pub fn with_savings(mut self, monthly_savings: f64) -> Self {
        let savings = if monthly_savings.is_finite() {
            monthly_savings.max(0.0)
        } else {
            0.0
        };
        self.estimated_monthly_savings = Some(savings);
        self
    }

    /// Savings used for ranking; unquantified findings count as zero
    pub fn savings_or_zero(&self) -> f64 {
        self.estimated_monthly_savings.unwrap_or(0.0)
    }
}

/// Cost summary of one category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub current_monthly_cost: f64,
    pub potential_monthly_savings: f64,
    #[serde(default)]
    pub resources_analyzed: usize,
    #[serde(default)]
    pub high_priority_recommendations: usize,
    #[serde(default)]
    pub total_recommendations: usize,
}

/// Analyzer execution metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerMetadata {
    /// Execution duration in milliseconds
    pub duration_ms: u64,
    /// Additional analyzer-specific information (per-resource details at `detailed` depth)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_info: BTreeMap<String, String>,
}

/// Successful analyzer output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerPayload {
    pub summary: CategorySummary,
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub metadata: AnalyzerMetadata,
}

impl AnalyzerPayload {
    /// Build a payload, deriving the recommendation counts and summed savings
    pub fn from_recommendations(
        current_monthly_cost: f64,
        resources_analyzed: usize,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        let potential_monthly_savings = recommendations.iter().map(|r| r.savings_or_zero()).sum();
        let high_priority_recommendations = recommendations
            .iter()
            .filter(|r| r.priority == Priority::High)
            .count();

        Self {
            summary: CategorySummary {
                current_monthly_cost,
                potential_monthly_savings,
                resources_analyzed,
                high_priority_recommendations,
                total_recommendations: recommendations.len(),
            },
            recommendations,
            metadata: AnalyzerMetadata::default(),
        }
    }
}

/// Serializable description of a failed invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerFailure {
    pub kind: WorkerFailureKind,
    pub message: String,
}

impl WorkerFailure {
    pub fn new(kind: WorkerFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for WorkerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum WorkerOutcome {
    Success(AnalyzerPayload),
    Failure(WorkerFailure),
}

/// Exactly one result per dispatched invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerResult {
    pub category: Category,
    pub outcome: WorkerOutcome,
}

impl WorkerResult {
    pub fn success(category: Category, payload: AnalyzerPayload) -> Self {
        Self {
            category,
            outcome: WorkerOutcome::Success(payload),
        }
    }

    pub fn failure(category: Category, failure: WorkerFailure) -> Self {
        Self {
            category,
            outcome: WorkerOutcome::Failure(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, WorkerOutcome::Success(_))
    }

    pub fn payload(&self) -> Option<&AnalyzerPayload> {
        match &self.outcome {
            WorkerOutcome::Success(payload) => Some(payload),
            WorkerOutcome::Failure(_) => None,
        }
    }

    pub fn failure_details(&self) -> Option<&WorkerFailure> {
        match &self.outcome {
            WorkerOutcome::Success(_) => None,
            WorkerOutcome::Failure(failure) => Some(failure),
        }
    }
}
