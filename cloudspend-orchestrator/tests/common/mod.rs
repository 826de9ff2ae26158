//! Common test utilities for cloudspend-orchestrator

#![allow(dead_code)]

pub mod fakes;

use std::sync::Arc;

use cloudspend_orchestrator::application::RunAnalysisUseCase;
use cloudspend_orchestrator::domain::{
    AnalyzerPayload, Category, CategoryAnalyzer, Priority, Recommendation, RecommendationType,
};
use cloudspend_orchestrator::infrastructure::{AnalyzerRegistry, ConcurrentDispatcher, KeywordQueryPlanner};

/// Recommendation with a resource and optional savings
pub fn recommendation(
    category: Category,
    recommendation_type: RecommendationType,
    resource_id: &str,
    priority: Priority,
    savings: Option<f64>,
) -> Recommendation {
    let rec = Recommendation::for_resource(
        recommendation_type,
        resource_id,
        category,
        priority,
        format!("{} on {}", recommendation_type, resource_id),
    );
    match savings {
        Some(savings) => rec.with_savings(savings),
        None => rec,
    }
}

/// Payload whose summary is `{current, Σ savings}`
pub fn payload(current: f64, recommendations: Vec<Recommendation>) -> AnalyzerPayload {
    let resources = recommendations.len();
    AnalyzerPayload::from_recommendations(current, resources, recommendations)
}

pub fn registry(analyzers: Vec<Arc<dyn CategoryAnalyzer>>) -> Arc<AnalyzerRegistry> {
    Arc::new(analyzers.into_iter().collect())
}

/// Use case wired with the keyword planner and the concurrent dispatcher
pub fn use_case(analyzers: Vec<Arc<dyn CategoryAnalyzer>>) -> RunAnalysisUseCase {
    RunAnalysisUseCase::new(
        Arc::new(KeywordQueryPlanner::new()),
        Arc::new(ConcurrentDispatcher::new(registry(analyzers))),
    )
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
