//! Common test utilities for cloudspend-analyzers

#![allow(dead_code)]

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;

use cloudspend_core::domain::analyzer::{
    AnalysisDepth, AnalyzerParams, AnalyzerPayload, Category, Recommendation, RecommendationType,
};
use cloudspend_core::domain::provider::{
    CostBreakdown, MetricName, MetricSample, MetricSeries, ResourceDescriptor,
};
use cloudspend_core::infrastructure::{CloudSnapshot, StaticCloudProvider};
use uuid::Uuid;

pub const GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Builds an in-memory provider one resource at a time
#[derive(Default)]
pub struct SnapshotBuilder {
    snapshot: CloudSnapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resource(mut self, category: Category, descriptor: ResourceDescriptor) -> Self {
        self.snapshot
            .resources
            .entry(category)
            .or_default()
            .push(descriptor);
        self
    }

    pub fn metric(mut self, resource_id: &str, metric: MetricName, average: f64, maximum: f64) -> Self {
        self.snapshot.metrics.push(MetricSeries::new(
            resource_id,
            metric,
            vec![MetricSample::new(average, maximum)],
        ));
        self
    }

    pub fn cost(mut self, category: Category, total: f64, per_resource: &[(&str, f64)]) -> Self {
        self.snapshot.costs.insert(
            category,
            CostBreakdown {
                total,
                per_resource: per_resource
                    .iter()
                    .map(|(id, cost)| (id.to_string(), *cost))
                    .collect::<HashMap<_, _>>(),
            },
        );
        self
    }

    pub fn unavailable(mut self, category: Category, message: &str) -> Self {
        self.snapshot
            .unavailable
            .insert(category, message.to_string());
        self
    }

    pub fn build(self) -> Arc<StaticCloudProvider> {
        Arc::new(StaticCloudProvider::new(self.snapshot))
    }
}

pub fn resource(id: &str, resource_type: &str, state: &str) -> ResourceDescriptor {
    ResourceDescriptor {
        resource_type: Some(resource_type.to_string()),
        state: Some(state.to_string()),
        ..ResourceDescriptor::new(id)
    }
}

pub fn with_tags(mut descriptor: ResourceDescriptor, tags: &[(&str, &str)]) -> ResourceDescriptor {
    for (key, value) in tags {
        descriptor.tags.insert(key.to_string(), value.to_string());
    }
    descriptor
}

/// Tags satisfying both the per-analyzer checks and the full tagging policy
pub fn fully_tagged(descriptor: ResourceDescriptor) -> ResourceDescriptor {
    with_tags(
        descriptor,
        &[
            ("Environment", "Production"),
            ("Owner", "platform"),
            ("Project", "checkout"),
            ("CostCenter", "cc-42"),
            ("Application", "api"),
        ],
    )
}

pub fn params() -> AnalyzerParams {
    AnalyzerParams::new(
        Uuid::new_v4(),
        NonZeroU32::new(30).unwrap(),
        AnalysisDepth::Standard,
    )
}

pub fn detailed_params() -> AnalyzerParams {
    AnalyzerParams {
        depth: AnalysisDepth::Detailed,
        ..params()
    }
}

pub fn find<'a>(
    payload: &'a AnalyzerPayload,
    recommendation_type: RecommendationType,
    resource_id: &str,
) -> Option<&'a Recommendation> {
    payload.recommendations.iter().find(|r| {
        r.recommendation_type == recommendation_type && r.resource_id.as_deref() == Some(resource_id)
    })
}

pub fn of_type(payload: &AnalyzerPayload, recommendation_type: RecommendationType) -> Vec<&Recommendation> {
    payload
        .recommendations
        .iter()
        .filter(|r| r.recommendation_type == recommendation_type)
        .collect()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub fn savings(rec: &Recommendation) -> f64 {
    rec.estimated_monthly_savings
        .expect("recommendation should carry a savings estimate")
}
