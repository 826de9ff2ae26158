//! Reserved instance and savings plan analyzer
//!
//! Commitment spend is already part of the compute bill, so this analyzer
//! reports no current cost of its own. Savings come from two places: the
//! unused share of under-utilized commitments, and the discount foregone on
//! on-demand compute spend that no commitment covers.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use cloudspend_core::config::CommitmentThresholds;
use cloudspend_core::domain::analyzer::{
    AnalysisDepth, AnalyzerError, AnalyzerParams, AnalyzerPayload, Category, CategoryAnalyzer,
    Priority, Recommendation, RecommendationType,
};
use cloudspend_core::domain::provider::{
    CommitmentKind, InventoryProvider, MetricName, MetricsProvider,
};

use crate::pricing;
use crate::support::{self, CostAttribution, DetailLog, analysis_window};

/// Flags under-used commitments and gaps in commitment coverage
pub struct CommitmentsAnalyzer {
    metrics: Arc<dyn MetricsProvider>,
    inventory: Arc<dyn InventoryProvider>,
    thresholds: CommitmentThresholds,
}

impl CommitmentsAnalyzer {
    pub fn new(
        metrics: Arc<dyn MetricsProvider>,
        inventory: Arc<dyn InventoryProvider>,
        thresholds: CommitmentThresholds,
    ) -> Self {
        Self {
            metrics,
            inventory,
            thresholds,
        }
    }

    /// `(target, critical)` utilization percentages for the commitment kind
    fn utilization_bounds(&self, kind: CommitmentKind) -> (f64, f64) {
        match kind {
            CommitmentKind::ReservedInstance => (
                self.thresholds.ri_utilization_target,
                self.thresholds.ri_utilization_critical,
            ),
            CommitmentKind::SavingsPlan => (
                self.thresholds.sp_utilization_target,
                self.thresholds.sp_utilization_critical,
            ),
        }
    }

    fn utilization_recommendation(
        &self,
        commitment_id: &str,
        kind: CommitmentKind,
        utilization: f64,
        monthly_cost: f64,
    ) -> Option<Recommendation> {
        let (target, critical) = self.utilization_bounds(kind);
        if utilization >= target {
            return None;
        }
        let priority = if utilization < critical {
            Priority::High
        } else {
            Priority::Medium
        };
        let unused_share = (100.0 - utilization.clamp(0.0, 100.0)) / 100.0;

        Some(
            Recommendation::for_resource(
                RecommendationType::CommitmentUtilization,
                commitment_id,
                Category::Commitments,
                priority,
                format!(
                    "{} utilization is {:.1}%, below the {:.0}% target; modify, exchange or resell the unused capacity",
                    capitalize(&kind.to_string()),
                    utilization,
                    target
                ),
            )
            .with_savings(monthly_cost * unused_share),
        )
    }

    fn coverage_recommendation(
        &self,
        commitment_id: &str,
        kind: CommitmentKind,
        coverage: f64,
    ) -> Option<Recommendation> {
        let t = &self.thresholds;
        let (target, priority) = match kind {
            CommitmentKind::ReservedInstance => {
                let priority = if coverage < t.ri_coverage_critical {
                    Priority::High
                } else {
                    Priority::Medium
                };
                (t.ri_coverage_target, priority)
            }
            CommitmentKind::SavingsPlan => (t.sp_coverage_target, Priority::Medium),
        };
        if coverage >= target {
            return None;
        }

        Some(Recommendation::for_resource(
            RecommendationType::CommitmentCoverage,
            commitment_id,
            Category::Commitments,
            priority,
            format!(
                "{} coverage is {:.1}%, below the {:.0}% target",
                capitalize(&kind.to_string()),
                coverage,
                target
            ),
        ))
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl CategoryAnalyzer for CommitmentsAnalyzer {
    fn category(&self) -> Category {
        Category::Commitments
    }

    async fn analyze(&self, params: &AnalyzerParams) -> Result<AnalyzerPayload, AnalyzerError> {
        let start_time = Instant::now();
        let category = Category::Commitments;
        let window = analysis_window(params)?;

        let commitment_ids =
            support::resolve_resource_ids(self.inventory.as_ref(), category, params, None).await?;
        let descriptors =
            support::describe_by_id(self.inventory.as_ref(), category, &commitment_ids).await?;

        let utilization = self
            .metrics
            .get_utilization(&commitment_ids, MetricName::CommitmentUtilization, &window)
            .await?;
        let coverage = self
            .metrics
            .get_utilization(&commitment_ids, MetricName::CommitmentCoverage, &window)
            .await?;
        let cost = CostAttribution::new(
            self.metrics.get_cost(category, &window).await?,
            &window,
            commitment_ids.len(),
        );
        let compute_cost = self.metrics.get_cost(Category::Compute, &window).await?;
        let on_demand_monthly = compute_cost.total.max(0.0) * window.monthly_factor();

        let mut details = DetailLog::new(params.depth == AnalysisDepth::Detailed);
        let mut recommendations = Vec::new();
        let mut coverage_shortfall = commitment_ids.is_empty();
        let mut best_coverage: Option<f64> = None;

        for commitment_id in &commitment_ids {
            let Some(descriptor) = descriptors.get(commitment_id) else {
                debug!(resource_id = %commitment_id, "Commitment not described by inventory; skipping");
                continue;
            };
            let Some(kind) = descriptor.commitment else {
                warn!(
                    resource_id = %commitment_id,
                    "Resource listed as a commitment has no commitment kind; skipping"
                );
                continue;
            };

            let monthly_cost = cost.monthly_cost(commitment_id, || {
                pricing::instance_monthly_cost(descriptor.resource_type.as_deref())
            });

            match utilization.get(commitment_id).and_then(|s| s.latest()) {
                Some(value) => {
                    details.record(commitment_id, "utilization", format!("{:.1}", value));
                    recommendations.extend(self.utilization_recommendation(
                        commitment_id,
                        kind,
                        value,
                        monthly_cost,
                    ));
                }
                None => support::log_skipped_metrics(category, commitment_id, "commitment_utilization"),
            }

            if let Some(value) = coverage.get(commitment_id).and_then(|s| s.latest()) {
                details.record(commitment_id, "coverage", format!("{:.1}", value));
                best_coverage = Some(best_coverage.map_or(value, |best: f64| best.max(value)));
                if let Some(rec) = self.coverage_recommendation(commitment_id, kind, value) {
                    coverage_shortfall = true;
                    recommendations.push(rec);
                }
            }
        }

        if coverage_shortfall && on_demand_monthly > 0.0 {
            let covered = best_coverage.unwrap_or(0.0).clamp(0.0, 100.0);
            let uncovered_spend = on_demand_monthly * (100.0 - covered) / 100.0;
            let discount = self.thresholds.assumed_commitment_discount_percent;
            recommendations.push(
                Recommendation::new(
                    RecommendationType::CommitmentPurchase,
                    category,
                    Priority::High,
                    format!(
                        "About ${:.2} of monthly compute spend runs on demand; a savings plan or reserved instances at ~{:.0}% discount would cut it",
                        uncovered_spend, discount
                    ),
                )
                .with_savings(uncovered_spend * discount / 100.0),
            );
        }

        let mut payload =
            AnalyzerPayload::from_recommendations(0.0, commitment_ids.len(), recommendations);
        payload.metadata.duration_ms = support::elapsed_ms(start_time);
        payload.metadata.additional_info = details.into_entries();
        payload
            .metadata
            .additional_info
            .insert("on_demand_monthly".to_string(), format!("{:.2}", on_demand_monthly));

        info!(
            request_id = %params.request_id,
            category = %category,
            commitments = commitment_ids.len(),
            recommendations = payload.recommendations.len(),
            "Commitment analysis complete"
        );

        Ok(payload)
    }
}
