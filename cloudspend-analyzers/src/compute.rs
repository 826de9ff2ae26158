//! Compute instance analyzer

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info};

use cloudspend_core::config::ComputeThresholds;
use cloudspend_core::domain::analyzer::{
    AnalysisDepth, AnalyzerError, AnalyzerParams, AnalyzerPayload, Category, CategoryAnalyzer,
};
use cloudspend_core::domain::provider::{
    InventoryProvider, MetricName, MetricsProvider, ResourceFilter,
};

use crate::pricing;
use crate::support::{
    self, CostAttribution, CpuProfile, DetailLog, SavingsBudget, analysis_window,
};

/// Flags idle and oversized running instances
pub struct ComputeAnalyzer {
    metrics: Arc<dyn MetricsProvider>,
    inventory: Arc<dyn InventoryProvider>,
    thresholds: ComputeThresholds,
}

impl ComputeAnalyzer {
    pub fn new(
        metrics: Arc<dyn MetricsProvider>,
        inventory: Arc<dyn InventoryProvider>,
        thresholds: ComputeThresholds,
    ) -> Self {
        Self {
            metrics,
            inventory,
            thresholds,
        }
    }
}

#[async_trait]
impl CategoryAnalyzer for ComputeAnalyzer {
    fn category(&self) -> Category {
        Category::Compute
    }

    async fn analyze(&self, params: &AnalyzerParams) -> Result<AnalyzerPayload, AnalyzerError> {
        let start_time = Instant::now();
        let category = Category::Compute;
        let window = analysis_window(params)?;

        let instance_ids = support::resolve_resource_ids(
            self.inventory.as_ref(),
            category,
            params,
            Some(&ResourceFilter::state("running")),
        )
        .await?;

        if instance_ids.is_empty() {
            debug!(request_id = %params.request_id, "No running instances to analyze");
            return Ok(AnalyzerPayload::default());
        }

        let descriptors =
            support::describe_by_id(self.inventory.as_ref(), category, &instance_ids).await?;
        let cpu = self
            .metrics
            .get_utilization(&instance_ids, MetricName::CpuUtilization, &window)
            .await?;
        let cost = CostAttribution::new(
            self.metrics.get_cost(category, &window).await?,
            &window,
            instance_ids.len(),
        );

        let rules = &self.thresholds.right_sizing;
        let mut details = DetailLog::new(params.depth == AnalysisDepth::Detailed);
        let mut recommendations = Vec::new();
        let mut current_monthly_cost = 0.0;

        for instance_id in &instance_ids {
            let descriptor = descriptors.get(instance_id);
            let instance_type = descriptor.and_then(|d| d.resource_type.as_deref());
            let monthly_cost =
                cost.monthly_cost(instance_id, || pricing::instance_monthly_cost(instance_type));
            current_monthly_cost += monthly_cost;
            details.record(instance_id, "monthly_cost", format!("{:.2}", monthly_cost));

            let profile = cpu.get(instance_id).and_then(|series| {
                Some(CpuProfile {
                    average: series.mean_average()?,
                    peak: series.peak()?,
                })
            });

            match profile {
                Some(profile) => {
                    details.record(instance_id, "avg_cpu", format!("{:.1}", profile.average));
                    details.record(instance_id, "peak_cpu", format!("{:.1}", profile.peak));

                    let mut budget = SavingsBudget::new(monthly_cost);
                    if profile.peak < rules.idle_peak_cpu {
                        recommendations.push(support::idle_recommendation(
                            category,
                            instance_id,
                            rules,
                            &mut budget,
                            format!(
                                "Peak CPU stayed at {:.1}% over {} days",
                                profile.peak,
                                window.days()
                            ),
                        ));
                    } else if let Some(rec) = support::right_sizing_recommendation(
                        category,
                        instance_id,
                        instance_type,
                        profile,
                        rules,
                        &mut budget,
                    ) {
                        recommendations.push(rec);
                    }
                }
                None => support::log_skipped_metrics(category, instance_id, "cpu_utilization"),
            }

            if let Some(descriptor) = descriptor
                && let Some(rec) = support::tagging_gap_recommendation(
                    category,
                    descriptor,
                    &self.thresholds.required_tags,
                )
            {
                recommendations.push(rec);
            }
        }

        let mut payload = AnalyzerPayload::from_recommendations(
            current_monthly_cost,
            instance_ids.len(),
            recommendations,
        );
        payload.metadata.duration_ms = support::elapsed_ms(start_time);
        payload.metadata.additional_info = details.into_entries();

        info!(
            request_id = %params.request_id,
            category = %category,
            instances = instance_ids.len(),
            recommendations = payload.recommendations.len(),
            "Compute analysis complete"
        );

        Ok(payload)
    }
}
