//! Object storage analyzer

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info};

use cloudspend_core::config::StorageThresholds;
use cloudspend_core::domain::analyzer::{
    AnalysisDepth, AnalyzerError, AnalyzerParams, AnalyzerPayload, Category, CategoryAnalyzer,
    Priority, Recommendation, RecommendationType,
};
use cloudspend_core::domain::provider::{
    InventoryProvider, MetricName, MetricsProvider, StorageProfile,
};

use crate::pricing;
use crate::support::{self, CostAttribution, DetailLog, SavingsBudget, analysis_window};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
const STANDARD_CLASS: &str = "STANDARD";

/// Price-table estimate of a bucket's monthly cost
fn estimated_monthly_cost(profile: &StorageProfile, size_gb: f64) -> f64 {
    if profile.storage_classes.is_empty() {
        return size_gb * pricing::storage_gb_month_price(STANDARD_CLASS);
    }
    profile
        .storage_classes
        .iter()
        .map(|(class, gb)| gb.max(0.0) * pricing::storage_gb_month_price(class))
        .sum()
}

/// Flags buckets with tiering, lifecycle and versioning opportunities
pub struct StorageAnalyzer {
    metrics: Arc<dyn MetricsProvider>,
    inventory: Arc<dyn InventoryProvider>,
    thresholds: StorageThresholds,
}

impl StorageAnalyzer {
    pub fn new(
        metrics: Arc<dyn MetricsProvider>,
        inventory: Arc<dyn InventoryProvider>,
        thresholds: StorageThresholds,
    ) -> Self {
        Self {
            metrics,
            inventory,
            thresholds,
        }
    }

    fn bucket_rules(
        &self,
        bucket: &str,
        profile: &StorageProfile,
        size_gb: Option<f64>,
        budget: &mut SavingsBudget,
        recommendations: &mut Vec<Recommendation>,
    ) {
        let category = Category::Storage;
        let t = &self.thresholds;

        match size_gb {
            Some(size_gb) => {
                if profile.only_in_class(STANDARD_CLASS) && size_gb > t.tiering_min_size_gb {
                    recommendations.push(
                        Recommendation::for_resource(
                            RecommendationType::StorageTier,
                            bucket,
                            category,
                            Priority::Medium,
                            format!(
                                "All {:.1} GB are stored in STANDARD; move infrequently accessed objects to a cheaper class",
                                size_gb
                            ),
                        )
                        .with_savings(budget.claim(t.tiering_savings_percent)),
                    );
                }

                if size_gb > t.lifecycle_min_size_gb && !profile.lifecycle_policy {
                    let (priority, percent) = if size_gb > t.lifecycle_high_priority_size_gb {
                        (Priority::High, t.lifecycle_high_savings_percent)
                    } else {
                        (Priority::Medium, t.lifecycle_savings_percent)
                    };
                    recommendations.push(
                        Recommendation::for_resource(
                            RecommendationType::LifecyclePolicy,
                            bucket,
                            category,
                            priority,
                            format!(
                                "{:.1} GB without lifecycle rules; add transitions and expirations",
                                size_gb
                            ),
                        )
                        .with_savings(budget.claim(percent)),
                    );
                }
            }
            None => support::log_skipped_metrics(category, bucket, "bucket_size_bytes"),
        }

        if profile.versioning_enabled {
            recommendations.push(
                Recommendation::for_resource(
                    RecommendationType::VersionManagement,
                    bucket,
                    category,
                    Priority::Medium,
                    "Versioning is enabled; expire noncurrent versions to stop paying for old copies",
                )
                .with_savings(budget.claim(t.versioning_savings_percent)),
            );
        }

        if profile.incomplete_multipart_uploads > 0 {
            recommendations.push(Recommendation::for_resource(
                RecommendationType::MultipartCleanup,
                bucket,
                category,
                Priority::Low,
                format!(
                    "{} incomplete multipart uploads; add a rule to abort them",
                    profile.incomplete_multipart_uploads
                ),
            ));
        }
    }
}

#[async_trait]
impl CategoryAnalyzer for StorageAnalyzer {
    fn category(&self) -> Category {
        Category::Storage
    }

    async fn analyze(&self, params: &AnalyzerParams) -> Result<AnalyzerPayload, AnalyzerError> {
        let start_time = Instant::now();
        let category = Category::Storage;
        let window = analysis_window(params)?;

        let bucket_ids =
            support::resolve_resource_ids(self.inventory.as_ref(), category, params, None).await?;

        if bucket_ids.is_empty() {
            debug!(request_id = %params.request_id, "No buckets to analyze");
            return Ok(AnalyzerPayload::default());
        }

        let descriptors =
            support::describe_by_id(self.inventory.as_ref(), category, &bucket_ids).await?;
        let sizes = self
            .metrics
            .get_utilization(&bucket_ids, MetricName::BucketSizeBytes, &window)
            .await?;
        let cost = CostAttribution::new(
            self.metrics.get_cost(category, &window).await?,
            &window,
            bucket_ids.len(),
        );

        let mut details = DetailLog::new(params.depth == AnalysisDepth::Detailed);
        let mut recommendations = Vec::new();
        let mut current_monthly_cost = 0.0;

        for bucket in &bucket_ids {
            let descriptor = descriptors.get(bucket);
            let profile = descriptor
                .and_then(|d| d.storage.clone())
                .unwrap_or_default();

            // Latest size metric wins over the inventory figure
            let size_gb = sizes
                .get(bucket)
                .and_then(|series| series.latest())
                .map(|bytes| bytes / BYTES_PER_GB)
                .or_else(|| descriptor.and_then(|d| d.storage.as_ref()).map(|p| p.size_gb));

            let monthly_cost = cost.monthly_cost(bucket, || {
                estimated_monthly_cost(&profile, size_gb.unwrap_or_default())
            });
            current_monthly_cost += monthly_cost;
            details.record(bucket, "monthly_cost", format!("{:.2}", monthly_cost));
            if let Some(size_gb) = size_gb {
                details.record(bucket, "size_gb", format!("{:.1}", size_gb));
            }

            let mut budget = SavingsBudget::new(monthly_cost);
            self.bucket_rules(bucket, &profile, size_gb, &mut budget, &mut recommendations);

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
            bucket_ids.len(),
            recommendations,
        );
        payload.metadata.duration_ms = support::elapsed_ms(start_time);
        payload.metadata.additional_info = details.into_entries();

        info!(
            request_id = %params.request_id,
            category = %category,
            buckets = bucket_ids.len(),
            recommendations = payload.recommendations.len(),
            "Storage analysis complete"
        );

        Ok(payload)
    }
}
