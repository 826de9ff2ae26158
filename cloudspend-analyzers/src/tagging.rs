//! Cross-category tag compliance analyzer

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{info, warn};

use cloudspend_core::config::TaggingPolicyConfig;
use cloudspend_core::domain::analyzer::{
    AnalysisDepth, AnalyzerError, AnalyzerParams, AnalyzerPayload, Category, CategoryAnalyzer,
    Priority, Recommendation, RecommendationType,
};
use cloudspend_core::domain::provider::{
    InventoryProvider, MetricsProvider, ResourceDescriptor, TimeWindow,
};

use crate::support::{self, CostAttribution, DetailLog, analysis_window};

/// Categories whose inventories are checked against the tagging policy
const TAGGED_CATEGORIES: [Category; 3] = [Category::Compute, Category::Storage, Category::Database];

/// A resource together with the category it was listed under
struct ScannedResource {
    category: Category,
    descriptor: ResourceDescriptor,
    billed_monthly: Option<f64>,
}

/// Compliance counters for one group of resources
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    total: usize,
    compliant: usize,
}

impl Tally {
    fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.compliant as f64 * 100.0 / self.total as f64
        }
    }
}

/// Checks resources against the tagging policy and quantifies untagged spend
pub struct TaggingAnalyzer {
    metrics: Arc<dyn MetricsProvider>,
    inventory: Arc<dyn InventoryProvider>,
    policy: TaggingPolicyConfig,
}

impl TaggingAnalyzer {
    pub fn new(
        metrics: Arc<dyn MetricsProvider>,
        inventory: Arc<dyn InventoryProvider>,
        policy: TaggingPolicyConfig,
    ) -> Self {
        Self {
            metrics,
            inventory,
            policy,
        }
    }

    /// Required tags that are absent or carry a value outside the allowed set
    fn violations<'a>(&'a self, resource: &ResourceDescriptor) -> Vec<&'a str> {
        self.policy
            .required_tags
            .iter()
            .filter(|tag| {
                !resource
                    .tags
                    .get(&tag.key)
                    .is_some_and(|value| tag.accepts(value))
            })
            .map(|tag| tag.key.as_str())
            .collect()
    }

    async fn scan_category(
        &self,
        category: Category,
        params: &AnalyzerParams,
        window: &TimeWindow,
    ) -> Result<Vec<ScannedResource>, AnalyzerError> {
        // Explicit ids span categories; each is described under the inventory listing it
        let listed = self.inventory.list_resources(category, None).await?;
        let ids = if params.resource_ids.is_empty() {
            listed
        } else {
            let listed: HashSet<String> = listed.into_iter().collect();
            support::resolve_resource_ids(self.inventory.as_ref(), category, params, None)
                .await?
                .into_iter()
                .filter(|id| listed.contains(id))
                .collect()
        };
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let descriptors = self.inventory.describe_resources(category, &ids).await?;

        // Untagged spend counts billed cost only; a missing bill is not fatal
        let cost = match self.metrics.get_cost(category, window).await {
            Ok(breakdown) => Some(CostAttribution::new(breakdown, window, descriptors.len())),
            Err(e) => {
                warn!(category = %category, error = %e, "Cost unavailable; untagged spend will be understated");
                None
            }
        };

        Ok(descriptors
            .into_iter()
            .map(|descriptor| ScannedResource {
                category,
                billed_monthly: cost
                    .as_ref()
                    .and_then(|c| c.billed(&descriptor.resource_id)),
                descriptor,
            })
            .collect())
    }
}

#[async_trait]
impl CategoryAnalyzer for TaggingAnalyzer {
    fn category(&self) -> Category {
        Category::Tagging
    }

    async fn analyze(&self, params: &AnalyzerParams) -> Result<AnalyzerPayload, AnalyzerError> {
        let start_time = Instant::now();
        let window = analysis_window(params)?;

        let mut resources = Vec::new();
        let mut first_error = None;
        let mut scanned_categories = 0usize;
        for category in TAGGED_CATEGORIES {
            match self.scan_category(category, params, &window).await {
                Ok(found) => {
                    scanned_categories += 1;
                    resources.extend(found);
                }
                Err(e) => {
                    warn!(
                        request_id = %params.request_id,
                        category = %category,
                        error = %e,
                        "Skipping category in tag compliance scan"
                    );
                    first_error.get_or_insert(e);
                }
            }
        }
        if scanned_categories == 0
            && let Some(e) = first_error
        {
            return Err(e);
        }

        if resources.is_empty() {
            return Ok(AnalyzerPayload::default());
        }

        let policy = &self.policy;
        let mut details = DetailLog::new(params.depth == AnalysisDepth::Detailed);
        let mut overall = Tally::default();
        let mut by_type: BTreeMap<Category, Tally> = BTreeMap::new();
        let mut missing_counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut untagged_spend = 0.0;
        let mut untagged_resources = 0usize;

        for resource in &resources {
            let violations = self.violations(&resource.descriptor);
            let compliant = violations.is_empty();

            overall.total += 1;
            let tally = by_type.entry(resource.category).or_default();
            tally.total += 1;
            if compliant {
                overall.compliant += 1;
                tally.compliant += 1;
            } else {
                untagged_resources += 1;
                untagged_spend += resource.billed_monthly.unwrap_or_default();
                details.record(
                    &resource.descriptor.resource_id,
                    "missing_tags",
                    violations.join(","),
                );
            }
            for key in violations {
                *missing_counts.entry(key).or_default() += 1;
            }
        }

        let mut recommendations = Vec::new();
        let category = Category::Tagging;

        if untagged_spend > policy.untagged_spend_threshold {
            recommendations.push(Recommendation::new(
                RecommendationType::UntaggedSpend,
                category,
                Priority::High,
                format!(
                    "${:.2} per month runs on {} resources that do not meet the tagging policy and cannot be allocated",
                    untagged_spend, untagged_resources
                ),
            ));
        }

        let compliance = overall.percent();
        if compliance < policy.compliance_target_percent {
            let priority = if compliance < policy.compliance_critical_percent {
                Priority::High
            } else {
                Priority::Medium
            };
            recommendations.push(Recommendation::new(
                RecommendationType::TaggingComplianceRate,
                category,
                priority,
                format!(
                    "{:.1}% of {} resources comply with the tagging policy (target {:.0}%)",
                    compliance, overall.total, policy.compliance_target_percent
                ),
            ));
        }

        for (key, missing) in &missing_counts {
            let share = *missing as f64 * 100.0 / overall.total as f64;
            if share > policy.missing_tag_percent {
                let priority = if policy.critical_tags.iter().any(|t| t == key) {
                    Priority::High
                } else {
                    Priority::Medium
                };
                recommendations.push(Recommendation::new(
                    RecommendationType::TaggingGap,
                    category,
                    priority,
                    format!(
                        "Tag '{}' is missing or invalid on {} of {} resources ({:.1}%)",
                        key, missing, overall.total, share
                    ),
                ));
            }
        }

        for (resource_type, tally) in &by_type {
            if tally.percent() < policy.resource_type_compliance_percent {
                recommendations.push(Recommendation::new(
                    RecommendationType::TaggingComplianceRate,
                    category,
                    Priority::Medium,
                    format!(
                        "Only {:.1}% of {} resources are compliant ({} of {})",
                        tally.percent(),
                        resource_type,
                        tally.compliant,
                        tally.total
                    ),
                ));
            }
        }

        let mut payload =
            AnalyzerPayload::from_recommendations(0.0, overall.total, recommendations);
        payload.metadata.duration_ms = support::elapsed_ms(start_time);
        payload.metadata.additional_info = details.into_entries();
        payload
            .metadata
            .additional_info
            .insert("compliance_percent".to_string(), format!("{:.1}", compliance));
        payload
            .metadata
            .additional_info
            .insert("untagged_monthly_spend".to_string(), format!("{:.2}", untagged_spend));

        info!(
            request_id = %params.request_id,
            category = %category,
            resources = overall.total,
            compliance = compliance,
            recommendations = payload.recommendations.len(),
            "Tag compliance analysis complete"
        );

        Ok(payload)
    }
}
