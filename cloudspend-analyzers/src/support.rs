//! Helpers shared by the category analyzers

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use chrono::Utc;
use tracing::debug;

use cloudspend_core::config::RightSizingThresholds;
use cloudspend_core::domain::analyzer::{
    AnalyzerError, AnalyzerParams, Category, Priority, Recommendation, RecommendationType,
};
use cloudspend_core::domain::provider::{
    CostBreakdown, InventoryProvider, MAX_WINDOW_DAYS, ResourceDescriptor, ResourceFilter,
    TimeWindow,
};

/// Window ending now covering the requested number of days
pub(crate) fn analysis_window(params: &AnalyzerParams) -> Result<TimeWindow, AnalyzerError> {
    TimeWindow::trailing_days(params.time_window_days, Utc::now()).ok_or_else(|| {
        AnalyzerError::InvalidParams(format!(
            "time window of {} days exceeds the maximum of {} days",
            params.time_window_days, MAX_WINDOW_DAYS
        ))
    })
}

pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Explicit ids from the invocation, else the inventory listing
pub(crate) async fn resolve_resource_ids(
    inventory: &dyn InventoryProvider,
    category: Category,
    params: &AnalyzerParams,
    filter: Option<&ResourceFilter>,
) -> Result<Vec<String>, AnalyzerError> {
    if params.resource_ids.is_empty() {
        return Ok(inventory.list_resources(category, filter).await?);
    }

    if params.resource_ids.iter().any(|id| id.trim().is_empty()) {
        return Err(AnalyzerError::InvalidParams(
            "resource ids cannot be empty".to_string(),
        ));
    }

    let mut ids = Vec::with_capacity(params.resource_ids.len());
    for id in &params.resource_ids {
        if !ids.contains(id) {
            ids.push(id.clone());
        }
    }
    Ok(ids)
}

/// Descriptors keyed by resource id
pub(crate) async fn describe_by_id(
    inventory: &dyn InventoryProvider,
    category: Category,
    resource_ids: &[String],
) -> Result<HashMap<String, ResourceDescriptor>, AnalyzerError> {
    let described = inventory.describe_resources(category, resource_ids).await?;
    Ok(described
        .into_iter()
        .map(|d| (d.resource_id.clone(), d))
        .collect())
}

/// Monthly cost attribution for the resources of one category
///
/// Attributed billing is normalised to 30 days. When the provider returns a
/// total without a per-resource breakdown, the total is spread evenly. A
/// resource with no billing falls back to the caller's price table estimate.
#[derive(Debug, Clone)]
pub(crate) struct CostAttribution {
    per_resource: HashMap<String, f64>,
    monthly_factor: f64,
    even_share: Option<f64>,
}

impl CostAttribution {
    pub(crate) fn new(breakdown: CostBreakdown, window: &TimeWindow, resource_count: usize) -> Self {
        let monthly_factor = window.monthly_factor();
        let even_share = (breakdown.per_resource.is_empty()
            && breakdown.total > 0.0
            && resource_count > 0)
            .then(|| breakdown.total * monthly_factor / resource_count as f64);

        Self {
            per_resource: breakdown.per_resource,
            monthly_factor,
            even_share,
        }
    }

    /// Billed monthly cost only, without any estimate
    pub(crate) fn billed(&self, resource_id: &str) -> Option<f64> {
        match self.per_resource.get(resource_id) {
            Some(cost) if *cost > 0.0 => Some(cost * self.monthly_factor),
            _ => self.even_share,
        }
    }

    pub(crate) fn monthly_cost(&self, resource_id: &str, fallback: impl FnOnce() -> f64) -> f64 {
        self.billed(resource_id).unwrap_or_else(fallback)
    }
}

/// Caps the savings claimed for one resource at its monthly cost
#[derive(Debug, Clone, Copy)]
pub(crate) struct SavingsBudget {
    monthly_cost: f64,
    remaining: f64,
}

impl SavingsBudget {
    pub(crate) fn new(monthly_cost: f64) -> Self {
        let monthly_cost = monthly_cost.max(0.0);
        Self {
            monthly_cost,
            remaining: monthly_cost,
        }
    }

    pub(crate) fn claim(&mut self, percent: f64) -> f64 {
        let wanted = self.monthly_cost * percent / 100.0;
        if !wanted.is_finite() || wanted <= 0.0 {
            return 0.0;
        }
        let savings = wanted.min(self.remaining);
        self.remaining -= savings;
        savings
    }
}

/// Average and peak of a utilization series
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CpuProfile {
    pub average: f64,
    pub peak: f64,
}

pub(crate) fn idle_recommendation(
    category: Category,
    resource_id: &str,
    thresholds: &RightSizingThresholds,
    budget: &mut SavingsBudget,
    observation: String,
) -> Recommendation {
    Recommendation::for_resource(
        RecommendationType::IdleResource,
        resource_id,
        category,
        Priority::High,
        format!("{}; consider stopping or terminating it", observation),
    )
    .with_savings(budget.claim(thresholds.idle_savings_percent))
}

/// Right-sizing for an under-used resource, if its average CPU is low enough
pub(crate) fn right_sizing_recommendation(
    category: Category,
    resource_id: &str,
    resource_type: Option<&str>,
    cpu: CpuProfile,
    thresholds: &RightSizingThresholds,
    budget: &mut SavingsBudget,
) -> Option<Recommendation> {
    if cpu.average >= thresholds.right_size_avg_cpu {
        return None;
    }

    let (priority, percent) = if cpu.average < thresholds.high_priority_avg_cpu {
        (Priority::High, thresholds.high_savings_percent)
    } else {
        (Priority::Medium, thresholds.moderate_savings_percent)
    };

    let current = resource_type.unwrap_or("current size");
    Some(
        Recommendation::for_resource(
            RecommendationType::RightSizing,
            resource_id,
            category,
            priority,
            format!(
                "Average CPU is {:.1}% (peak {:.1}%), below the {:.0}% target; downsize from {}",
                cpu.average, cpu.peak, thresholds.right_size_avg_cpu, current
            ),
        )
        .with_savings(budget.claim(percent)),
    )
}

/// Required tags absent (or blank) on the resource
pub(crate) fn missing_tags(resource: &ResourceDescriptor, required: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|tag| !resource.has_tag(tag))
        .cloned()
        .collect()
}

pub(crate) fn tagging_gap_recommendation(
    category: Category,
    resource: &ResourceDescriptor,
    required: &[String],
) -> Option<Recommendation> {
    let missing = missing_tags(resource, required);
    if missing.is_empty() {
        return None;
    }
    Some(Recommendation::for_resource(
        RecommendationType::TaggingGap,
        &resource.resource_id,
        category,
        Priority::Low,
        format!("Missing required tags: {}", missing.join(", ")),
    ))
}

/// Records per-resource observations at `detailed` depth
#[derive(Debug, Default)]
pub(crate) struct DetailLog {
    enabled: bool,
    entries: BTreeMap<String, String>,
}

impl DetailLog {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn record(&mut self, resource_id: &str, field: &str, value: impl std::fmt::Display) {
        if self.enabled {
            self.entries
                .insert(format!("{}.{}", resource_id, field), value.to_string());
        }
    }

    pub(crate) fn into_entries(self) -> BTreeMap<String, String> {
        self.entries
    }
}

pub(crate) fn log_skipped_metrics(category: Category, resource_id: &str, metric: &str) {
    debug!(
        category = %category,
        resource_id = %resource_id,
        metric = %metric,
        "No datapoints; skipping utilization rules for resource"
    );
}
