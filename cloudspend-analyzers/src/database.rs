//! Managed database analyzer

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info};

use cloudspend_core::config::DatabaseThresholds;
use cloudspend_core::domain::analyzer::{
    AnalysisDepth, AnalyzerError, AnalyzerParams, AnalyzerPayload, Category, CategoryAnalyzer,
    Priority, Recommendation, RecommendationType,
};
use cloudspend_core::domain::provider::{
    InventoryProvider, MetricName, MetricSeries, MetricsProvider, ResourceDescriptor,
    ResourceFilter, TimeWindow,
};

use crate::pricing;
use crate::support::{
    self, CostAttribution, CpuProfile, DetailLog, SavingsBudget, analysis_window,
};

/// Utilization series fetched for every database instance
struct DatabaseMetrics {
    cpu: HashMap<String, MetricSeries>,
    connections: HashMap<String, MetricSeries>,
    read_iops: HashMap<String, MetricSeries>,
    write_iops: HashMap<String, MetricSeries>,
}

impl DatabaseMetrics {
    fn mean(series: &HashMap<String, MetricSeries>, id: &str) -> Option<f64> {
        series.get(id).and_then(MetricSeries::mean_average)
    }

    fn cpu_profile(&self, id: &str) -> Option<CpuProfile> {
        let series = self.cpu.get(id)?;
        Some(CpuProfile {
            average: series.mean_average()?,
            peak: series.peak()?,
        })
    }

    fn total_iops(&self, id: &str) -> Option<f64> {
        Some(Self::mean(&self.read_iops, id)? + Self::mean(&self.write_iops, id)?)
    }
}

/// Flags idle, oversized and over-provisioned database instances
pub struct DatabaseAnalyzer {
    metrics: Arc<dyn MetricsProvider>,
    inventory: Arc<dyn InventoryProvider>,
    thresholds: DatabaseThresholds,
}

impl DatabaseAnalyzer {
    pub fn new(
        metrics: Arc<dyn MetricsProvider>,
        inventory: Arc<dyn InventoryProvider>,
        thresholds: DatabaseThresholds,
    ) -> Self {
        Self {
            metrics,
            inventory,
            thresholds,
        }
    }

    async fn fetch_metrics(
        &self,
        ids: &[String],
        window: &TimeWindow,
    ) -> Result<DatabaseMetrics, AnalyzerError> {
        Ok(DatabaseMetrics {
            cpu: self
                .metrics
                .get_utilization(ids, MetricName::CpuUtilization, window)
                .await?,
            connections: self
                .metrics
                .get_utilization(ids, MetricName::DatabaseConnections, window)
                .await?,
            read_iops: self
                .metrics
                .get_utilization(ids, MetricName::ReadIops, window)
                .await?,
            write_iops: self
                .metrics
                .get_utilization(ids, MetricName::WriteIops, window)
                .await?,
        })
    }

    fn is_burstable(&self, instance_class: &str) -> bool {
        instance_class.starts_with(&self.thresholds.burstable_class_prefix)
    }

    /// Savings-bearing rules beyond right-sizing for a database that is in use
    fn provisioning_rules(
        &self,
        descriptor: Option<&ResourceDescriptor>,
        db_id: &str,
        metrics: &DatabaseMetrics,
        budget: &mut SavingsBudget,
        recommendations: &mut Vec<Recommendation>,
    ) {
        let category = Category::Database;
        let instance_class = descriptor.and_then(|d| d.resource_type.as_deref());

        if let Some(descriptor) = descriptor
            && descriptor.multi_az
            && let Some(avg_cpu) = DatabaseMetrics::mean(&metrics.cpu, db_id)
            && avg_cpu < self.thresholds.multi_az_avg_cpu
        {
            recommendations.push(
                Recommendation::for_resource(
                    RecommendationType::MultiAzReview,
                    db_id,
                    category,
                    Priority::Medium,
                    format!(
                        "Multi-AZ deployment averaging {:.1}% CPU; confirm the workload needs a standby replica",
                        avg_cpu
                    ),
                )
                .with_savings(budget.claim(self.thresholds.multi_az_savings_percent)),
            );
        }

        if let Some(class) = instance_class
            && !self.is_burstable(class)
            && let Some(iops) = metrics.total_iops(db_id)
            && iops < self.thresholds.burstable_total_iops
        {
            recommendations.push(
                Recommendation::for_resource(
                    RecommendationType::BurstableInstance,
                    db_id,
                    category,
                    Priority::Medium,
                    format!(
                        "Average read+write IOPS is {:.0}; a burstable class could replace {}",
                        iops, class
                    ),
                )
                .with_savings(budget.claim(self.thresholds.burstable_savings_percent)),
            );
        }

        if let Some(retention) = descriptor.and_then(|d| d.backup_retention_days)
            && retention > self.thresholds.max_backup_retention_days
        {
            recommendations.push(
                Recommendation::for_resource(
                    RecommendationType::BackupRetention,
                    db_id,
                    category,
                    Priority::Low,
                    format!(
                        "Automated backups are kept for {} days; {} days is usually sufficient",
                        retention, self.thresholds.max_backup_retention_days
                    ),
                )
                .with_savings(budget.claim(self.thresholds.backup_savings_percent)),
            );
        }
    }
}

#[async_trait]
impl CategoryAnalyzer for DatabaseAnalyzer {
    fn category(&self) -> Category {
        Category::Database
    }

    async fn analyze(&self, params: &AnalyzerParams) -> Result<AnalyzerPayload, AnalyzerError> {
        let start_time = Instant::now();
        let category = Category::Database;
        let window = analysis_window(params)?;

        let db_ids = support::resolve_resource_ids(
            self.inventory.as_ref(),
            category,
            params,
            Some(&ResourceFilter::state("available")),
        )
        .await?;

        if db_ids.is_empty() {
            debug!(request_id = %params.request_id, "No available database instances to analyze");
            return Ok(AnalyzerPayload::default());
        }

        let descriptors = support::describe_by_id(self.inventory.as_ref(), category, &db_ids).await?;
        let metrics = self.fetch_metrics(&db_ids, &window).await?;
        let cost = CostAttribution::new(
            self.metrics.get_cost(category, &window).await?,
            &window,
            db_ids.len(),
        );

        let rules = &self.thresholds.right_sizing;
        let mut details = DetailLog::new(params.depth == AnalysisDepth::Detailed);
        let mut recommendations = Vec::new();
        let mut current_monthly_cost = 0.0;

        for db_id in &db_ids {
            let descriptor = descriptors.get(db_id);
            let instance_class = descriptor.and_then(|d| d.resource_type.as_deref());
            let monthly_cost =
                cost.monthly_cost(db_id, || pricing::db_instance_monthly_cost(instance_class));
            current_monthly_cost += monthly_cost;
            details.record(db_id, "monthly_cost", format!("{:.2}", monthly_cost));

            let mut budget = SavingsBudget::new(monthly_cost);
            let cpu = metrics.cpu_profile(db_id);
            let connections = DatabaseMetrics::mean(&metrics.connections, db_id);

            if let Some(cpu) = cpu {
                details.record(db_id, "avg_cpu", format!("{:.1}", cpu.average));
                details.record(db_id, "peak_cpu", format!("{:.1}", cpu.peak));
            } else {
                support::log_skipped_metrics(category, db_id, "cpu_utilization");
            }
            if let Some(connections) = connections {
                details.record(db_id, "avg_connections", format!("{:.1}", connections));
            }

            let idle = match (cpu, connections) {
                (Some(cpu), Some(connections)) => {
                    connections < self.thresholds.idle_avg_connections
                        && cpu.peak < rules.idle_peak_cpu
                }
                _ => false,
            };

            if idle {
                let observation = format!(
                    "Averaged {:.1} connections with peak CPU {:.1}% over {} days",
                    connections.unwrap_or_default(),
                    cpu.map(|c| c.peak).unwrap_or_default(),
                    window.days()
                );
                recommendations.push(support::idle_recommendation(
                    category,
                    db_id,
                    rules,
                    &mut budget,
                    observation,
                ));
            } else {
                if let Some(cpu) = cpu
                    && let Some(rec) = support::right_sizing_recommendation(
                        category,
                        db_id,
                        instance_class,
                        cpu,
                        rules,
                        &mut budget,
                    )
                {
                    recommendations.push(rec);
                }
                self.provisioning_rules(
                    descriptor,
                    db_id,
                    &metrics,
                    &mut budget,
                    &mut recommendations,
                );
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

        let mut payload =
            AnalyzerPayload::from_recommendations(current_monthly_cost, db_ids.len(), recommendations);
        payload.metadata.duration_ms = support::elapsed_ms(start_time);
        payload.metadata.additional_info = details.into_entries();

        info!(
            request_id = %params.request_id,
            category = %category,
            databases = db_ids.len(),
            recommendations = payload.recommendations.len(),
            "Database analysis complete"
        );

        Ok(payload)
    }
}
