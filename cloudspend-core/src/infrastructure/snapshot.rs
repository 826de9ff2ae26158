//! Snapshot-backed cloud provider
//!
//! [`StaticCloudProvider`] serves inventory, metrics and cost from a
//! [`CloudSnapshot`] held in memory. Snapshots are plain JSON documents, which
//! makes the provider useful for offline analysis and for tests.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::analyzer::Category;
use crate::domain::provider::{
    CostBreakdown, InventoryProvider, MetricName, MetricSeries, MetricsProvider, ProviderError,
    ResourceDescriptor, ResourceFilter, TimeWindow,
};

/// Point-in-time export of a cloud account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudSnapshot {
    pub resources: BTreeMap<Category, Vec<ResourceDescriptor>>,
    pub metrics: Vec<MetricSeries>,
    /// Cost billed per category over the snapshot window
    pub costs: BTreeMap<Category, CostBreakdown>,
    /// Categories whose provider calls fail with the given message
    pub unavailable: BTreeMap<Category, String>,
}

/// Error loading a snapshot
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Provider implementation over a [`CloudSnapshot`]
#[derive(Debug, Clone)]
pub struct StaticCloudProvider {
    resources: BTreeMap<Category, Vec<ResourceDescriptor>>,
    metrics: HashMap<(String, MetricName), MetricSeries>,
    costs: BTreeMap<Category, CostBreakdown>,
    unavailable: BTreeMap<Category, String>,
}

impl StaticCloudProvider {
    pub fn new(snapshot: CloudSnapshot) -> Self {
        let mut metrics: HashMap<(String, MetricName), MetricSeries> = HashMap::new();
        for series in snapshot.metrics {
            let key = (series.resource_id.clone(), series.metric);
            // Repeated series for the same key are concatenated
            match metrics.get_mut(&key) {
                Some(existing) => existing.samples.extend(series.samples),
                None => {
                    metrics.insert(key, series);
                }
            }
        }

        Self {
            resources: snapshot.resources,
            metrics,
            costs: snapshot.costs,
            unavailable: snapshot.unavailable,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: CloudSnapshot = serde_json::from_str(json)?;
        Ok(Self::new(snapshot))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    fn ensure_available(&self, category: Category) -> Result<(), ProviderError> {
        match self.unavailable.get(&category) {
            Some(message) => Err(ProviderError::Unavailable(format!(
                "{} provider: {}",
                category, message
            ))),
            None => Ok(()),
        }
    }

    /// Category whose inventory lists the resource
    fn category_of(&self, resource_id: &str) -> Option<Category> {
        self.resources
            .iter()
            .find(|(_, resources)| resources.iter().any(|r| r.resource_id == resource_id))
            .map(|(category, _)| *category)
    }

    fn category_resources(&self, category: Category) -> &[ResourceDescriptor] {
        self.resources
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[async_trait]
impl MetricsProvider for StaticCloudProvider {
    async fn get_utilization(
        &self,
        resource_ids: &[String],
        metric: MetricName,
        _window: &TimeWindow,
    ) -> Result<HashMap<String, MetricSeries>, ProviderError> {
        for id in resource_ids {
            if let Some(category) = self.category_of(id) {
                self.ensure_available(category)?;
            }
        }

        let series: HashMap<String, MetricSeries> = resource_ids
            .iter()
            .filter_map(|id| {
                self.metrics
                    .get(&(id.clone(), metric))
                    .map(|s| (id.clone(), s.clone()))
            })
            .collect();

        debug!(
            metric = %metric,
            requested = resource_ids.len(),
            found = series.len(),
            "Served utilization from snapshot"
        );
        Ok(series)
    }

    async fn get_cost(
        &self,
        category: Category,
        _window: &TimeWindow,
    ) -> Result<CostBreakdown, ProviderError> {
        self.ensure_available(category)?;
        Ok(self.costs.get(&category).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl InventoryProvider for StaticCloudProvider {
    async fn list_resources(
        &self,
        category: Category,
        filter: Option<&ResourceFilter>,
    ) -> Result<Vec<String>, ProviderError> {
        self.ensure_available(category)?;
        Ok(self
            .category_resources(category)
            .iter()
            .filter(|r| filter.is_none_or(|f| f.matches(r.state.as_deref())))
            .map(|r| r.resource_id.clone())
            .collect())
    }

    async fn describe_resources(
        &self,
        category: Category,
        resource_ids: &[String],
    ) -> Result<Vec<ResourceDescriptor>, ProviderError> {
        self.ensure_available(category)?;
        let resources = self.category_resources(category);
        Ok(resource_ids
            .iter()
            .filter_map(|id| resources.iter().find(|r| &r.resource_id == id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::num::NonZeroU32;

    const SNAPSHOT: &str = r#"{
        "resources": {
            "compute": [
                {"resource_id": "i-1", "resource_type": "m5.large", "state": "running"},
                {"resource_id": "i-2", "resource_type": "t3.micro", "state": "stopped"}
            ]
        },
        "metrics": [
            {"resource_id": "i-1", "metric": "cpu_utilization",
             "samples": [{"average": 3.0, "maximum": 4.0}]},
            {"resource_id": "i-1", "metric": "cpu_utilization",
             "samples": [{"average": 5.0, "maximum": 6.0}]}
        ],
        "costs": {"compute": {"total": 70.0, "per_resource": {"i-1": 70.0}}},
        "unavailable": {"database": "rds endpoint timed out"}
    }"#;

    fn window() -> TimeWindow {
        TimeWindow::trailing_days(NonZeroU32::new(30).unwrap(), Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn lists_resources_by_state() {
        let provider = StaticCloudProvider::from_json_str(SNAPSHOT).unwrap();
        let running = provider
            .list_resources(Category::Compute, Some(&ResourceFilter::state("running")))
            .await
            .unwrap();
        assert_eq!(running, vec!["i-1".to_string()]);

        let all = provider.list_resources(Category::Compute, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn merges_repeated_series() {
        let provider = StaticCloudProvider::from_json_str(SNAPSHOT).unwrap();
        let series = provider
            .get_utilization(
                &["i-1".to_string(), "i-9".to_string()],
                MetricName::CpuUtilization,
                &window(),
            )
            .await
            .unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series["i-1"].samples.len(), 2);
        assert_eq!(series["i-1"].mean_average(), Some(4.0));
    }

    #[tokio::test]
    async fn unavailable_category_fails() {
        let provider = StaticCloudProvider::from_json_str(SNAPSHOT).unwrap();
        let err = provider
            .list_resources(Category::Database, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(msg) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn unavailable_category_serves_no_metrics() {
        let snapshot = r#"{
            "resources": {"database": [{"resource_id": "db-1", "resource_type": "db.r5.large"}]},
            "metrics": [{"resource_id": "db-1", "metric": "cpu_utilization",
                         "samples": [{"average": 2.0, "maximum": 3.0}]}],
            "unavailable": {"database": "rds endpoint timed out"}
        }"#;
        let provider = StaticCloudProvider::from_json_str(snapshot).unwrap();
        let err = provider
            .get_utilization(&["db-1".to_string()], MetricName::CpuUtilization, &window())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(msg) if msg.contains("database")));
    }

    #[tokio::test]
    async fn missing_category_is_empty() {
        let provider = StaticCloudProvider::from_json_str(SNAPSHOT).unwrap();
        let cost = provider.get_cost(Category::Storage, &window()).await.unwrap();
        assert_eq!(cost.total, 0.0);
        let described = provider
            .describe_resources(Category::Storage, &["b-1".to_string()])
            .await
            .unwrap();
        assert!(described.is_empty());
    }

    #[test]
    fn reports_parse_errors() {
        assert!(matches!(
            StaticCloudProvider::from_json_str("{not json"),
            Err(SnapshotError::Parse(_))
        ));
    }
}
