//! Provider trait definitions

use std::collections::HashMap;

use async_trait::async_trait;

use super::entities::{CostBreakdown, MetricSeries, ResourceDescriptor};
use super::value_objects::{MetricName, ResourceFilter, TimeWindow};
use crate::domain::analyzer::Category;

/// Error returned by metrics, cost and inventory providers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

/// Utilization metrics and billed cost
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Series per resource id. Resources without data are absent from the map
    /// or present with an empty series.
    async fn get_utilization(
        &self,
        resource_ids: &[String],
        metric: MetricName,
        window: &TimeWindow,
    ) -> Result<HashMap<String, MetricSeries>, ProviderError>;

    /// Cost billed for the category over the window
    async fn get_cost(
        &self,
        category: Category,
        window: &TimeWindow,
    ) -> Result<CostBreakdown, ProviderError>;
}

/// Live resource inventory
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    async fn list_resources(
        &self,
        category: Category,
        filter: Option<&ResourceFilter>,
    ) -> Result<Vec<String>, ProviderError>;

    /// Attributes of the given resources; unknown ids are omitted
    async fn describe_resources(
        &self,
        category: Category,
        resource_ids: &[String],
    ) -> Result<Vec<ResourceDescriptor>, ProviderError>;
}
