//! Provider entities

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::{CommitmentKind, MetricName};

/// One aggregated datapoint of a metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub average: f64,
    pub maximum: f64,
}

impl MetricSample {
    pub fn new(average: f64, maximum: f64) -> Self {
        Self {
            timestamp: None,
            average,
            maximum,
        }
    }
}

/// Datapoints of one metric for one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub resource_id: String,
    pub metric: MetricName,
    #[serde(default)]
    pub samples: Vec<MetricSample>,
}

impl MetricSeries {
    pub fn new(resource_id: impl Into<String>, metric: MetricName, samples: Vec<MetricSample>) -> Self {
        Self {
            resource_id: resource_id.into(),
            metric,
            samples,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mean of the sample averages; `None` without samples
    pub fn mean_average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().map(|s| s.average).sum();
        Some(sum / self.samples.len() as f64)
    }

    /// Highest sample maximum; `None` without samples
    pub fn peak(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.maximum).reduce(f64::max)
    }

    /// Average of the most recent sample (by timestamp, else by position)
    pub fn latest(&self) -> Option<f64> {
        let timestamped = self
            .samples
            .iter()
            .filter_map(|s| s.timestamp.map(|t| (t, s.average)))
            .max_by_key(|(t, _)| *t);
        match timestamped {
            Some((_, value)) => Some(value),
            None => self.samples.last().map(|s| s.average),
        }
    }
}

/// Billed cost of a category over a window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub total: f64,
    /// Cost per resource id; may be incomplete or empty
    #[serde(default)]
    pub per_resource: HashMap<String, f64>,
}

/// Storage attributes of a bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageProfile {
    pub size_gb: f64,
    /// Size in GB per storage class (e.g. `STANDARD`, `GLACIER`)
    pub storage_classes: BTreeMap<String, f64>,
    pub lifecycle_policy: bool,
    pub versioning_enabled: bool,
    pub incomplete_multipart_uploads: u32,
}

impl StorageProfile {
    /// Whether every byte sits in the given class (a bucket with no class data is STANDARD)
    pub fn only_in_class(&self, class: &str) -> bool {
        self.storage_classes.is_empty()
            || self
                .storage_classes
                .iter()
                .all(|(name, size)| name.eq_ignore_ascii_case(class) || *size <= 0.0)
    }
}

/// Descriptive attributes of one resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceDescriptor {
    pub resource_id: String,
    /// Instance type, DB class or commitment instance family
    pub resource_type: Option<String>,
    pub state: Option<String>,
    pub tags: BTreeMap<String, String>,
    pub multi_az: bool,
    pub backup_retention_days: Option<u32>,
    pub storage: Option<StorageProfile>,
    pub commitment: Option<CommitmentKind>,
}

impl ResourceDescriptor {
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            ..Self::default()
        }
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.get(key).is_some_and(|v| !v.trim().is_empty())
    }
}
