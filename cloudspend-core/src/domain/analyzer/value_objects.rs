//! Analyzer value objects

use serde::{Deserialize, Serialize};

/// Resource category identifier
///
/// Each category is analyzed independently by its own analyzer. The ordering
/// is used for deterministic tie-breaking when ranking recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Virtual machine instances
    Compute,
    /// Object storage buckets
    Storage,
    /// Managed database instances
    Database,
    /// Reserved instances and savings plans
    Commitments,
    /// Cross-category tag compliance
    Tagging,
}

impl Category {
    /// All known categories, in ranking order
    pub const ALL: [Category; 5] = [
        Category::Compute,
        Category::Storage,
        Category::Database,
        Category::Commitments,
        Category::Tagging,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compute => "compute",
            Self::Storage => "storage",
            Self::Database => "database",
            Self::Commitments => "commitments",
            Self::Tagging => "tagging",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommendation and plan priority, ordered so that `High` is the greatest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// How much detail analyzers should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisDepth {
    Summary,
    #[default]
    Standard,
    Detailed,
}

impl std::fmt::Display for AnalysisDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::Standard => write!(f, "standard"),
            Self::Detailed => write!(f, "detailed"),
        }
    }
}

impl std::str::FromStr for AnalysisDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "standard" => Ok(Self::Standard),
            "detailed" => Ok(Self::Detailed),
            other => Err(format!(
                "unknown analysis depth '{}', expected summary, standard or detailed",
                other
            )),
        }
    }
}

/// Kind of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    RightSizing,
    IdleResource,
    StorageTier,
    LifecyclePolicy,
    VersionManagement,
    MultipartCleanup,
    MultiAzReview,
    BurstableInstance,
    BackupRetention,
    TaggingGap,
    CommitmentUtilization,
    CommitmentCoverage,
    CommitmentPurchase,
    TaggingComplianceRate,
    UntaggedSpend,
}

impl RecommendationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RightSizing => "right_sizing",
            Self::IdleResource => "idle_resource",
            Self::StorageTier => "storage_tier",
            Self::LifecyclePolicy => "lifecycle_policy",
            Self::VersionManagement => "version_management",
            Self::MultipartCleanup => "multipart_cleanup",
            Self::MultiAzReview => "multi_az_review",
            Self::BurstableInstance => "burstable_instance",
            Self::BackupRetention => "backup_retention",
            Self::TaggingGap => "tagging_gap",
            Self::CommitmentUtilization => "commitment_utilization",
            Self::CommitmentCoverage => "commitment_coverage",
            Self::CommitmentPurchase => "commitment_purchase",
            Self::TaggingComplianceRate => "tagging_compliance_rate",
            Self::UntaggedSpend => "untagged_spend",
        }
    }
}

impl std::fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a worker invocation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerFailureKind {
    /// Metrics, cost or inventory provider error
    Provider,
    /// The analyzer exceeded its time budget
    Timeout,
    /// No analyzer is registered for the category
    NotRegistered,
    /// The analyzer panicked
    Panicked,
    /// The invocation parameters were rejected
    InvalidParams,
}

impl std::fmt::Display for WorkerFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider => write!(f, "provider"),
            Self::Timeout => write!(f, "timeout"),
            Self::NotRegistered => write!(f, "not_registered"),
            Self::Panicked => write!(f, "panicked"),
            Self::InvalidParams => write!(f, "invalid_params"),
        }
    }
}
