//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub orchestrator: OrchestratorConfig,
    pub thresholds: ThresholdsConfig,
    pub persistence: PersistenceConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Output format: `json` or `pretty`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

/// Orchestration pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Maximum number of analyzers running at the same time
    pub max_concurrent_analyzers: usize,
    /// Per-analyzer timeout; an analyzer exceeding it is recorded as a timeout failure
    pub analyzer_timeout_seconds: u64,
    /// Number of recommendations kept in the ranked list
    pub max_ranked_recommendations: usize,
    /// Potential monthly savings above which a stakeholder review step is suggested
    pub large_savings_threshold: f64,
    /// Maximum number of next steps quoted in the narrative
    pub max_narrative_steps: usize,
    /// Time window used when a request does not carry one
    pub default_time_window_days: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_analyzers: 5,
            analyzer_timeout_seconds: 60,
            max_ranked_recommendations: 10,
            large_savings_threshold: 1000.0,
            max_narrative_steps: 3,
            default_time_window_days: 30,
        }
    }
}

impl OrchestratorConfig {
    pub fn analyzer_timeout(&self) -> Duration {
        Duration::from_secs(self.analyzer_timeout_seconds)
    }
}

/// Analyzer thresholds, one section per category
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub compute: ComputeThresholds,
    pub database: DatabaseThresholds,
    pub storage: StorageThresholds,
    pub commitments: CommitmentThresholds,
    pub tagging: TaggingPolicyConfig,
}

/// CPU-based right-sizing and idle detection, shared by compute and database
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RightSizingThresholds {
    /// Average CPU (percent) below which right-sizing is recommended
    pub right_size_avg_cpu: f64,
    /// Average CPU (percent) below which right-sizing is high priority
    pub high_priority_avg_cpu: f64,
    /// Peak CPU (percent) below which the resource is considered idle
    pub idle_peak_cpu: f64,
    pub moderate_savings_percent: f64,
    pub high_savings_percent: f64,
    pub idle_savings_percent: f64,
}

impl Default for RightSizingThresholds {
    fn default() -> Self {
        Self {
            right_size_avg_cpu: 20.0,
            high_priority_avg_cpu: 10.0,
            idle_peak_cpu: 5.0,
            moderate_savings_percent: 20.0,
            high_savings_percent: 30.0,
            idle_savings_percent: 100.0,
        }
    }
}

fn default_required_tags() -> Vec<String> {
    vec![
        "Environment".to_string(),
        "Owner".to_string(),
        "Project".to_string(),
    ]
}

/// Compute analyzer thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeThresholds {
    pub right_sizing: RightSizingThresholds,
    /// Tags every instance is expected to carry
    pub required_tags: Vec<String>,
}

impl Default for ComputeThresholds {
    fn default() -> Self {
        Self {
            right_sizing: RightSizingThresholds::default(),
            required_tags: default_required_tags(),
        }
    }
}

/// Managed database analyzer thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseThresholds {
    pub right_sizing: RightSizingThresholds,
    /// Average connection count below which (together with low peak CPU) a database is idle
    pub idle_avg_connections: f64,
    /// Average CPU below which a multi-AZ deployment is flagged for review
    pub multi_az_avg_cpu: f64,
    pub multi_az_savings_percent: f64,
    /// Combined average read+write IOPS below which a burstable class is suggested
    pub burstable_total_iops: f64,
    pub burstable_savings_percent: f64,
    /// Instance class prefix identifying burstable classes
    pub burstable_class_prefix: String,
    pub max_backup_retention_days: u32,
    pub backup_savings_percent: f64,
    pub required_tags: Vec<String>,
}

impl Default for DatabaseThresholds {
    fn default() -> Self {
        Self {
            right_sizing: RightSizingThresholds::default(),
            idle_avg_connections: 1.0,
            multi_az_avg_cpu: 30.0,
            multi_az_savings_percent: 50.0,
            burstable_total_iops: 100.0,
            burstable_savings_percent: 25.0,
            burstable_class_prefix: "db.t".to_string(),
            max_backup_retention_days: 7,
            backup_savings_percent: 5.0,
            required_tags: default_required_tags(),
        }
    }
}

/// Object storage analyzer thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageThresholds {
    /// Minimum size (GB) for a STANDARD-only bucket to get a tiering recommendation
    pub tiering_min_size_gb: f64,
    pub tiering_savings_percent: f64,
    /// Minimum size (GB) for a bucket without lifecycle rules to be flagged
    pub lifecycle_min_size_gb: f64,
    pub lifecycle_high_priority_size_gb: f64,
    pub lifecycle_savings_percent: f64,
    pub lifecycle_high_savings_percent: f64,
    pub versioning_savings_percent: f64,
    pub required_tags: Vec<String>,
}

impl Default for StorageThresholds {
    fn default() -> Self {
        Self {
            tiering_min_size_gb: 1.0,
            tiering_savings_percent: 20.0,
            lifecycle_min_size_gb: 10.0,
            lifecycle_high_priority_size_gb: 100.0,
            lifecycle_savings_percent: 20.0,
            lifecycle_high_savings_percent: 30.0,
            versioning_savings_percent: 15.0,
            required_tags: default_required_tags(),
        }
    }
}

/// Reserved instance and savings plan thresholds (all values are percentages)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitmentThresholds {
    pub ri_utilization_target: f64,
    pub ri_utilization_critical: f64,
    pub sp_utilization_target: f64,
    pub sp_utilization_critical: f64,
    pub ri_coverage_target: f64,
    pub ri_coverage_critical: f64,
    pub sp_coverage_target: f64,
    /// Discount assumed when estimating savings from additional commitments
    pub assumed_commitment_discount_percent: f64,
}

impl Default for CommitmentThresholds {
    fn default() -> Self {
        Self {
            ri_utilization_target: 80.0,
            ri_utilization_critical: 50.0,
            sp_utilization_target: 90.0,
            sp_utilization_critical: 70.0,
            ri_coverage_target: 70.0,
            ri_coverage_critical: 50.0,
            sp_coverage_target: 70.0,
            assumed_commitment_discount_percent: 30.0,
        }
    }
}

/// A tag required by the tagging policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredTag {
    pub key: String,
    /// Accepted values; empty means any non-empty value is accepted
    #[serde(default)]
    pub allowed_values: Vec<String>,
}

impl RequiredTag {
    pub fn any_value(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            allowed_values: Vec::new(),
        }
    }

    pub fn accepts(&self, value: &str) -> bool {
        !value.trim().is_empty()
            && (self.allowed_values.is_empty() || self.allowed_values.iter().any(|v| v == value))
    }
}

/// Cross-category tagging policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingPolicyConfig {
    pub required_tags: Vec<RequiredTag>,
    /// Monthly spend on non-compliant resources above which `untagged_spend` is raised
    pub untagged_spend_threshold: f64,
    pub compliance_target_percent: f64,
    pub compliance_critical_percent: f64,
    /// Share of resources missing a tag above which a tag gap is reported
    pub missing_tag_percent: f64,
    /// Tags whose gaps are always high priority
    pub critical_tags: Vec<String>,
    /// Per resource type compliance below which the type is flagged
    pub resource_type_compliance_percent: f64,
}

impl Default for TaggingPolicyConfig {
    fn default() -> Self {
        Self {
            required_tags: vec![
                RequiredTag {
                    key: "Environment".to_string(),
                    allowed_values: vec![
                        "Production".to_string(),
                        "Staging".to_string(),
                        "Development".to_string(),
                        "Test".to_string(),
                    ],
                },
                RequiredTag::any_value("Owner"),
                RequiredTag::any_value("Project"),
                RequiredTag::any_value("CostCenter"),
                RequiredTag::any_value("Application"),
            ],
            untagged_spend_threshold: 100.0,
            compliance_target_percent: 80.0,
            compliance_critical_percent: 50.0,
            missing_tag_percent: 20.0,
            critical_tags: vec!["Environment".to_string(), "Owner".to_string()],
            resource_type_compliance_percent: 70.0,
        }
    }
}

/// Report persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub enabled: bool,
    /// Directory receiving one JSON file per report
    pub report_dir: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            report_dir: PathBuf::from("reports"),
        }
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.logging.validate()?;
        self.orchestrator.validate()?;
        self.thresholds.validate()?;
        self.persistence.validate()?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        // Local overrides and environment variables last (highest priority)
        builder = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("CLOUDSPEND").separator("__"));

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from a TOML document, applying defaults for missing keys
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigLoadError> {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}
