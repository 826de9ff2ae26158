//! Configuration validation module

use crate::config::{
    CommitmentThresholds, ComputeThresholds, DatabaseThresholds, LoggingConfig,
    OrchestratorConfig, PersistenceConfig, RightSizingThresholds, StorageThresholds,
    TaggingPolicyConfig, ThresholdsConfig,
};
use crate::domain::provider::MAX_WINDOW_DAYS;

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Logging configuration error: {message}")]
    Logging { message: String },

    #[error("Orchestrator configuration error: {message}")]
    Orchestrator { message: String },

    #[error("Threshold configuration error: {message}")]
    Thresholds { message: String },

    #[error("Persistence configuration error: {message}")]
    Persistence { message: String },
}

impl ValidationError {
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    pub fn orchestrator(message: impl Into<String>) -> Self {
        Self::Orchestrator {
            message: message.into(),
        }
    }

    pub fn thresholds(message: impl Into<String>) -> Self {
        Self::Thresholds {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }
}

fn check_percent(name: &str, value: f64) -> Result<(), ValidationError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::thresholds(format!(
            "{} must be within 0-100, got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::thresholds(format!(
            "{} must be a non-negative number, got {}",
            name, value
        )));
    }
    Ok(())
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.level.trim().is_empty() {
            return Err(ValidationError::logging("Log level cannot be empty"));
        }
        match self.format.as_str() {
            "json" | "pretty" => Ok(()),
            other => Err(ValidationError::logging(format!(
                "Log format must be 'json' or 'pretty', got '{}'",
                other
            ))),
        }
    }
}

impl Validate for OrchestratorConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.max_concurrent_analyzers == 0 {
            return Err(ValidationError::orchestrator(
                "max_concurrent_analyzers must be greater than 0",
            ));
        }
        if self.analyzer_timeout_seconds == 0 {
            return Err(ValidationError::orchestrator(
                "analyzer_timeout_seconds must be greater than 0",
            ));
        }
        if self.max_ranked_recommendations == 0 {
            return Err(ValidationError::orchestrator(
                "max_ranked_recommendations must be greater than 0",
            ));
        }
        if self.default_time_window_days == 0 || self.default_time_window_days > MAX_WINDOW_DAYS {
            return Err(ValidationError::orchestrator(format!(
                "default_time_window_days must be between 1 and {}",
                MAX_WINDOW_DAYS
            )));
        }
        if !self.large_savings_threshold.is_finite() || self.large_savings_threshold < 0.0 {
            return Err(ValidationError::orchestrator(
                "large_savings_threshold must be a non-negative number",
            ));
        }
        Ok(())
    }
}

impl Validate for RightSizingThresholds {
    fn validate(&self) -> Result<(), ValidationError> {
        check_percent("right_size_avg_cpu", self.right_size_avg_cpu)?;
        check_percent("high_priority_avg_cpu", self.high_priority_avg_cpu)?;
        check_percent("idle_peak_cpu", self.idle_peak_cpu)?;
        check_percent("moderate_savings_percent", self.moderate_savings_percent)?;
        check_percent("high_savings_percent", self.high_savings_percent)?;
        check_percent("idle_savings_percent", self.idle_savings_percent)?;
        if self.high_priority_avg_cpu > self.right_size_avg_cpu {
            return Err(ValidationError::thresholds(
                "high_priority_avg_cpu cannot exceed right_size_avg_cpu",
            ));
        }
        Ok(())
    }
}

impl Validate for ComputeThresholds {
    fn validate(&self) -> Result<(), ValidationError> {
        self.right_sizing.validate()
    }
}

impl Validate for DatabaseThresholds {
    fn validate(&self) -> Result<(), ValidationError> {
        self.right_sizing.validate()?;
        check_non_negative("idle_avg_connections", self.idle_avg_connections)?;
        check_percent("multi_az_avg_cpu", self.multi_az_avg_cpu)?;
        check_percent("multi_az_savings_percent", self.multi_az_savings_percent)?;
        check_non_negative("burstable_total_iops", self.burstable_total_iops)?;
        check_percent("burstable_savings_percent", self.burstable_savings_percent)?;
        check_percent("backup_savings_percent", self.backup_savings_percent)?;
        if self.burstable_class_prefix.is_empty() {
            return Err(ValidationError::thresholds(
                "burstable_class_prefix cannot be empty",
            ));
        }
        Ok(())
    }
}

impl Validate for StorageThresholds {
    fn validate(&self) -> Result<(), ValidationError> {
        check_non_negative("tiering_min_size_gb", self.tiering_min_size_gb)?;
        check_non_negative("lifecycle_min_size_gb", self.lifecycle_min_size_gb)?;
        check_non_negative(
            "lifecycle_high_priority_size_gb",
            self.lifecycle_high_priority_size_gb,
        )?;
        check_percent("tiering_savings_percent", self.tiering_savings_percent)?;
        check_percent("lifecycle_savings_percent", self.lifecycle_savings_percent)?;
        check_percent(
            "lifecycle_high_savings_percent",
            self.lifecycle_high_savings_percent,
        )?;
        check_percent("versioning_savings_percent", self.versioning_savings_percent)
    }
}

impl Validate for CommitmentThresholds {
    fn validate(&self) -> Result<(), ValidationError> {
        check_percent("ri_utilization_target", self.ri_utilization_target)?;
        check_percent("ri_utilization_critical", self.ri_utilization_critical)?;
        check_percent("sp_utilization_target", self.sp_utilization_target)?;
        check_percent("sp_utilization_critical", self.sp_utilization_critical)?;
        check_percent("ri_coverage_target", self.ri_coverage_target)?;
        check_percent("ri_coverage_critical", self.ri_coverage_critical)?;
        check_percent("sp_coverage_target", self.sp_coverage_target)?;
        check_percent(
            "assumed_commitment_discount_percent",
            self.assumed_commitment_discount_percent,
        )
    }
}

impl Validate for TaggingPolicyConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.required_tags.is_empty() {
            return Err(ValidationError::thresholds(
                "tagging policy must require at least one tag",
            ));
        }
        if let Some(tag) = self.required_tags.iter().find(|t| t.key.trim().is_empty()) {
            return Err(ValidationError::thresholds(format!(
                "tagging policy contains an empty tag key (allowed values: {:?})",
                tag.allowed_values
            )));
        }
        check_non_negative("untagged_spend_threshold", self.untagged_spend_threshold)?;
        check_percent("compliance_target_percent", self.compliance_target_percent)?;
        check_percent("compliance_critical_percent", self.compliance_critical_percent)?;
        check_percent("missing_tag_percent", self.missing_tag_percent)?;
        check_percent(
            "resource_type_compliance_percent",
            self.resource_type_compliance_percent,
        )
    }
}

impl Validate for ThresholdsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        self.compute.validate()?;
        self.database.validate()?;
        self.storage.validate()?;
        self.commitments.validate()?;
        self.tagging.validate()
    }
}

impl Validate for PersistenceConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.enabled && self.report_dir.as_os_str().is_empty() {
            return Err(ValidationError::persistence(
                "report_dir cannot be empty when persistence is enabled",
            ));
        }
        Ok(())
    }
}
