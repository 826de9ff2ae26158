//! Provider value objects

use std::num::NonZeroU32;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Days used to normalise costs to a monthly figure
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Longest history a provider query may cover
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// Closed time range a provider query covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// The `days` days ending at `end`
    ///
    /// `None` when `days` exceeds [`MAX_WINDOW_DAYS`] or the start would fall
    /// outside the representable date range.
    pub fn trailing_days(days: NonZeroU32, end: DateTime<Utc>) -> Option<Self> {
        if days.get() > MAX_WINDOW_DAYS {
            return None;
        }
        let start = end.checked_sub_signed(Duration::days(i64::from(days.get())))?;
        Some(Self { start, end })
    }

    /// Window length in whole days, at least one
    pub fn days(&self) -> u32 {
        let days = (self.end - self.start).num_days();
        u32::try_from(days).unwrap_or(0).max(1)
    }

    /// Factor converting a cost billed over this window into a 30-day cost
    pub fn monthly_factor(&self) -> f64 {
        DAYS_PER_MONTH / f64::from(self.days())
    }
}

/// Utilization metrics analyzers ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    /// Percent
    CpuUtilization,
    DatabaseConnections,
    ReadIops,
    WriteIops,
    BucketSizeBytes,
    /// Percent of a commitment actually used
    CommitmentUtilization,
    /// Percent of eligible usage covered by a commitment
    CommitmentCoverage,
}

impl std::fmt::Display for MetricName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CpuUtilization => "cpu_utilization",
            Self::DatabaseConnections => "database_connections",
            Self::ReadIops => "read_iops",
            Self::WriteIops => "write_iops",
            Self::BucketSizeBytes => "bucket_size_bytes",
            Self::CommitmentUtilization => "commitment_utilization",
            Self::CommitmentCoverage => "commitment_coverage",
        };
        f.write_str(name)
    }
}

/// Optional filter applied when listing resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFilter {
    /// Only return resources in this lifecycle state (e.g. `running`, `available`)
    pub state: Option<String>,
}

impl ResourceFilter {
    pub fn state(state: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
        }
    }

    pub fn matches(&self, state: Option<&str>) -> bool {
        match &self.state {
            None => true,
            Some(wanted) => state.is_some_and(|s| s.eq_ignore_ascii_case(wanted)),
        }
    }
}

/// Commitment instrument kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentKind {
    ReservedInstance,
    SavingsPlan,
}

impl std::fmt::Display for CommitmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReservedInstance => write!(f, "reserved instance"),
            Self::SavingsPlan => write!(f, "savings plan"),
        }
    }
}
