//! Orchestrator value objects

use serde::{Deserialize, Serialize};

pub use cloudspend_core::domain::analyzer::{AnalysisDepth, Category, Priority};

/// Whether the plan was narrowed by the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisScope {
    /// Only categories named in the query
    Targeted,
    /// No category matched; every known category is analyzed
    Comprehensive,
}

impl std::fmt::Display for AnalysisScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Targeted => write!(f, "targeted"),
            Self::Comprehensive => write!(f, "comprehensive"),
        }
    }
}
