//! Orchestrator domain layer

pub mod entities;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use services::*;
pub use value_objects::*;

// Re-export analyzer types from core for convenience
pub use cloudspend_core::domain::analyzer::{
    AnalyzerParams, AnalyzerPayload, CategoryAnalyzer, CategorySummary, Recommendation,
    RecommendationType, WorkerFailure, WorkerFailureKind, WorkerOutcome, WorkerResult,
};
