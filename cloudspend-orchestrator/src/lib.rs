//! cloudspend orchestrator - turns one cost question into one report
//!
//! The orchestrator plans which category analyzers a query needs, runs them
//! concurrently, and merges their results into a ranked, narrated report.
//!
//! # Architecture
//!
//! ```text
//! cloudspend-orchestrator/
//! ├── application/      # Use case, synthesis, narrative
//! ├── infrastructure/   # Keyword planner, dispatcher, registry, report sinks
//! └── domain/           # Requests, plans, reports, service traits
//! ```
//!
//! # Pipeline
//!
//! ```text
//! AnalysisRequest -> plan -> dispatch (bounded fan-out) -> synthesize -> narrate -> SynthesizedReport
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
