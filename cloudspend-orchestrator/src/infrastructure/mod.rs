//! Orchestrator infrastructure layer

pub mod analyzer_registry;
pub mod dispatcher;
pub mod query_planner;
pub mod report_sink;

pub use analyzer_registry::AnalyzerRegistry;
pub use dispatcher::{ConcurrentDispatcher, DEFAULT_INVOCATION_TIMEOUT, DEFAULT_MAX_IN_FLIGHT};
pub use query_planner::KeywordQueryPlanner;
pub use report_sink::{FileSystemReportSink, NoopReportSink};
