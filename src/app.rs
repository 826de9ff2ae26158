//! Application setup and wiring

use std::num::NonZeroU32;
use std::sync::Arc;

use cloudspend_analyzers::standard_analyzers;
use cloudspend_core::Config;
use cloudspend_core::domain::provider::{InventoryProvider, MetricsProvider};
use cloudspend_orchestrator::application::{
    NarrativeGenerator, ResultSynthesizer, RunAnalysisUseCase, SynthesisOptions,
};
use cloudspend_orchestrator::domain::entities::{AnalysisRequest, DEFAULT_TIME_WINDOW_DAYS};
use cloudspend_orchestrator::infrastructure::{
    AnalyzerRegistry, ConcurrentDispatcher, FileSystemReportSink, KeywordQueryPlanner,
};

/// Fully wired analysis pipeline
pub struct AppHandle {
    pub use_case: RunAnalysisUseCase,
    /// Window applied to requests that do not choose one
    pub default_time_window_days: NonZeroU32,
}

impl AppHandle {
    /// Request for `query` using the configured default window
    pub fn request(&self, query: impl Into<String>) -> AnalysisRequest {
        AnalysisRequest::new(query).with_time_window_days(self.default_time_window_days)
    }
}

/// Build the pipeline from configuration and the cloud data providers
pub fn create_app(
    config: &Config,
    metrics: Arc<dyn MetricsProvider>,
    inventory: Arc<dyn InventoryProvider>,
) -> AppHandle {
    let registry: AnalyzerRegistry =
        standard_analyzers(metrics, inventory, &config.thresholds)
            .into_iter()
            .collect();
    tracing::info!(
        categories = ?registry.registered_categories(),
        "Registered category analyzers"
    );

    let orchestrator = &config.orchestrator;
    let dispatcher = ConcurrentDispatcher::new(Arc::new(registry))
        .with_max_in_flight(orchestrator.max_concurrent_analyzers)
        .with_invocation_timeout(orchestrator.analyzer_timeout());

    let synthesizer = ResultSynthesizer::new(SynthesisOptions {
        max_ranked: orchestrator.max_ranked_recommendations,
        large_savings_threshold: orchestrator.large_savings_threshold,
    });

    let mut use_case = RunAnalysisUseCase::new(
        Arc::new(KeywordQueryPlanner::new()),
        Arc::new(dispatcher),
    )
    .with_synthesizer(synthesizer)
    .with_narrator(NarrativeGenerator::new(orchestrator.max_narrative_steps));

    if config.persistence.enabled {
        tracing::info!(
            report_dir = %config.persistence.report_dir.display(),
            "Report persistence enabled"
        );
        use_case = use_case.with_report_sink(Arc::new(FileSystemReportSink::new(
            config.persistence.report_dir.clone(),
        )));
    }

    AppHandle {
        use_case,
        default_time_window_days: NonZeroU32::new(orchestrator.default_time_window_days)
            .unwrap_or(DEFAULT_TIME_WINDOW_DAYS),
    }
}
