//! Orchestrator use cases

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use futures::FutureExt;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::narrative::NarrativeGenerator;
use crate::application::synthesis::ResultSynthesizer;
use crate::domain::entities::{AnalysisRequest, SynthesizedReport};
use crate::domain::services::{Dispatcher, QueryPlanner, ReportSink};
use crate::infrastructure::dispatcher::panic_message;

/// Use case for answering one cost question end to end
///
/// Plan, dispatch, synthesize, narrate. Never fails: analyzer failures end up
/// in the report's failure list, and a panic anywhere in the pipeline yields a
/// degraded report with `error` set.
pub struct RunAnalysisUseCase {
    planner: Arc<dyn QueryPlanner>,
    dispatcher: Arc<dyn Dispatcher>,
    synthesizer: ResultSynthesizer,
    narrator: NarrativeGenerator,
    report_sink: Option<Arc<dyn ReportSink>>,
    pending_stores: Mutex<JoinSet<()>>,
}

impl RunAnalysisUseCase {
    pub fn new(planner: Arc<dyn QueryPlanner>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            planner,
            dispatcher,
            synthesizer: ResultSynthesizer::default(),
            narrator: NarrativeGenerator::default(),
            report_sink: None,
            pending_stores: Mutex::new(JoinSet::new()),
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: ResultSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn with_narrator(mut self, narrator: NarrativeGenerator) -> Self {
        self.narrator = narrator;
        self
    }

    pub fn with_report_sink(mut self, report_sink: Arc<dyn ReportSink>) -> Self {
        self.report_sink = Some(report_sink);
        self
    }

    pub async fn execute(&self, request: &AnalysisRequest) -> SynthesizedReport {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        info!(request_id = %request_id, query = %request.query, "Starting cost analysis");

        let report = match AssertUnwindSafe(self.run_pipeline(request_id, request))
            .catch_unwind()
            .await
        {
            Ok(report) => report,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(request_id = %request_id, panic = %message, "Analysis pipeline panicked");
                SynthesizedReport::degraded(request, format!("analysis pipeline failed: {}", message))
            }
        };

        info!(
            request_id = %request_id,
            categories = report.categories_consulted.len(),
            failures = report.failures.len(),
            recommendations = report.total_recommendations,
            duration_ms = started.elapsed().as_millis() as u64,
            "Cost analysis finished"
        );

        self.store_in_background(request_id, &report);
        report
    }

    async fn run_pipeline(&self, request_id: Uuid, request: &AnalysisRequest) -> SynthesizedReport {
        let plan = self.planner.plan(request);
        info!(
            request_id = %request_id,
            scope = %plan.scope,
            priority = %plan.priority,
            depth = %plan.depth,
            categories = plan.target_categories.len(),
            "Analysis plan ready"
        );

        let results = self
            .dispatcher
            .dispatch(plan.invocations(request_id, request))
            .await;

        let report = self.synthesizer.synthesize(&results, request);
        let narrative = self.narrator.narrate(&report);
        report.with_narrative(narrative)
    }

    fn store_in_background(&self, request_id: Uuid, report: &SynthesizedReport) {
        let Some(sink) = self.report_sink.clone() else {
            return;
        };
        let report = report.clone();
        let store = async move {
            if let Err(e) = sink.store(&report).await {
                warn!(request_id = %request_id, error = %e, "Failed to store analysis report");
            }
        };
        match self.pending_stores.lock() {
            Ok(mut pending) => {
                while pending.try_join_next().is_some() {}
                pending.spawn(store);
            }
            Err(_) => {
                tokio::spawn(store);
            }
        }
    }

    /// Wait for reports still being stored in the background
    ///
    /// Short-lived callers use this before exiting; long-running ones can
    /// ignore it.
    pub async fn flush_reports(&self) {
        let mut pending = match self.pending_stores.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(_) => return,
        };
        while let Some(joined) = pending.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Report store task failed");
            }
        }
    }
}
