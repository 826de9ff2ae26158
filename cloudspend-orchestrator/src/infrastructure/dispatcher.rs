//! Bounded concurrent dispatcher
//!
//! Every invocation runs on its own task. A semaphore caps how many analyzers
//! are in flight, and the dispatcher waits for all of them before returning.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::domain::entities::WorkerInvocation;
use crate::domain::services::Dispatcher;
use crate::domain::value_objects::Category;
use crate::domain::{WorkerFailure, WorkerFailureKind, WorkerResult};
use crate::infrastructure::analyzer_registry::AnalyzerRegistry;

/// Default number of analyzers allowed to run at once
pub const DEFAULT_MAX_IN_FLIGHT: usize = 5;
/// Default per-invocation time budget
pub const DEFAULT_INVOCATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Dispatcher that fans invocations out over the tokio runtime
pub struct ConcurrentDispatcher {
    registry: Arc<AnalyzerRegistry>,
    max_in_flight: usize,
    invocation_timeout: Duration,
}

impl ConcurrentDispatcher {
    pub fn new(registry: Arc<AnalyzerRegistry>) -> Self {
        Self {
            registry,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            invocation_timeout: DEFAULT_INVOCATION_TIMEOUT,
        }
    }

    /// Zero is treated as one
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn with_invocation_timeout(mut self, timeout: Duration) -> Self {
        self.invocation_timeout = timeout;
        self
    }
}

/// Run one invocation to completion, converting every way it can go wrong
/// into a failure result
async fn run_invocation(
    registry: Arc<AnalyzerRegistry>,
    invocation: WorkerInvocation,
    invocation_timeout: Duration,
) -> WorkerResult {
    let category = invocation.category;
    let Some(analyzer) = registry.get_analyzer(category) else {
        warn!(category = %category, "No analyzer registered for category");
        return WorkerResult::failure(
            category,
            WorkerFailure::new(
                WorkerFailureKind::NotRegistered,
                format!("no analyzer registered for category {}", category),
            ),
        );
    };

    let started = Instant::now();
    let analysis = AssertUnwindSafe(analyzer.analyze(&invocation.params)).catch_unwind();

    match tokio::time::timeout(invocation_timeout, analysis).await {
        Ok(Ok(Ok(payload))) => {
            debug!(
                category = %category,
                recommendations = payload.recommendations.len(),
                duration_ms = started.elapsed().as_millis() as u64,
                "Analyzer completed"
            );
            WorkerResult::success(category, payload)
        }
        Ok(Ok(Err(e))) => {
            error!(category = %category, error = %e, "Analyzer failed");
            WorkerResult::failure(category, e.to_failure())
        }
        Ok(Err(panic)) => {
            let message = panic_message(panic.as_ref());
            error!(category = %category, panic = %message, "Analyzer panicked");
            WorkerResult::failure(
                category,
                WorkerFailure::new(WorkerFailureKind::Panicked, message),
            )
        }
        Err(_) => {
            error!(
                category = %category,
                timeout_secs = invocation_timeout.as_secs_f64(),
                "Analyzer timed out"
            );
            WorkerResult::failure(
                category,
                WorkerFailure::new(
                    WorkerFailureKind::Timeout,
                    format!(
                        "analyzer did not finish within {:.1}s",
                        invocation_timeout.as_secs_f64()
                    ),
                ),
            )
        }
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "analyzer panicked".to_string()
    }
}

fn lost_result(category: Category, reason: impl Into<String>) -> WorkerResult {
    WorkerResult::failure(
        category,
        WorkerFailure::new(WorkerFailureKind::Panicked, reason),
    )
}

#[async_trait]
impl Dispatcher for ConcurrentDispatcher {
    async fn dispatch(&self, invocations: Vec<WorkerInvocation>) -> Vec<WorkerResult> {
        let categories: Vec<Category> = invocations.iter().map(|i| i.category).collect();
        let mut slots: Vec<Option<WorkerResult>> = vec![None; invocations.len()];

        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let mut join_set: JoinSet<(usize, WorkerResult)> = JoinSet::new();

        for (index, invocation) in invocations.into_iter().enumerate() {
            let permit = semaphore.clone();
            let registry = self.registry.clone();
            let invocation_timeout = self.invocation_timeout;

            join_set.spawn(async move {
                let category = invocation.category;
                let _permit = match permit.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return (
                            index,
                            lost_result(category, format!("failed to acquire semaphore: {}", e)),
                        );
                    }
                };
                (
                    index,
                    run_invocation(registry, invocation, invocation_timeout).await,
                )
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => error!(error = %e, "Dispatcher task failed to join"),
            }
        }

        slots
            .into_iter()
            .zip(categories)
            .map(|(slot, category)| {
                slot.unwrap_or_else(|| lost_result(category, "analyzer task was lost"))
            })
            .collect()
    }
}
