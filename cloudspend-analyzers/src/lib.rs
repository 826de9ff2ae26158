//! Cloudspend Analyzers - per-category utilization analyzers
//!
//! Each analyzer implements [`CategoryAnalyzer`] for one resource category and
//! turns utilization, billing and inventory data into typed recommendations.
//!
//! ## Analyzers
//!
//! - [`ComputeAnalyzer`] - idle and oversized running instances, tag gaps
//! - [`StorageAnalyzer`] - storage tiering, lifecycle rules, versioning, multipart cleanup
//! - [`DatabaseAnalyzer`] - idle/oversized databases, multi-AZ, burstable classes, backups
//! - [`CommitmentsAnalyzer`] - reserved instance and savings plan utilization and coverage
//! - [`TaggingAnalyzer`] - tag policy compliance across compute, storage and database
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cloudspend_analyzers::standard_analyzers;
//!
//! let analyzers = standard_analyzers(metrics, inventory, &config.thresholds);
//! ```

pub mod commitments;
pub mod compute;
pub mod database;
pub mod pricing;
pub mod storage;
pub mod tagging;

mod support;

pub use commitments::CommitmentsAnalyzer;
pub use compute::ComputeAnalyzer;
pub use database::DatabaseAnalyzer;
pub use storage::StorageAnalyzer;
pub use tagging::TaggingAnalyzer;

use std::sync::Arc;

use cloudspend_core::config::ThresholdsConfig;
use cloudspend_core::domain::analyzer::CategoryAnalyzer;
use cloudspend_core::domain::provider::{InventoryProvider, MetricsProvider};

/// One analyzer per category, sharing the given providers
pub fn standard_analyzers(
    metrics: Arc<dyn MetricsProvider>,
    inventory: Arc<dyn InventoryProvider>,
    thresholds: &ThresholdsConfig,
) -> Vec<Arc<dyn CategoryAnalyzer>> {
    vec![
        Arc::new(ComputeAnalyzer::new(
            metrics.clone(),
            inventory.clone(),
            thresholds.compute.clone(),
        )),
        Arc::new(StorageAnalyzer::new(
            metrics.clone(),
            inventory.clone(),
            thresholds.storage.clone(),
        )),
        Arc::new(DatabaseAnalyzer::new(
            metrics.clone(),
            inventory.clone(),
            thresholds.database.clone(),
        )),
        Arc::new(CommitmentsAnalyzer::new(
            metrics.clone(),
            inventory.clone(),
            thresholds.commitments.clone(),
        )),
        Arc::new(TaggingAnalyzer::new(
            metrics,
            inventory,
            thresholds.tagging.clone(),
        )),
    ]
}
