//! Cloudspend Core - Foundation crate for the cloudspend cost analysis engine
//!
//! This crate provides the contracts shared by the analyzers and the orchestrator:
//!
//! # Modules
//!
//! - [`config`] - Strongly-typed configuration with TOML and environment variable support
//! - [`domain`] - Analyzer contracts, recommendations, and cloud provider interfaces
//! - [`infrastructure`] - Snapshot-backed provider implementation
//! - [`logging`] - Structured logging with tracing
//!
//! # Architecture
//!
//! ```text
//! cloudspend-core/
//! ├── domain/
//! │   ├── analyzer/     # CategoryAnalyzer trait, recommendations, worker results
//! │   └── provider/     # Metrics, cost and inventory interfaces
//! ├── infrastructure/
//! │   └── snapshot/     # In-memory provider loaded from JSON
//! └── config/           # Configuration management
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use cloudspend_core::Config;
//!
//! let config = Config::load()?;
//! ```
//!
//! Environment variables use the `CLOUDSPEND__` prefix with double underscore separators:
//!
//! ```bash
//! CLOUDSPEND__ORCHESTRATOR__ANALYZER_TIMEOUT_SECONDS=30
//! CLOUDSPEND__LOGGING__FORMAT=pretty
//! ```

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use config::Config;
pub use logging::init_tracing;
