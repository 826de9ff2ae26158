//! cloudspend - main application library
//!
//! Wires the category analyzers, the orchestrator and configuration together.

mod app;

pub use app::{AppHandle, create_app};
pub use cloudspend_core::{Config, init_tracing};

// Re-export for convenience
pub use cloudspend_analyzers;
pub use cloudspend_core;
pub use cloudspend_orchestrator;
