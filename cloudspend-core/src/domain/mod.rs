//! Domain Layer - analyzer contracts and cloud provider interfaces
//!
//! Everything an analyzer consumes (provider traits, metric series, resource
//! descriptors) and everything it produces (recommendations, worker results).

pub mod analyzer;
pub mod provider;

#[allow(ambiguous_glob_reexports)]
pub use analyzer::*;
#[allow(ambiguous_glob_reexports)]
pub use provider::*;
