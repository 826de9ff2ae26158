//! Category analyzer plugin interface
//!
//! Every resource category (compute, storage, database, commitments, tagging)
//! is analyzed by one [`CategoryAnalyzer`]. The orchestrator only sees this
//! trait and the typed [`WorkerResult`] it turns each invocation into.

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::*;
pub use traits::*;
pub use value_objects::*;
