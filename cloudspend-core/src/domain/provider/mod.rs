//! Cloud provider interfaces
//!
//! Analyzers read utilization, billed cost and inventory only through the
//! traits defined here, so real SDK clients and in-memory fakes are
//! interchangeable.

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::*;
pub use traits::*;
pub use value_objects::*;
