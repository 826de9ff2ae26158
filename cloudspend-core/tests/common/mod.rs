//! Common test utilities for cloudspend-core

pub mod fixtures;

pub use fixtures::*;
