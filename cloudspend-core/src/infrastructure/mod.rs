//! Infrastructure Layer - provider implementations

pub mod snapshot;

pub use snapshot::{CloudSnapshot, SnapshotError, StaticCloudProvider};
