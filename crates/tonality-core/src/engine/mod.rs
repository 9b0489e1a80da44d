//! The scoring engine: bounded dispatch, policy handling, aggregation.

pub mod aggregate;
pub mod orchestrator;
pub mod pool;

pub use orchestrator::Orchestrator;
pub use pool::{BoundedWorkerPool, FailurePolicy};
