//! Executor module - runs statements against the cluster
//!
//! Structure:
//! - dispatcher: classifies one statement and routes it (USE / query / command)
//! - runner: sequences a single statement or a script, stopping at the first failure
//! - result: per-statement and per-run outcomes

pub mod dispatcher;
pub mod result;
pub mod runner;

pub use dispatcher::Dispatcher;
pub use result::{ExecutionResult, RunOutcome, exit_status};
pub use runner::{RunInput, Runner};
