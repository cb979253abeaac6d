// cqlexec - run CQL statements and scripts against a Cassandra/ScyllaDB cluster
// Statement pipeline: split -> classify -> dispatch -> format

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::future_not_send)]

// Core types: values, rows, session state, errors
pub mod core;

// Statement splitting and classification
pub mod parser;

// Dispatcher and run driver
pub mod executor;

// Row rendering (JSON, table)
pub mod format;

// Connection abstraction and CQL driver
pub mod network;

// Layered client configuration
pub mod config;

// Re-export commonly used types for convenience
pub use crate::config::{ClientConfig, RunConfig};
pub use crate::core::{CqlError, Row, SessionState, Value};
pub use crate::executor::{Dispatcher, ExecutionResult, RunInput, RunOutcome, Runner, exit_status};
pub use crate::format::{OutputFormat, render_rows};
pub use crate::network::{Connection, Connector, ScyllaConnector};
pub use crate::parser::{StatementKind, classify, split_statements};
