use crate::core::{CqlError, Row};

/// Outcome of one successfully dispatched statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    /// A `USE` statement switched the session's keyspace (client-side only).
    Switched(String),
    /// A query returned these rows; possibly none.
    Rows(Vec<Row>),
    /// A command completed without rows.
    Ack,
}

/// How a whole run ended when no statement failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Neither a statement nor a script with statements was supplied.
    NothingToDo,
    Completed { executed: usize },
}

/// Process exit status for a finished run: 0 on success (including nothing to
/// do), 1 for every failure kind.
pub const fn exit_status(result: &Result<RunOutcome, CqlError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
