// Module declarations
mod splitter;
mod statement;

pub use splitter::{Statements, split_statements};
pub use statement::{StatementKind, classify};
