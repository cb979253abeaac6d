use crate::core::{CqlError, Row};
use async_trait::async_trait;

/// A live connection to the cluster.
///
/// All three calls block (await) until the cluster answers; any timeout is
/// whatever the implementation was configured with.
#[async_trait]
pub trait Connection: Send {
    /// Scopes subsequent statements to `keyspace`.
    async fn bind_keyspace(&mut self, keyspace: &str) -> Result<(), CqlError>;

    /// Runs a statement that returns rows.
    async fn execute_query(&mut self, statement: &str) -> Result<Vec<Row>, CqlError>;

    /// Runs a statement for its side effect.
    async fn execute_command(&mut self, statement: &str) -> Result<(), CqlError>;
}

/// Opens connections. A run asks for at most one.
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: Connection;

    async fn connect(&self) -> Result<Self::Connection, CqlError>;
}
