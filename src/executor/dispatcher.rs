use super::result::ExecutionResult;
use crate::core::{CqlError, SessionState};
use crate::network::{Connection, Connector};
use crate::parser::{StatementKind, classify};
use tracing::{debug, info};

/// Routes statements to the right execution path.
///
/// The connection is opened by the first statement that actually reaches the
/// cluster and then reused; it is closed when the dispatcher is dropped.
pub struct Dispatcher<C: Connector> {
    connector: C,
    connection: Option<C::Connection>,
}

impl<C: Connector> Dispatcher<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            connection: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub async fn dispatch(
        &mut self,
        statement: &str,
        session: &mut SessionState,
    ) -> Result<ExecutionResult, CqlError> {
        match classify(statement) {
            StatementKind::UseKeyspace(keyspace) => {
                if keyspace.is_empty() {
                    return Err(CqlError::MissingKeyspace(statement.to_string()));
                }
                session.set_keyspace(&keyspace);
                info!(keyspace = %keyspace, "switched keyspace");
                Ok(ExecutionResult::Switched(keyspace))
            }
            StatementKind::Query => {
                debug!(statement, "executing query");
                let connection = self.bound_connection(session).await?;
                let rows = connection.execute_query(statement).await?;
                Ok(ExecutionResult::Rows(rows))
            }
            StatementKind::Command => {
                debug!(statement, "executing command");
                let connection = self.bound_connection(session).await?;
                connection.execute_command(statement).await?;
                Ok(ExecutionResult::Ack)
            }
        }
    }

    /// Returns the run's connection, scoped to the session's current keyspace.
    /// The keyspace is re-applied on every call.
    async fn bound_connection(
        &mut self,
        session: &SessionState,
    ) -> Result<&mut C::Connection, CqlError> {
        let connection = match self.connection.take() {
            Some(connection) => connection,
            None => self.connector.connect().await?,
        };
        let connection = self.connection.insert(connection);

        if let Some(keyspace) = session.current_keyspace() {
            connection.bind_keyspace(keyspace).await?;
        }
        Ok(connection)
    }
}
