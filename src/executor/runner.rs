use super::dispatcher::Dispatcher;
use super::result::{ExecutionResult, RunOutcome};
use crate::config::RunConfig;
use crate::core::{CqlError, SessionState};
use crate::format::{OutputFormat, render_rows};
use crate::network::Connector;
use crate::parser::split_statements;
use std::io::Write;
use tracing::debug;

/// What a run should execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunInput {
    /// One statement, submitted verbatim (after trimming).
    Statement(String),
    /// Script contents, split on `;`.
    Script(String),
    Nothing,
}

impl RunInput {
    /// Resolves the input named by the configuration, reading the script file if any.
    pub fn from_config(config: &RunConfig) -> Result<Self, CqlError> {
        if let Some(statement) = config.execute.as_ref().filter(|s| !s.trim().is_empty()) {
            return Ok(Self::Statement(statement.clone()));
        }
        match &config.file {
            Some(path) => std::fs::read_to_string(path)
                .map(Self::Script)
                .map_err(|source| CqlError::InputRead {
                    path: path.clone(),
                    source,
                }),
            None => Ok(Self::Nothing),
        }
    }
}

/// Runs statements one after another, stopping at the first failure.
pub struct Runner<C: Connector, W: Write> {
    dispatcher: Dispatcher<C>,
    session: SessionState,
    output: OutputFormat,
    out: W,
}

impl<C: Connector, W: Write> Runner<C, W> {
    pub fn new(connector: C, keyspace: Option<&str>, output: OutputFormat, out: W) -> Self {
        Self {
            dispatcher: Dispatcher::new(connector),
            session: SessionState::with_keyspace(keyspace),
            output,
            out,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn is_connected(&self) -> bool {
        self.dispatcher.is_connected()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub async fn run(&mut self, input: &RunInput) -> Result<RunOutcome, CqlError> {
        match input {
            RunInput::Nothing => Ok(RunOutcome::NothingToDo),
            RunInput::Statement(statement) => {
                let statement = statement.trim();
                let statements = Some(statement.to_string()).filter(|s| !s.is_empty());
                self.run_statements(statements).await
            }
            RunInput::Script(script) => self.run_statements(split_statements(script)).await,
        }
    }

    async fn run_statements<I>(&mut self, statements: I) -> Result<RunOutcome, CqlError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut executed = 0;
        for statement in statements {
            if let Err(e) = self.execute(&statement).await {
                debug!(%statement, executed, "statement failed, stopping run");
                return Err(e);
            }
            executed += 1;
        }

        if executed == 0 {
            return Ok(RunOutcome::NothingToDo);
        }
        debug!(executed, "run completed");
        Ok(RunOutcome::Completed { executed })
    }

    async fn execute(&mut self, statement: &str) -> Result<(), CqlError> {
        writeln!(self.out, "Executing CQL command {statement}")?;

        match self.dispatcher.dispatch(statement, &mut self.session).await? {
            ExecutionResult::Rows(rows) => {
                let rendered = render_rows(&rows, self.output)?;
                writeln!(self.out, "{rendered}")?;
            }
            ExecutionResult::Switched(_) | ExecutionResult::Ack => {}
        }

        writeln!(self.out, "Success !")?;
        Ok(())
    }
}
