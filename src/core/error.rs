use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CqlError {
    #[error("Failed to read CQL script file {path}: {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No connection to cassandra cluster: {0}")]
    Connection(String),
    #[error("Failed to execute CQL command: {0}")]
    Execution(String),
    #[error("Failed to format CQL result: {0}")]
    Formatting(String),
    #[error("Missing keyspace name in statement '{0}'")]
    MissingKeyspace(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
