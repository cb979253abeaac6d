use crate::core::CqlError;
use crate::format::OutputFormat;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Settings that may come from a config file or `CQLEXEC_*` environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default)]
    pub keyspace: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub output: OutputFormat,
}

fn default_host() -> String {
    "localhost".to_string()
}

const fn default_port() -> u16 {
    9042
}

fn default_username() -> String {
    "cassandra".to_string()
}

fn default_password() -> String {
    "cassandra".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: default_username(),
            password: default_password(),
            keyspace: None,
            timeout_secs: default_timeout_secs(),
            output: OutputFormat::default(),
        }
    }
}

impl ClientConfig {
    /// Config files searched in order; the first one that exists is used.
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/cqlexec/cqlexec.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("cqlexec").join("cqlexec.toml"));
        }
        paths.push(PathBuf::from("./cqlexec.toml"));
        paths
    }

    /// Loads configuration with priority: ENV > config file > defaults.
    /// Command-line flags are applied on top by the caller.
    pub fn load() -> Result<Self, CqlError> {
        Self::load_from(&Self::default_paths())
    }

    pub fn load_from(paths: &[PathBuf]) -> Result<Self, CqlError> {
        let mut builder = Config::builder();

        if let Some(path) = paths.iter().find(|p| Path::new(p).exists()) {
            debug!(path = %path.display(), "loading config file");
            builder = builder.add_source(File::from(path.as_path()));
        }

        builder = builder.add_source(Environment::with_prefix("CQLEXEC").try_parsing(true));

        builder
            .build()
            .and_then(|c| c.try_deserialize::<Self>())
            .map_err(|e| CqlError::Config(e.to_string()))
    }
}

/// Everything one run needs, resolved from config sources and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub keyspace: Option<String>,
    pub timeout: Duration,
    /// Single statement to run (`-e`); wins over `file` when both are set.
    pub execute: Option<String>,
    /// Script to run (`-f`).
    pub file: Option<PathBuf>,
    pub output: OutputFormat,
}

impl From<ClientConfig> for RunConfig {
    fn from(config: ClientConfig) -> Self {
        Self {
            host: config.host,
            port: config.port,
            username: config.username,
            password: config.password,
            keyspace: config.keyspace,
            timeout: Duration::from_secs(config.timeout_secs),
            execute: None,
            file: None,
            output: config.output,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        ClientConfig::default().into()
    }
}
