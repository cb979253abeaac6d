use clap::Parser;
use cqlexec::{
    ClientConfig, CqlError, OutputFormat, RunConfig, RunInput, RunOutcome, Runner,
    ScyllaConnector, exit_status,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Execute CQL statements against a Cassandra cluster and exit
#[derive(Parser, Debug)]
#[command(name = "cqlexec", version)]
#[command(
    about = "Run a CQL statement or script against a Cassandra/ScyllaDB cluster",
    long_about = None
)]
struct Args {
    /// Execute the CQL statement and exit
    #[arg(short = 'e', long = "execute")]
    execute: Option<String>,

    /// Execute commands from FILE, then exit
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Authenticate as user [default: cassandra]
    #[arg(short = 'u', long)]
    username: Option<String>,

    /// Authenticate using password [default: cassandra]
    #[arg(short = 'p', long)]
    password: Option<String>,

    /// Use the given keyspace, as if `USE <keyspace>` were issued first
    #[arg(short = 'k', long)]
    keyspace: Option<String>,

    /// Request timeout in seconds [default: 30]
    #[arg(long)]
    timeout: Option<u64>,

    /// Output format for returned rows [default: json]
    #[arg(short = 'o', long, value_enum)]
    output: Option<OutputFormat>,

    /// Cluster contact point [default: localhost]
    host: Option<String>,

    /// Native protocol port [default: 9042]
    port: Option<u16>,
}

impl Args {
    /// CLI args override everything loaded from files and the environment.
    fn into_run_config(self, base: ClientConfig) -> RunConfig {
        let mut config = RunConfig::from(base);
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(username) = self.username {
            config.username = username;
        }
        if let Some(password) = self.password {
            config.password = password;
        }
        if let Some(keyspace) = self.keyspace {
            config.keyspace = Some(keyspace);
        }
        if let Some(timeout) = self.timeout {
            config.timeout = Duration::from_secs(timeout);
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        config.execute = self.execute;
        config.file = self.file;
        config
    }
}

fn init_tracing() {
    // Logs go to stderr so stdout stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<RunOutcome, CqlError> {
    let config = args.into_run_config(ClientConfig::load()?);
    let input = RunInput::from_config(&config)?;
    if input == RunInput::Nothing {
        return Ok(RunOutcome::NothingToDo);
    }

    let connector = ScyllaConnector::new(&config);
    debug!(node = connector.node(), keyspace = ?config.keyspace, "starting run");

    let mut runner = Runner::new(
        connector,
        config.keyspace.as_deref(),
        config.output,
        std::io::stdout(),
    );
    runner.run(&input).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let result = run(args).await;
    match &result {
        Ok(RunOutcome::NothingToDo) => println!("Nothing to do: -e and -f undefined or empty"),
        Ok(RunOutcome::Completed { executed }) => debug!(executed, "all statements succeeded"),
        Err(e) => eprintln!("{e}"),
    }
    ExitCode::from(exit_status(&result))
}
