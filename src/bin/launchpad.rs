//! Lists and starts the servers found under a launchpad server root.
//!
//! Usage:
//!
//! ```text
//! launchpad [--config <path>] [--server-dir <dir>] list [--json]
//! launchpad [--config <path>] [--server-dir <dir>] start [<name>...]
//! ```
//!
//! `start` without names prints the server listing. Each requested name is
//! started on its own task and reported on its own line; the exit status is
//! non-zero when any of them failed. Diagnostics go to stderr and are filtered
//! with `RUST_LOG` (default `info`).

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use launchpad::config::{DEFAULT_CONFIG_FILE, LaunchpadConfig};
use launchpad::server_registry::{
    adapters::{
        filesystem::FilesystemServerCatalog,
        process::{ScriptProcessLauncher, SysinfoProcessProbe},
    },
    domain::ServerDescriptor,
    services::{LaunchError, LaunchOutcome, LaunchSupervisor, ServerDiscoveryService},
};
use mockable::DefaultClock;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::runtime::Builder;
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Columns added after the longest server name in the listing.
const NAME_PADDING: usize = 4;

#[derive(Debug, Parser)]
#[command(name = "launchpad", version, about = "Discover and start local servers")]
struct Cli {
    /// INI configuration file.
    #[arg(long, env = "LAUNCHPAD_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: Utf8PathBuf,

    /// Server root directory, overriding `server_dir` from the config file.
    #[arg(long, env = "LAUNCHPAD_SERVER_DIR")]
    server_dir: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the available servers.
    List {
        /// Print the listing as a JSON array.
        #[arg(long)]
        json: bool,
    },
    /// Start one or more servers by name.
    Start {
        /// Server names; lists the servers when empty.
        names: Vec<String>,
    },
}

fn main() -> Result<ExitCode, BoxError> {
    let cli = Cli::parse();
    init_tracing();
    let config = LaunchpadConfig::load(&cli.config, cli.server_dir.as_deref())?;
    let runtime = Builder::new_multi_thread().enable_all().build()?;
    let succeeded = runtime.block_on(run(cli.command, &config, &mut std::io::stdout()))?;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs `command`, writing its report to `out`.
///
/// Returns `false` when any requested server failed to start.
async fn run<W: Write>(
    command: Command,
    config: &LaunchpadConfig,
    out: &mut W,
) -> Result<bool, BoxError> {
    let catalog = Arc::new(FilesystemServerCatalog::new(config.server_dir())?);
    let discovery =
        ServerDiscoveryService::new(Arc::clone(&catalog)).with_order(config.listing_order());

    match command {
        Command::List { json: true } => {
            let servers = discovery.list_servers().await?;
            serde_json::to_writer_pretty(&mut *out, &servers)?;
            writeln!(out)?;
        }
        Command::List { json: false } => {
            let servers = discovery.list_servers().await?;
            writeln!(out, "{}", render_listing(&servers))?;
        }
        Command::Start { names } if names.is_empty() => {
            let servers = discovery.list_servers().await?;
            writeln!(out, "{}", render_listing(&servers))?;
        }
        Command::Start { names } => {
            let supervisor = LaunchSupervisor::new(
                catalog,
                Arc::new(SysinfoProcessProbe::new()),
                Arc::new(ScriptProcessLauncher::new(config.interpreter().clone())),
                Arc::new(DefaultClock),
            )
            .with_handle_capacity(config.max_handles());
            let outcomes = supervisor.start_batch(names).await;
            for outcome in &outcomes {
                writeln!(out, "{}", render_outcome(outcome))?;
            }
            return Ok(outcomes.iter().all(|outcome| outcome.result.is_ok()));
        }
    }
    Ok(true)
}

/// Renders the human-readable server listing.
fn render_listing(servers: &[ServerDescriptor]) -> String {
    let width = servers
        .iter()
        .map(|server| server.name().as_str().len())
        .max()
        .unwrap_or(0)
        + NAME_PADDING;
    let mut lines = vec![String::from("Available servers:")];
    lines.extend(servers.iter().map(|server| {
        format!(
            "\t{:<width$} Version: {} Type: {}",
            server.name().as_str(),
            server.version(),
            server.mods(),
        )
    }));
    lines.join("\n")
}

/// Renders the status line reported for one requested name.
fn render_outcome(outcome: &LaunchOutcome) -> String {
    let name = outcome.requested.as_str();
    match &outcome.result {
        Ok(_) => format!("Server \"{name}\" started"),
        Err(LaunchError::InvalidArgument(_)) => {
            format!("Input \"{name}\" is not a valid server. Ignoring.")
        }
        Err(LaunchError::ServiceNotFound(_)) => {
            format!("Server \"{name}\" could not be found. Ignoring.")
        }
        Err(LaunchError::AlreadyRunning { .. }) => {
            format!("The server {name} is already running.")
        }
        Err(
            LaunchError::LaunchFailure { .. }
            | LaunchError::Internal { .. }
            | LaunchError::State(_),
        ) => format!(
            "There was an internal error starting server {name}. Please contact a server administrator."
        ),
    }
}
