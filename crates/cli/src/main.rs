//! Hoplog CLI - hoplog command

use anyhow::Result;
use clap::{Parser, Subcommand};
use monitor::Settings;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

mod cmd;
mod util;

/// Distinct exit codes for startup-time fatal errors
mod exit_code {
    /// Configuration file missing or unparsable
    pub const CONFIG: i32 = 10;
    /// Snapshot store cannot be opened
    pub const STORAGE: i32 = 12;
    /// No targets from any source
    pub const NO_TARGETS: i32 = 20;
}

/// Hoplog - Route change history for your hosts
#[derive(Parser)]
#[command(name = "hoplog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "hoplog.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run scheduled updates and housekeeping until interrupted
    Daemon,
    /// Run one update and housekeeping pass for every target, then exit
    UpdateNow,
    /// Print stored route snapshots for a target, newest first
    Show {
        /// Target name
        name: String,
        /// Number of snapshots to fetch (default: all)
        #[arg(long)]
        limit: Option<usize>,
        /// Render HTML markup instead of ANSI colors
        #[arg(long)]
        html: bool,
    },
    /// List monitored targets stored in the database
    Targets,
    /// Create the snapshot store and exit
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (settings, warnings) = match monitor::config::load(&cli.config) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("cannot load configuration: {err:#}");
            std::process::exit(exit_code::CONFIG);
        }
    };

    // Keep the non-blocking writer alive for the life of the process
    let _log_guard = init_logging(&settings, matches!(cli.command, Commands::Daemon));
    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    match cli.command {
        Commands::Daemon => cmd::daemon::run(&settings).await,
        Commands::UpdateNow => cmd::update::run(&settings).await,
        Commands::Show { name, limit, html } => cmd::show::run(&settings, &name, limit, html),
        Commands::Targets => cmd::targets::run(&settings),
        Commands::Init => cmd::init::run(&settings),
    }
}

/// Log to the configured file in daemon mode, to stderr everywhere else
fn init_logging(
    settings: &Settings,
    daemon: bool,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    if daemon {
        if let Some(path) = &settings.log_file {
            let directory = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().unwrap_or_else(|| OsStr::new("hoplog.log"));
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
            tracing_subscriber::fmt()
                .with_writer(writer)
                .with_ansi(false)
                .init();
            return Some(guard);
        }
    }
    tracing_subscriber::fmt::init();
    None
}
