//! Larder unified launcher.
//!
//! One binary for both halves of the system: the interactive scan loop
//! that the barcode scanner drives, and the dashboard server that the
//! web UI talks to. Standalone commands inspect the snapshot files
//! without either running.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "larder", about = "Barcode-driven pantry inventory")]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the interactive scan loop against a snapshot file
    Scan(cli::scan::ScanArgs),

    /// Start the dashboard server
    Serve(cli::serve::ServeArgs),

    /// Print the contents of a snapshot file
    List(cli::list::ListArgs),

    /// List the snapshot files in the data directory
    Snapshots(cli::snapshots::SnapshotsArgs),

    /// Check that a dashboard server is reachable
    Ping(cli::ping::PingArgs),

    /// Show current configuration and paths
    Config(cli::config::ConfigArgs),
}

fn command_wants_json(command: &Commands) -> bool {
    match command {
        Commands::List(args) => args.json,
        Commands::Snapshots(args) => args.json,
        Commands::Config(args) => args.json,
        _ => false,
    }
}

fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Scan(args) => cli::scan::run(args),
        Commands::Serve(args) => cli::serve::run(args),
        Commands::List(args) => cli::list::run(args),
        Commands::Snapshots(args) => cli::snapshots::run(args),
        Commands::Ping(args) => cli::ping::run(args),
        Commands::Config(args) => cli::config::run(args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Keep stdout clean for the scan prompts and the --json output modes.
    let interactive = matches!(cli.command, Commands::Scan(_));
    let json_mode = command_wants_json(&cli.command);
    let log_config = larder_logging::LogConfig {
        app_name: "larder",
        quiet_console: (interactive || json_mode) && !cli.verbose,
    };
    let _log_guard = match larder_logging::init_logging(log_config) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Warning: failed to initialize logging: {:#}", err);
            None
        }
    };

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(1)
        }
    }
}
