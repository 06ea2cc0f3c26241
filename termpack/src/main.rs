//! Termpack CLI - pack, unpack and inspect compressed term streams.
//!
//! Parses arguments with clap, installs logging, loads `termpack.toml`
//! and dispatches to the subcommand handlers.

mod commands;
mod config;
mod error;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{run_inspect, run_pack, run_unpack, InspectArgs, PackArgs, UnpackArgs};
use config::Config;
use error::{Result, TermpackError};

/// Termpack - compressed term streams
#[derive(Parser, Debug)]
#[command(name = "termpack")]
#[command(author = "Sterm Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pack, unpack and inspect compressed term streams", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "TERMPACK_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TERMPACK_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "TERMPACK_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the termpack CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compress a text file of terms, one per line
    Pack(PackCommand),

    /// Print the terms of a packed file, one per line
    Unpack(UnpackCommand),

    /// Show header fields and compression statistics
    Inspect(InspectCommand),
}

/// Arguments for the pack subcommand.
#[derive(Parser, Debug)]
struct PackCommand {
    /// Text file with one term per line
    input: PathBuf,

    /// Packed file to create
    #[arg(short, long)]
    output: PathBuf,

    /// Sliding window size in bytes (default: from config)
    #[arg(short, long)]
    window: Option<usize>,

    /// Longest back-reference (default: from config)
    #[arg(short, long)]
    lookahead: Option<usize>,

    /// Overwrite an existing output file
    #[arg(short, long)]
    force: bool,
}

/// Arguments for the unpack subcommand.
#[derive(Parser, Debug)]
struct UnpackCommand {
    /// Packed file to read
    input: PathBuf,

    /// Text file to write (default: standard output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(short, long)]
    force: bool,
}

/// Arguments for the inspect subcommand.
#[derive(Parser, Debug)]
struct InspectCommand {
    /// Packed file to inspect
    input: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    let verbose = cli.verbose || config.verbose;

    init_logging(verbose, cli.no_color)?;

    execute_command(cli.command, config).context("termpack failed")?;
    Ok(())
}

/// Initialize the logging system.
///
/// Log output goes to standard error so unpacked terms on standard output
/// stay clean. `RUST_LOG` takes precedence over the verbosity flag.
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| TermpackError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(config_path: Option<&std::path::Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

/// Execute the selected command.
fn execute_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Pack(args) => execute_pack(args, &config),
        Commands::Unpack(args) => execute_unpack(args, &config),
        Commands::Inspect(args) => execute_inspect(args),
    }
}

/// Execute the pack command.
fn execute_pack(args: PackCommand, config: &Config) -> Result<()> {
    let pack_args = PackArgs {
        input: args.input,
        output: args.output,
        lz: config.lz_config(args.window, args.lookahead)?,
        table: config.table_config()?,
        force: args.force,
    };
    run_pack(pack_args)
}

/// Execute the unpack command.
fn execute_unpack(args: UnpackCommand, config: &Config) -> Result<()> {
    let unpack_args = UnpackArgs {
        input: args.input,
        output: args.output,
        table: config.table_config()?,
        force: args.force,
    };
    run_unpack(unpack_args)
}

/// Execute the inspect command.
fn execute_inspect(args: InspectCommand) -> Result<()> {
    run_inspect(InspectArgs {
        input: args.input,
        json: args.json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_pack() {
        let cli = Cli::parse_from(["termpack", "pack", "terms.txt", "-o", "terms.stp"]);
        if let Commands::Pack(args) = cli.command {
            assert_eq!(args.input, PathBuf::from("terms.txt"));
            assert_eq!(args.output, PathBuf::from("terms.stp"));
            assert_eq!(args.window, None);
            assert!(!args.force);
        } else {
            panic!("Expected Pack command");
        }
    }

    #[test]
    fn test_cli_parse_pack_with_window() {
        let cli = Cli::parse_from([
            "termpack",
            "pack",
            "terms.txt",
            "--output",
            "terms.stp",
            "--window",
            "4096",
            "--lookahead",
            "64",
        ]);
        if let Commands::Pack(args) = cli.command {
            assert_eq!(args.window, Some(4096));
            assert_eq!(args.lookahead, Some(64));
        } else {
            panic!("Expected Pack command");
        }
    }

    #[test]
    fn test_cli_pack_requires_output() {
        assert!(Cli::try_parse_from(["termpack", "pack", "terms.txt"]).is_err());
    }

    #[test]
    fn test_cli_parse_unpack() {
        let cli = Cli::parse_from(["termpack", "unpack", "terms.stp"]);
        if let Commands::Unpack(args) = cli.command {
            assert_eq!(args.output, None);
        } else {
            panic!("Expected Unpack command");
        }
    }

    #[test]
    fn test_cli_parse_inspect_json() {
        let cli = Cli::parse_from(["termpack", "inspect", "terms.stp", "--json"]);
        if let Commands::Inspect(args) = cli.command {
            assert!(args.json);
        } else {
            panic!("Expected Inspect command");
        }
    }

    #[test]
    fn test_cli_parse_global_flags() {
        let cli = Cli::parse_from([
            "termpack",
            "--verbose",
            "--no-color",
            "--config",
            "/path/to/termpack.toml",
            "inspect",
            "terms.stp",
        ]);
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/termpack.toml")));
    }
}
