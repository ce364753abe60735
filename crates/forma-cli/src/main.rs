//! # forma CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use forma_cli::build::{run_build, BuildArgs};
use forma_cli::config::CliConfig;
use forma_cli::schema::{run_schema, SchemaArgs};

/// Build values from construction descriptors.
///
/// Resolves a dotted target path against the built-in catalog and
/// constructs it, either through the target's constructor union or by
/// calling it directly.
#[derive(Parser, Debug)]
#[command(name = "forma", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the target of a construction descriptor.
    Build(BuildArgs),

    /// Print or write the constructor-union schema of a target.
    Schema(SchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = CliConfig::load(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Build(args) => run_build(args, &config),
        Commands::Schema(args) => run_schema(args),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
