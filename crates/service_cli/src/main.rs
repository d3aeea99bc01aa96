//! procsim CLI - Gaussian Process Simulation
//!
//! Operational entry point for the process simulation workspace.
//!
//! # Commands
//!
//! - `procsim run [--config <file>]` - Simulate realizations and compare
//!   their statistics with the model
//! - `procsim models` - List built-in mean functions and correlation kernels
//!
//! # Configuration
//!
//! Settings are resolved in priority order: CLI flags, `PROCSIM_*`
//! environment variables, the TOML config file, then defaults.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use config::{build_config, CliArgs};

/// Gaussian process simulation via sequential conditional regression
#[derive(Parser)]
#[command(name = "procsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate realizations and report observed vs theoretical statistics
    Run {
        /// Configuration file path (TOML format)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Number of realizations
        #[arg(short = 'n', long)]
        realizations: Option<usize>,

        /// Worker threads (defaults to the number of logical CPUs)
        #[arg(short, long)]
        parallelism: Option<usize>,

        /// Base seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Let negative variances propagate as NaN instead of clamping
        #[arg(long)]
        unsafe_math: bool,

        /// Build a fresh template for every realization
        #[arg(long)]
        per_realization: bool,

        /// Generation budget in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Realizations included in the output
        #[arg(long)]
        display_count: Option<usize>,

        /// Output format (table, json, csv)
        #[arg(short, long)]
        format: Option<String>,

        /// Log level (trace, debug, info, warn, error)
        #[arg(long)]
        log_level: Option<String>,

        /// Write the report to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List built-in mean functions and correlation kernels
    Models,
}

/// Logs go to stderr so that report output on stdout stays parseable.
fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            realizations,
            parallelism,
            seed,
            unsafe_math,
            per_realization,
            timeout_ms,
            display_count,
            format,
            log_level,
            output,
        } => {
            let args = CliArgs {
                config_file: config,
                realizations,
                parallelism,
                seed,
                unsafe_math,
                per_realization,
                timeout_ms,
                display_count,
                log_level,
                format,
            };
            let config = build_config(&args)?;
            init_tracing(config.log_level.as_filter_str());
            info!(
                realizations = config.realizations,
                safe_math = config.safe_math,
                template_mode = ?config.template_mode,
                "Configuration loaded"
            );
            commands::run::run(&config, output.as_deref())
        }
        Commands::Models => {
            let stdout = std::io::stdout();
            commands::models::run(&mut stdout.lock())
        }
    }
}
