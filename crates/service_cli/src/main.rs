//! Creditlink CLI - command line operations for the pricing toolkit.
//!
//! # Commands
//!
//! - `creditlink price` - value a demonstration credit-linked note
//! - `creditlink check` - report build and runtime configuration
//!
//! The service layer orchestrates the pricer layers below it; all
//! valuation logic lives in `pricer_pricing` and `pricer_models`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use config::PriceConfig;

/// Creditlink pricing toolkit CLI.
#[derive(Parser)]
#[command(name = "creditlink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a demonstration single-name credit-linked note
    Price {
        /// Path to a TOML market configuration file
        #[arg(short, long)]
        config: Option<String>,

        /// Valuation date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Number of simulated factor paths
        #[arg(short = 'p', long, default_value = "10000")]
        num_paths: usize,

        /// RNG seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,

        /// Pay recovery value at maturity instead of at default time
        #[arg(long)]
        recovery_at_maturity: bool,
    },

    /// Check build configuration and runtime environment
    Check,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Price {
            config,
            date,
            num_paths,
            seed,
            recovery_at_maturity,
        } => {
            let price_config = match config {
                Some(path) => PriceConfig::load(&path)
                    .with_context(|| format!("loading configuration from {}", path))?,
                None => PriceConfig::default(),
            };
            commands::price::run(
                price_config,
                date.as_deref(),
                num_paths,
                seed,
                recovery_at_maturity,
            )
            .context("pricing failed")?;
        }
        Commands::Check => commands::check::run().context("check failed")?,
    }

    Ok(())
}
