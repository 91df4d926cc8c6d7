//! Climate coverage catalog CLI.
//!
//! Lists, decodes and resolves coverages of a YAML catalog, computes
//! download cache keys and derives processed series. Results are printed
//! to stdout as JSON; logs go to stderr.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use catalog_cli::commands::{self, Command};
use catalog_cli::config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "catalog-cli")]
#[command(about = "Query the climate coverage catalog and derive series")]
struct Args {
    /// Catalog file path (overrides CATALOG_PATH)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let mut config = CliConfig::from_env()?;
    if let Some(catalog) = args.catalog {
        config.catalog_path = catalog;
    }
    info!(catalog = ?config.catalog_path, "Loaded configuration");

    let output = match commands::run(&args.command, &config) {
        Ok(output) => output,
        Err(e) => {
            error!(error = %e, "Command failed");
            return Err(e);
        }
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);

    Ok(())
}
