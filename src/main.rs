//! srcbundle - concatenate source files from directory trees into bundle files
//!
//! srcbundle provides:
//! - Recursive scanning with a case-sensitive file name suffix filter
//! - One bundle per job with `/path :` headers and fixed separators
//! - Jobs from a TOML config or built-in defaults
//! - Reports in text/jsonl/json

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod backends;
mod cli;
mod core;
mod flows;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logging(&cli);
    cli::run(cli)
}

fn init_logging(cli: &cli::Cli) {
    let level = if let Some(level_str) = &cli.log_level {
        parse_level(level_str)
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("srcbundle={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn parse_level(level_str: &str) -> &'static str {
    match level_str.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" => "warn",
        "error" => "error",
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to warn. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            "warn"
        }
    }
}
