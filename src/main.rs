use anyhow::{Context, Result};
use clap::Parser;
use employee_directory::cli::{handle_directory_command, DirectoryCli};
use employee_directory::DirectoryConfig;
use std::fs::OpenOptions;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match std::env::var("AGN_LOG_FILE") {
        Ok(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true) // Clear file on startup
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path))?;

            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(file)
                        .with_current_span(false)
                        .with_span_list(false),
                )
                .with(filter)
                .init();
        }
        Err(_) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .with(filter)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let cli = DirectoryCli::parse();
    let config = DirectoryConfig::load()?;

    handle_directory_command(cli, config).await
}
