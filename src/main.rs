//! EV warranty admin CLI.

use clap::Parser;
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use evw_admin::cli::{self, Cli};
use evw_admin::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(2);
        }
    };

    // Initialize logging; stderr keeps stdout for tables
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("API base URL: {}", config.api_base_url);
    tracing::debug!("Session path: {:?}", config.session_path);

    if cli::run(cli, config).await.is_err() {
        std::process::exit(1);
    }

    Ok(())
}
