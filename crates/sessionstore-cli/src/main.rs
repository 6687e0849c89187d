use anyhow::Result;
use clap::{Parser, Subcommand};
use sessionstore_infrastructure::ConfigService;
use std::path::PathBuf;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "sessionstore")]
#[command(about = "Session-scoped store registry with TTL eviction and hydration", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a server render followed by a client hydration
    Demo {
        /// Course IDs favorited during the server render
        #[arg(long = "favorite")]
        favorites: Vec<String>,
        /// Switch the server-rendered theme to dark
        #[arg(long)]
        dark: bool,
        /// Print captured registry events after the run
        #[arg(long)]
        events: bool,
    },
    /// Populate a registry with simulated sessions and print diagnostics
    Stats {
        /// Number of server renders to simulate
        #[arg(long, default_value_t = 5)]
        sessions: usize,
    },
    /// Run the background maintenance loop against simulated traffic
    Maintain {
        #[arg(long, default_value_t = 10)]
        requests: usize,
        #[arg(long, default_value_t = 200)]
        interval_ms: u64,
        #[arg(long, default_value_t = 1000)]
        duration_ms: u64,
        /// Override the configured eviction age
        #[arg(long)]
        max_age_ms: Option<i64>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Loads the configuration and installs the log subscriber it asks for.
fn load_config(
    service: &ConfigService,
    json_logs: bool,
) -> Result<sessionstore_core::config::RegistryConfig> {
    let config = logging::bootstrap(json_logs, || service.get_config())?;
    logging::init(&config.log_level, json_logs, false)?;
    tracing::debug!(path = %service.path().display(), "Loaded configuration");
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };

    match cli.command {
        Commands::Demo {
            favorites,
            dark,
            events,
        } => {
            let config = logging::bootstrap(cli.json_logs, || config_service.get_config())?;
            let receiver = logging::init(&config.log_level, cli.json_logs, events)?;
            commands::demo::run(config, &favorites, dark, receiver)?;
        }
        Commands::Stats { sessions } => {
            let config = load_config(&config_service, cli.json_logs)?;
            commands::stats::run(config, sessions)?;
        }
        Commands::Maintain {
            requests,
            interval_ms,
            duration_ms,
            max_age_ms,
        } => {
            let config = load_config(&config_service, cli.json_logs)?;
            commands::maintain::run(config, requests, interval_ms, duration_ms, max_age_ms)
                .await?;
        }
        Commands::Config { action } => {
            logging::init("warn", cli.json_logs, false)?;
            match action {
                ConfigAction::Show => commands::config::show(&config_service)?,
                ConfigAction::Init { force } => commands::config::init(&config_service, force)?,
            }
        }
    }

    Ok(())
}
