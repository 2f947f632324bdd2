//! RFP Intake CLI
//!
//! Fill in and submit the Request for Proposal form from an intake document.
//!
//! # Usage
//!
//! ```bash
//! rfp options typeOfProject
//! rfp check intake.toml --attach floorplan.pdf
//! rfp submit intake.toml --attach floorplan.pdf --attach moodboard.png
//! RFP_API_URL=https://mail.example.com rfp --deployment production submit intake.yaml
//! rfp config set api_url http://localhost:5000
//! ```

use clap::{Parser, Subcommand};
use rfp_intake::{Deployment, EndpointConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod intake;
mod output;

#[derive(Parser)]
#[command(name = "rfp")]
#[command(version)]
#[command(about = "Request for Proposal intake form", long_about = None)]
struct Cli {
    /// Base URL of the email endpoint
    #[arg(long, env = "RFP_API_URL")]
    api_url: Option<String>,

    /// Deployment the base URL belongs to
    #[arg(long, env = "RFP_DEPLOYMENT")]
    deployment: Option<Deployment>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an intake document without sending it
    Check {
        /// Intake document (TOML, or YAML with a .yaml/.yml extension)
        file: PathBuf,
        /// File to attach; may be repeated
        #[arg(long, short)]
        attach: Vec<PathBuf>,
    },
    /// Validate and submit an intake document
    Submit {
        /// Intake document (TOML, or YAML with a .yaml/.yml extension)
        file: PathBuf,
        /// File to attach; may be repeated
        #[arg(long, short)]
        attach: Vec<PathBuf>,
    },
    /// List suggested choices
    Options {
        /// Field wire name, e.g. typeOfProject
        field: Option<String>,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Output and endpoint settings: flags and env first, then the profile file.
struct Settings {
    format: output::OutputFormat,
    deployment: Deployment,
    api_url: Option<String>,
}

async fn run(cli: Cli) -> Result<(), String> {
    let profile = cli.profile.as_deref();
    let settings = || {
        let config = config::Config::load(profile)
            .map_err(|e| format!("{} (run `rfp config init` to reset it)", e))?;
        Ok::<_, String>(Settings {
            format: cli.format.or_else(|| config.format()).unwrap_or_default(),
            deployment: cli.deployment.or(config.deployment).unwrap_or_default(),
            api_url: cli.api_url.clone().or(config.api_url),
        })
    };

    match cli.command {
        Commands::Check { file, attach } => commands::check::handle(&file, &attach, settings()?.format).await,
        Commands::Submit { file, attach } => {
            let settings = settings()?;
            let endpoint =
                EndpointConfig::resolve(settings.deployment, settings.api_url).map_err(|e| e.to_string())?;
            commands::submit::handle(&file, &attach, &endpoint, settings.format).await
        }
        Commands::Options { field } => commands::options::handle(field.as_deref(), settings()?.format),
        Commands::Config { action } => commands::config::handle(action, profile),
    }
}
