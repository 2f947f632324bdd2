//! Config commands

use clap::ValueEnum;
use rfp_intake::Deployment;
use std::path::Path;

use crate::config::Config;
use crate::output::OutputFormat;
use crate::ConfigCommands;

pub fn handle(action: ConfigCommands, profile: Option<&str>) -> Result<(), String> {
    handle_at(action, &Config::path(profile)?)
}

/// An unreadable file is reported and left untouched; only `init` replaces it.
fn handle_at(action: ConfigCommands, path: &Path) -> Result<(), String> {
    match action {
        ConfigCommands::Init => {
            Config::default().save_to(path)?;
            println!("Configuration initialized at {}", path.display());
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load_from(path)?;
            set(&mut config, &key, value)?;
            config.save_to(path)?;
            println!("Set {} successfully", key);
        }
        ConfigCommands::Get { key } => {
            let config = Config::load_from(path)?;
            let value = get(&config, &key)?;
            println!("{}: {}", key, value.unwrap_or_else(|| "(not set)".into()));
        }
        ConfigCommands::List => {
            let config = Config::load_from(path)?;
            for key in ["api_url", "deployment", "default_format"] {
                let value = get(&config, key)?;
                println!("{}: {}", key, value.unwrap_or_else(|| "(not set)".into()));
            }
        }
    }
    Ok(())
}

fn set(config: &mut Config, key: &str, value: String) -> Result<(), String> {
    match key {
        "api_url" => config.api_url = Some(value),
        "deployment" => {
            let deployment: Deployment = value.parse().map_err(|e: rfp_intake::FormError| e.to_string())?;
            config.deployment = Some(deployment);
        }
        "default_format" => {
            OutputFormat::from_str(&value, true)?;
            config.default_format = Some(value.to_ascii_lowercase());
        }
        _ => return Err(format!("Unknown config key: {}", key)),
    }
    Ok(())
}

fn get(config: &Config, key: &str) -> Result<Option<String>, String> {
    match key {
        "api_url" => Ok(config.api_url.clone()),
        "deployment" => Ok(config.deployment.map(|d| d.to_string())),
        "default_format" => Ok(config.default_format.clone()),
        _ => Err(format!("Unknown config key: {}", key)),
    }
}
