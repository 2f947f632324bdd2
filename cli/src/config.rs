//! CLI Configuration

use clap::ValueEnum;
use rfp_intake::Deployment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub deployment: Option<Deployment>,
    pub default_format: Option<String>,
}

impl Config {
    pub fn load(profile: Option<&str>) -> Result<Self, String> {
        Self::load_from(&Self::path(profile)?)
    }

    /// Missing files load as defaults; unreadable ones are an error.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        if path.exists() {
            let content =
                fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
            toml::from_str(&content).map_err(|e| format!("invalid config {}: {}", path.display(), e))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, content).map_err(|e| e.to_string())
    }

    /// Configured output format, ignoring values clap would reject.
    pub fn format(&self) -> Option<OutputFormat> {
        self.default_format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
    }

    pub fn path(profile: Option<&str>) -> Result<PathBuf, String> {
        let home = dirs::home_dir().ok_or("Cannot find home directory")?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".rfp").join(filename))
    }
}
