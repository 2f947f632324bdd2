//! Endpoint configuration
//!
//! The submission endpoint is `{base_url}/sendemail`. The base URL is picked
//! once at start-up per deployment: development falls back to the local
//! mail relay, production must be provided through [`API_URL_ENV`].

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{FormError, Result};

pub const API_URL_ENV: &str = "RFP_API_URL";
pub const SEND_EMAIL_PATH: &str = "/sendemail";
const DEVELOPMENT_BASE_URL: &str = "http://localhost:5000";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    #[default]
    Development,
    Production,
}

impl Deployment {
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Deployment::Development => Some(DEVELOPMENT_BASE_URL),
            Deployment::Production => None,
        }
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deployment::Development => f.write_str("development"),
            Deployment::Production => f.write_str("production"),
        }
    }
}

impl FromStr for Deployment {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Deployment::Development),
            "production" | "prod" => Ok(Deployment::Production),
            other => Err(FormError::Config(format!("unknown deployment: {}", other))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub deployment: Deployment,
    pub base_url: String,
}

impl EndpointConfig {
    pub fn new(deployment: Deployment, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { deployment, base_url }
    }

    /// Pick the base URL: an explicit value wins, then the deployment default.
    pub fn resolve(deployment: Deployment, base_url: Option<String>) -> Result<Self> {
        let base_url = base_url
            .filter(|url| !url.trim().is_empty())
            .or_else(|| deployment.default_base_url().map(String::from))
            .ok_or_else(|| {
                FormError::Config(format!("{} is required for the {} deployment", API_URL_ENV, deployment))
            })?;

        let url = Url::parse(base_url.trim())
            .map_err(|e| FormError::Config(format!("invalid base URL {}: {}", base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(FormError::Config(format!("base URL must be http(s): {}", base_url)));
        }
        Ok(Self::new(deployment, base_url.trim()))
    }

    /// Resolve from [`API_URL_ENV`].
    pub fn from_env(deployment: Deployment) -> Result<Self> {
        Self::resolve(deployment, std::env::var(API_URL_ENV).ok())
    }

    pub fn send_email_url(&self) -> String {
        format!("{}{}", self.base_url, SEND_EMAIL_PATH)
    }
}
