//! Configuration discovery and loading
//!
//! Discovery hierarchy:
//! 1. Explicit `--config` path
//! 2. Current directory: ./switchboard.toml
//! 3. User config: ~/.switchboard/config.toml
//! 4. Built-in defaults
//!
//! Environment variables (`ANTHROPIC_API_KEY`, `OPENAI_API_KEY`, ...) win
//! over file values for credentials and endpoints, so secrets never need to
//! live in the TOML file. A provider with no credential stays registered;
//! its absence only surfaces if a dispatch actually reaches that adapter.

use crate::env;
use crate::provider::ProviderSettings;
use crate::registry::ProviderId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Bounded wait per HTTP call, applied adapter-locally.
    pub request_timeout_secs: u64,
    pub anthropic: ProviderSettings,
    pub openai: ProviderSettings,
    pub gemini: ProviderSettings,
    pub mistral: ProviderSettings,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            anthropic: ProviderSettings::default(),
            openai: ProviderSettings::default(),
            gemini: ProviderSettings::default(),
            mistral: ProviderSettings::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid endpoint for {provider}: {reason}")]
    InvalidEndpoint { provider: ProviderId, reason: String },
}

impl RouterConfig {
    /// Load from an explicit TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Walk the discovery hierarchy and return the first config found,
    /// falling back to built-in defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        let local = Path::new(env::LOCAL_CONFIG_FILE_NAME);
        if local.is_file() {
            info!(path = %local.display(), "loading project-local config");
            return Self::from_toml_file(local);
        }

        if let Some(user_path) = env::user_config_path() {
            if user_path.is_file() {
                info!(path = %user_path.display(), "loading user config");
                return Self::from_toml_file(user_path);
            }
        }

        debug!("no config file found, using built-in defaults");
        Ok(Self::default())
    }

    /// Overlay credentials and endpoints from the process environment.
    pub fn apply_env(&mut self) {
        overlay(&mut self.anthropic, env::var::ANTHROPIC_API_KEY, env::var::ANTHROPIC_BASE_URL);
        overlay(&mut self.openai, env::var::OPENAI_API_KEY, env::var::OPENAI_BASE_URL);
        overlay(&mut self.gemini, env::var::GEMINI_API_KEY, env::var::GEMINI_BASE_URL);
        overlay(&mut self.mistral, env::var::MISTRAL_API_KEY, env::var::MISTRAL_BASE_URL);
    }

    /// Discovery plus environment overlay, the way the binary loads config.
    pub fn load(config_override: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_override {
            Some(path) => {
                info!(path = %path.display(), "loading config override");
                Self::from_toml_file(path)?
            }
            None => Self::discover()?,
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn settings_for(&self, provider: ProviderId) -> &ProviderSettings {
        match provider {
            ProviderId::Anthropic => &self.anthropic,
            ProviderId::OpenAi => &self.openai,
            ProviderId::Gemini => &self.gemini,
            ProviderId::Mistral => &self.mistral,
        }
    }

    /// Reject endpoint overrides that are not absolute URLs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for provider in ProviderId::ALL {
            if let Some(endpoint) = &self.settings_for(provider).endpoint {
                Url::parse(endpoint).map_err(|e| ConfigError::InvalidEndpoint {
                    provider,
                    reason: e.to_string(),
                })?;
            }
        }
        Ok(())
    }
}

fn overlay(settings: &mut ProviderSettings, key_var: &str, endpoint_var: &str) {
    if let Ok(key) = std::env::var(key_var) {
        if !key.is_empty() {
            settings.api_key = Some(key);
        }
    }
    if let Ok(endpoint) = std::env::var(endpoint_var) {
        if !endpoint.is_empty() {
            settings.endpoint = Some(endpoint);
        }
    }
}
