use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;

use crate::errors::ConfigError;

// Application configuration module
// This module handles the application configuration including loading,
// layering environment overrides and validating configuration settings.

/// Environment variable holding the completion API key
pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

/// Environment variable overriding the completion endpoint base URL
pub const BASE_URL_ENV: &str = "DEEPSEEK_BASE_URL";

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language, either a name ("English", "中文") or an ISO code
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Maximum number of remote calls in flight at once
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// What to do when a single cell fails to translate
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Completion endpoint settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Completion endpoint configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Bearer token, usually supplied through DEEPSEEK_API_KEY
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    // @field: Base URL, `/chat/completions` is appended
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    // @field: Timeout seconds per request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Handling of cells whose remote call fails
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep the original text for the failed cell and continue with the rest
    #[default]
    Isolate,
    /// Stop the whole run on the first failed cell, nothing is saved
    Abort,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "English".to_string()
}

fn default_max_concurrent_requests() -> usize {
    50
}

fn default_endpoint() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_timeout_secs() -> u64 {
    120
}

impl Config {
    /// Load the configuration from a JSON file, writing a default one if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let config: Config = serde_json::from_reader(reader)?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)?;
        std::fs::write(path, config_json)?;
        Ok(config)
    }

    /// Apply `DEEPSEEK_API_KEY` / `DEEPSEEK_BASE_URL` from the given lookup.
    ///
    /// The lookup is injected so callers decide where values come from;
    /// the binary passes `std::env::var`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.provider.api_key = api_key.trim().to_string();
        }
        if let Some(endpoint) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.provider.endpoint = endpoint.trim().to_string();
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_language.trim().is_empty() {
            return Err(ConfigError::EmptyTargetLanguage);
        }
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::InvalidConcurrency(self.max_concurrent_requests));
        }
        self.provider.validate()
    }
}

impl ProviderConfig {
    /// Validate endpoint, credentials and sampling settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let url = Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            message: e.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            max_concurrent_requests: default_max_concurrent_requests(),
            failure_policy: FailurePolicy::default(),
            provider: ProviderConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
