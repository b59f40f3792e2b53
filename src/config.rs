use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Enhanced portion estimation through a generative-language API.
///
/// When disabled, or when no API key is set, every calculation uses the
/// keyword fallback.
#[derive(Debug, Deserialize, Clone)]
pub struct EstimatorConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_estimator_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_estimator_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_estimator_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_estimator_endpoint(),
            model: default_estimator_model(),
            api_key: String::new(),
            timeout_secs: default_estimator_timeout_secs(),
        }
    }
}

impl EstimatorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether the network-backed estimator should be wired in.
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.is_empty()
    }
}

fn default_estimator_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_estimator_model() -> String {
    "gemini-pro".to_string()
}

fn default_estimator_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy variables (GEMINI_API_KEY, PORT)
    /// 2. Environment variables (SAVOR__SERVER__PORT, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional - ignore if not found
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("SAVOR")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(api_key) = env::var("GEMINI_API_KEY") {
            builder = builder
                .set_override("estimator.api_key", api_key)?
                .set_override("estimator.enabled", true)?;
        }
        if let Ok(port) = env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.estimator.timeout_secs == 0 {
            return Err("Estimator timeout_secs must be greater than 0".to_string());
        }
        if self.estimator.enabled {
            if self.estimator.endpoint.trim().is_empty() {
                return Err("Estimator endpoint is required when enabled".to_string());
            }
            if self.estimator.model.trim().is_empty() {
                return Err("Estimator model is required when enabled".to_string());
            }
        }
        Ok(())
    }
}
