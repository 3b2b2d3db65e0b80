pub mod validation;

use serde::{Deserialize, Serialize};

use crate::protocol::completion::CompletionModel;

use self::validation::validate_config;

/// Environment variable that overrides `upstream.api_key` at load time.
pub const API_KEY_ENV_VAR: &str = "PERPLEXITY_API_KEY";

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_http_pool_max_idle_per_host")]
    pub http_pool_max_idle_per_host: usize,
    #[serde(default = "default_http_pool_idle_timeout_secs")]
    pub http_pool_idle_timeout_secs: u64,
    #[serde(default)]
    pub base_path: String,
}

fn default_port() -> u16 {
    8788
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_timeout() -> u64 {
    180
}
fn default_http_pool_max_idle_per_host() -> usize {
    16
}
fn default_http_pool_idle_timeout_secs() -> u64 {
    15
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            timeout: default_timeout(),
            http_pool_max_idle_per_host: default_http_pool_max_idle_per_host(),
            http_pool_idle_timeout_secs: default_http_pool_idle_timeout_secs(),
            base_path: String::new(),
        }
    }
}

/// Upstream completion API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer credential. Its prefix format is checked per request, not here;
    /// a malformed value surfaces as a 500 configuration error.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: CompletionModel,
    #[serde(default = "default_lookup_model")]
    pub lookup_model: CompletionModel,
}

fn default_base_url() -> String {
    "https://api.perplexity.ai".to_string()
}
fn default_key_prefix() -> String {
    "pplx-".to_string()
}
fn default_chat_model() -> CompletionModel {
    CompletionModel::SonarPro
}
fn default_lookup_model() -> CompletionModel {
    CompletionModel::Sonar
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            key_prefix: default_key_prefix(),
            chat_model: default_chat_model(),
            lookup_model: default_lookup_model(),
        }
    }
}

/// Origin allow-list configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Feature flags and settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    pub cors: CorsConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
}

/// Load configuration from a YAML file and validate it.
///
/// When the `PERPLEXITY_API_KEY` environment variable is set and non-empty it
/// overrides `upstream.api_key`. This is the only place ambient process state
/// is read; handlers receive the credential through the loaded config.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when reading the file fails, [`ConfigError::Yaml`]
/// when parsing fails, or [`ConfigError::Validation`] when semantic validation fails.
pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let mut config: AppConfig = serde_yaml::from_str(&contents)?;
    if let Ok(key) = std::env::var(API_KEY_ENV_VAR) {
        if !key.trim().is_empty() {
            config.upstream.api_key = key.trim().to_string();
        }
    }
    validate_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_example_config() {
        // The example config should load and validate successfully
        let config = load_config("config.example.yaml");
        assert!(
            config.is_ok(),
            "Failed to load example config: {:?}",
            config.err()
        );
        let config = config.unwrap();
        assert_eq!(config.server.port, 8788);
        assert_eq!(config.server.http_pool_max_idle_per_host, 16);
        assert_eq!(config.upstream.base_url, "https://api.perplexity.ai");
        assert_eq!(config.upstream.key_prefix, "pplx-");
        assert_eq!(config.upstream.chat_model, CompletionModel::SonarPro);
        assert_eq!(config.upstream.lookup_model, CompletionModel::Sonar);
        assert_eq!(config.cors.allowed_origins.len(), 3);
    }

    #[test]
    fn test_server_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.port, 8788);
        assert_eq!(server.timeout, 180);
        assert!(server.base_path.is_empty());
    }

    #[test]
    fn test_upstream_defaults() {
        let upstream = UpstreamConfig::default();
        assert_eq!(upstream.base_url, "https://api.perplexity.ai");
        assert!(upstream.api_key.is_empty());
        assert_eq!(upstream.chat_model, CompletionModel::SonarPro);
        assert_eq!(upstream.lookup_model, CompletionModel::Sonar);
    }

    #[test]
    fn test_minimal_yaml_parses_with_defaults() {
        let yaml = "cors:\n  allowed_origins:\n    - http://localhost:3000\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 8788);
        assert_eq!(config.features.log_level, "INFO");
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3000"]);
    }
}
