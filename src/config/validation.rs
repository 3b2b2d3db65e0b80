use super::{AppConfig, ConfigError};

/// Validate the full application config, returning an error if any rule is violated.
///
/// The upstream credential is deliberately not checked here: per-request
/// validation surfaces a missing or malformed key as a configuration error on
/// the response, without preventing startup.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] when any configuration invariant is violated.
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    validate_server_config(config)?;
    validate_upstream(config)?;
    validate_allowed_origins(config)?;
    validate_log_level(config)?;
    Ok(())
}

fn validation_err(msg: impl Into<String>) -> ConfigError {
    ConfigError::Validation(msg.into())
}

fn validate_server_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.http_pool_max_idle_per_host == 0 {
        return Err(validation_err(
            "server.http_pool_max_idle_per_host must be greater than 0",
        ));
    }
    if config.server.timeout == 0 {
        return Err(validation_err("server.timeout must be greater than 0"));
    }
    Ok(())
}

fn validate_upstream(config: &AppConfig) -> Result<(), ConfigError> {
    let upstream = &config.upstream;
    if !upstream.base_url.starts_with("http://") && !upstream.base_url.starts_with("https://") {
        return Err(validation_err(
            "upstream.base_url must start with http:// or https://",
        ));
    }
    if url::Url::parse(&upstream.base_url).is_err() {
        return Err(validation_err("upstream.base_url is not a valid URL"));
    }
    if upstream.key_prefix.trim().is_empty() {
        return Err(validation_err("upstream.key_prefix cannot be empty"));
    }
    Ok(())
}

fn validate_allowed_origins(config: &AppConfig) -> Result<(), ConfigError> {
    if config.cors.allowed_origins.is_empty() {
        return Err(validation_err("cors.allowed_origins cannot be empty"));
    }
    for origin in &config.cors.allowed_origins {
        if origin.trim().is_empty() {
            return Err(validation_err("cors.allowed_origins contains an empty origin"));
        }
        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            return Err(validation_err(format!(
                "Origin '{origin}': must start with http:// or https://"
            )));
        }
        if origin.ends_with('/') {
            return Err(validation_err(format!(
                "Origin '{origin}': must not have a trailing slash (origins are matched exactly)"
            )));
        }
    }
    Ok(())
}

fn validate_log_level(config: &AppConfig) -> Result<(), ConfigError> {
    let valid_levels = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL", "DISABLED"];
    if !valid_levels.contains(&config.features.log_level.to_uppercase().as_str()) {
        return Err(validation_err(format!(
            "log_level must be one of {valid_levels:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::*;

    fn make_valid_config() -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            upstream: UpstreamConfig {
                api_key: "pplx-test".to_string(),
                ..UpstreamConfig::default()
            },
            cors: CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            },
            features: FeaturesConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        let config = make_valid_config();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_allowed_origins() {
        let mut config = make_valid_config();
        config.cors.allowed_origins = vec![];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_origin_without_scheme() {
        let mut config = make_valid_config();
        config.cors.allowed_origins = vec!["localhost:3000".to_string()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_origin_with_trailing_slash() {
        let mut config = make_valid_config();
        config.cors.allowed_origins = vec!["http://localhost:3000/".to_string()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = make_valid_config();
        config.upstream.base_url = "ftp://bad.url".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_api_key_is_allowed_at_load_time() {
        let mut config = make_valid_config();
        config.upstream.api_key = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_key_prefix() {
        let mut config = make_valid_config();
        config.upstream.key_prefix = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = make_valid_config();
        config.features.log_level = "VERBOSE".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = make_valid_config();
        config.server.timeout = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_pool_max_idle() {
        let mut config = make_valid_config();
        config.server.http_pool_max_idle_per_host = 0;
        assert!(validate_config(&config).is_err());
    }
}
