use crate::config::types::{Config, CredentialsConfig, EndpointsConfig, RunConfig};
use crate::storage::MAX_CACHE_HORIZON_DAYS;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_run_config(&config.run)?;
    validate_credentials_config(&config.credentials)?;
    validate_endpoints(&config.endpoints)?;
    Ok(())
}

/// Validates run configuration
fn validate_run_config(config: &RunConfig) -> Result<(), ConfigError> {
    if config.batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be >= 1, got {}",
            config.batch_size
        )));
    }

    if config.max_retries > 20 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 20, got {}",
            config.max_retries
        )));
    }

    if config.cache_horizon_days < 1 || config.cache_horizon_days > MAX_CACHE_HORIZON_DAYS {
        return Err(ConfigError::Validation(format!(
            "cache_horizon_days must be between 1 and {}, got {}",
            MAX_CACHE_HORIZON_DAYS, config.cache_horizon_days
        )));
    }

    if config.cache_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "cache_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_credentials_config(config: &CredentialsConfig) -> Result<(), ConfigError> {
    if config.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "credentials path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every endpoint is an absolute http(s) URL
fn validate_endpoints(config: &EndpointsConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("search-console", &config.search_console),
        ("webmasters", &config.webmasters),
        ("indexing", &config.indexing),
        ("token", &config.token),
    ] {
        let url = Url::parse(value)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} endpoint: {}", name, e)))?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ConfigError::Validation(format!(
                "{} endpoint '{}' must use http or https",
                name, value
            )));
        }
    }

    Ok(())
}
