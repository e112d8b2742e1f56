use crate::config::types::{Config, FetchConfig, OutputConfig, PaginationConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on retries so a dead host cannot stall a run for minutes
const MAX_RETRIES_LIMIT: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetch_config(&config.fetch)?;
    validate_pagination_config(&config.pagination)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the base URL
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' cannot be used as a base",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates request timing and retry settings
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.max_retries > MAX_RETRIES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-retries must be <= {}, got {}",
            MAX_RETRIES_LIMIT, config.max_retries
        )));
    }

    if config.max_retries > 0 && config.backoff_base_ms < 1 {
        return Err(ConfigError::Validation(
            "backoff-base-ms must be >= 1 when retries are enabled".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_pagination_config(config: &PaginationConfig) -> Result<(), ConfigError> {
    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1 when set".to_string(),
        ));
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    if config.tag_delimiter.is_empty() {
        return Err(ConfigError::Validation(
            "tag-delimiter cannot be empty".to_string(),
        ));
    }

    if config
        .tag_delimiter
        .chars()
        .any(|c| c == '"' || c == '\r' || c == '\n')
    {
        return Err(ConfigError::Validation(format!(
            "tag-delimiter {:?} must not contain quotes or line breaks",
            config.tag_delimiter
        )));
    }

    Ok(())
}
