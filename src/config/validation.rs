use crate::config::types::{Config, OutputConfig, ScraperConfig, TargetEntry};
use crate::records::Target;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_output_config(&config.output)?;
    validate_targets(&config.targets)?;
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.max_retries < 1 || config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be between 1 and 10, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the target list
fn validate_targets(targets: &[TargetEntry]) -> Result<(), ConfigError> {
    if targets.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[target]] must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();

    for entry in targets {
        // The name must map to a known target
        entry.name.parse::<Target>().map_err(|_| {
            ConfigError::Validation(format!("unknown target name '{}'", entry.name))
        })?;

        if !seen.insert(entry.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate target '{}'",
                entry.name
            )));
        }

        if entry.urls.is_empty() {
            return Err(ConfigError::Validation(format!(
                "target '{}' has no URLs",
                entry.name
            )));
        }

        for url in &entry.urls {
            Url::parse(url).map_err(|e| {
                ConfigError::InvalidUrl(format!("target '{}': {}: {}", entry.name, url, e))
            })?;
        }
    }

    Ok(())
}
