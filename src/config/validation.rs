use crate::config::types::GateConfig;
use crate::ConfigError;

/// Validates a gate configuration
///
/// # Arguments
///
/// * `config` - The configuration to validate
///
/// # Returns
///
/// * `Ok(())` - The configuration is usable
/// * `Err(ConfigError)` - A field is out of range
pub fn validate(config: &GateConfig) -> Result<(), ConfigError> {
    if !config.search_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "search-path must be an absolute path starting with '/', got: {}",
            config.search_path
        )));
    }

    if config.fetch_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch-timeout-secs must be greater than zero".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
