use crate::config::types::GateConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and validates a gate configuration from a TOML file
///
/// Missing fields fall back to their defaults, so an empty file is a valid
/// configuration.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(GateConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate the file
pub fn load_config(path: &Path) -> Result<GateConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: GateConfig = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write config");
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            "search-path = \"/crawler-policy.txt\"\n\
             fetch-timeout-secs = 15\n\
             connect-timeout-secs = 5\n",
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.search_path, "/crawler-policy.txt");
        assert_eq!(config.fetch_timeout_secs, 15);
        assert_eq!(config.connect_timeout_secs, 5);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.search_path, "/robots.txt");
        assert_eq!(config.fetch_timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let file = write_config("search-path = \"/alt.txt\"\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.search_path, "/alt.txt");
        assert_eq!(config.fetch_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let file = write_config("search-path = [not toml");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = write_config("search-path = \"relative.txt\"\n");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_file_rejected() {
        let result = load_config(Path::new("/nonexistent/teinei.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
