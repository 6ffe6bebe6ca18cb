use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - TMDB API key is set
/// - Primary and secondary locales differ
/// - At least one cast member is kept
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.tmdb.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "tmdb.api_key cannot be empty".to_string(),
        ));
    }

    if config.locales.primary_language() == config.locales.secondary_language() {
        return Err(ConfigError::ValidationError(format!(
            "locales.primary ({}) and locales.secondary ({}) must use different languages",
            config.locales.primary, config.locales.secondary
        )));
    }

    if config.ingest.max_cast == 0 {
        return Err(ConfigError::ValidationError(
            "ingest.max_cast must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn valid_config() -> Config {
        load_config_from_str(
            r#"
[tmdb]
api_key = "key"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = valid_config();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_api_key_fails() {
        let mut config = valid_config();
        config.tmdb.api_key = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_same_language_fails() {
        let mut config = valid_config();
        config.locales.primary = "az-AZ".to_string();
        config.locales.secondary = "az".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_cast_fails() {
        let mut config = valid_config();
        config.ingest.max_cast = 0;
        assert!(validate_config(&config).is_err());
    }
}
