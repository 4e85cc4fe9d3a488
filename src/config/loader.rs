//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ToolkitConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `api.base_url`.
pub const ENV_API_URL: &str = "API_URL";

/// Environment variable overriding `api.environment`.
pub const ENV_APP_ENV: &str = "APP_ENV";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load, override from the environment and validate a TOML configuration file.
pub fn load_config(path: &Path) -> Result<ToolkitConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ToolkitConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    finish(config)
}

/// Like [`load_config`], falling back to defaults when no file is given.
pub fn load_or_default(path: Option<&Path>) -> Result<ToolkitConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => finish(ToolkitConfig::default()),
    }
}

fn finish(mut config: ToolkitConfig) -> Result<ToolkitConfig, ConfigError> {
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment-provided values on top of file values.
pub fn apply_overrides<F>(config: &mut ToolkitConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
        tracing::debug!(base_url = %url, "Base URL taken from environment");
        config.api.base_url = url;
    }

    if let Some(env) = lookup(ENV_APP_ENV).filter(|v| !v.is_empty()) {
        config.api.environment = env;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = ToolkitConfig::default();
        apply_overrides(&mut config, |key| match key {
            ENV_API_URL => Some("https://portal.example.com".into()),
            ENV_APP_ENV => Some("development".into()),
            _ => None,
        });

        assert_eq!(config.api.base_url, "https://portal.example.com");
        assert!(config.api.dev_mode());
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let mut config = ToolkitConfig::default();
        apply_overrides(&mut config, |_| Some(String::new()));
        assert_eq!(config.api.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!("api-toolkit-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[session_timer]\ntimeout_minutes = 0.0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("timeout_minutes"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/api-toolkit.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
