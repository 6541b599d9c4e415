//! Configuration management
//!
//! Settings live in `~/.config/compinv/config.toml`.
//! Priority: CLI argument > COMPINV_URL / COMPINV_TOKEN environment variable > config.toml > default

use super::Result;
use crate::core::debounce::DEFAULT_SEARCH_DEBOUNCE;
use crate::core::source::DEFAULT_PAGE_SIZE;
use crate::error::{AppError, CliError, ConfigError, StorageError};
use crate::utils::validation::{validate_page_size, validate_url};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const URL_ENV: &str = "COMPINV_URL";
pub const TOKEN_ENV: &str = "COMPINV_TOKEN";

/// Keys accepted by `config set`
pub const CONFIG_KEYS: [&str; 5] = [
    "url",
    "token",
    "page_size",
    "search_debounce_ms",
    "export_dir",
];

/// Application configuration
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Inventory API base URL
    pub url: Option<String>,
    /// Pre-issued bearer token
    pub token: Option<String>,
    pub page_size: Option<usize>,
    pub search_debounce_ms: Option<u64>,
    /// Directory export files are written to
    pub export_dir: Option<PathBuf>,
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

impl Config {
    /// Load configuration from file
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            log::debug!("no config file at {}", config_path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: format!("Failed to parse config file: {}", e),
            })?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or(StorageError::ConfigDirNotFound)?;
        Ok(Self::file_in(&home_dir.join(".config").join("compinv")))
    }

    /// Config file inside an explicit config directory
    pub fn file_in(config_dir: &Path) -> PathBuf {
        config_dir.join("config.toml")
    }

    /// URL with CLI and environment overrides
    pub fn get_url(&self, cli: Option<&str>) -> Option<String> {
        self.resolve_url(cli, env_value(URL_ENV))
    }

    pub fn resolve_url(&self, cli: Option<&str>, env: Option<String>) -> Option<String> {
        cli.map(str::to_string)
            .or(env)
            .or_else(|| self.url.clone())
            .filter(|s| !s.is_empty())
    }

    /// URL or a configuration error telling how to set it
    pub fn require_url(&self, cli: Option<&str>) -> std::result::Result<String, AppError> {
        let url = self.get_url(cli).ok_or_else(|| ConfigError::MissingField {
            field: "url".to_string(),
            hint: format!(
                "Pass --url, set {} or run 'compinv config set url <URL>'",
                URL_ENV
            ),
        })?;
        validate_url(&url)?;
        Ok(url)
    }

    pub fn get_token(&self, cli: Option<&str>) -> Option<String> {
        self.resolve_token(cli, env_value(TOKEN_ENV))
    }

    pub fn resolve_token(&self, cli: Option<&str>, env: Option<String>) -> Option<String> {
        cli.map(str::to_string)
            .or(env)
            .or_else(|| self.token.clone())
            .filter(|s| !s.is_empty())
    }

    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn search_debounce(&self) -> Duration {
        self.search_debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SEARCH_DEBOUNCE)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Set a single key from its string form, validating the value
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), AppError> {
        match key {
            "url" => {
                validate_url(value)?;
                self.url = Some(value.trim_end_matches('/').to_string());
            }
            "token" => self.token = Some(value.to_string()),
            "page_size" => {
                let size = value.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                    field: key.to_string(),
                    value: value.to_string(),
                    reason: "expected a positive integer".to_string(),
                })?;
                validate_page_size(size)?;
                self.page_size = Some(size);
            }
            "search_debounce_ms" => {
                let ms = value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    field: key.to_string(),
                    value: value.to_string(),
                    reason: "expected milliseconds as an integer".to_string(),
                })?;
                self.search_debounce_ms = Some(ms);
            }
            "export_dir" => self.export_dir = Some(PathBuf::from(value)),
            other => {
                return Err(CliError::InvalidArguments(format!(
                    "Unknown config key '{}'. Valid keys: {}",
                    other,
                    CONFIG_KEYS.join(", ")
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Key/value pairs for display; the token is masked
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let unset = || "(not set)".to_string();
        vec![
            ("url", self.url.clone().unwrap_or_else(unset)),
            (
                "token",
                self.token
                    .as_ref()
                    .map(|_| "********".to_string())
                    .unwrap_or_else(unset),
            ),
            ("page_size", self.page_size().to_string()),
            (
                "search_debounce_ms",
                self.search_debounce().as_millis().to_string(),
            ),
            ("export_dir", self.export_dir().display().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.url.is_none());
        assert_eq!(config.page_size(), 50);
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_url_priority() {
        let config = Config {
            url: Some("http://file.test".to_string()),
            ..Default::default()
        };

        assert_eq!(
            config.resolve_url(Some("http://cli.test"), Some("http://env.test".to_string())),
            Some("http://cli.test".to_string())
        );
        assert_eq!(
            config.resolve_url(None, Some("http://env.test".to_string())),
            Some("http://env.test".to_string())
        );
        assert_eq!(
            config.resolve_url(None, None),
            Some("http://file.test".to_string())
        );
        assert_eq!(Config::default().resolve_url(None, None), None);
    }

    #[test]
    fn test_token_priority() {
        let config = Config {
            token: Some("file-token".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_token(None, Some("env-token".to_string())),
            Some("env-token".to_string())
        );
        assert_eq!(
            config.resolve_token(None, None),
            Some("file-token".to_string())
        );
    }

    #[test]
    fn test_set_validates_values() {
        let mut config = Config::default();
        config.set("url", "http://inventory.test/api/").unwrap();
        assert_eq!(config.url.as_deref(), Some("http://inventory.test/api"));

        assert!(config.set("url", "inventory.test").is_err());
        assert!(config.set("page_size", "0").is_err());
        assert!(config.set("page_size", "abc").is_err());
        assert!(config.set("colour", "red").is_err());

        config.set("page_size", "100").unwrap();
        config.set("search_debounce_ms", "150").unwrap();
        assert_eq!(config.page_size(), 100);
        assert_eq!(config.search_debounce(), Duration::from_millis(150));
    }

    #[test]
    fn test_entries_mask_token() {
        let config = Config {
            token: Some("secret".to_string()),
            ..Default::default()
        };
        let entries = config.entries();
        let token = entries.iter().find(|(k, _)| *k == "token").unwrap();
        assert_eq!(token.1, "********");
        assert!(entries.iter().all(|(_, v)| !v.contains("secret")));
    }

    #[test]
    fn test_config_load_save() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = Config::file_in(temp_dir.path());

        let mut config = Config::default();
        config.set("url", "http://example.test").unwrap();
        config.set("page_size", "25").unwrap();

        config
            .save(Some(config_path.clone()))
            .expect("Failed to save config");

        let loaded_config = Config::load(Some(config_path)).expect("Failed to load config");
        assert_eq!(loaded_config, config);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let nonexistent_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load(Some(nonexistent_path)).expect("Failed to load default config");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "url = [unterminated").unwrap();

        match Config::load(Some(config_path)) {
            Err(StorageError::ConfigParseError { message }) => {
                assert!(message.starts_with("Failed to parse config file"))
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
