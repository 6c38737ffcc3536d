use crate::constants::{API_KEY_ENV, DEFAULT_BASE_URL, LOG_FILE_NAME, window};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_fixtures_dir_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// The Odds API key. Required for live requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL of the odds API, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// Optional request timeout. No timeout is applied when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_timeout_seconds: Option<u64>,
    /// IANA timezone used by the window filter when the caller names none.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Betting region used by the window filter when the caller names none.
    #[serde(default = "default_region")]
    pub region: String,
    /// Serve tool calls from fixture files instead of the live API.
    #[serde(default)]
    pub test_mode: bool,
    /// Directory holding fixture files for offline/test mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixtures_dir: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timezone() -> String {
    window::DEFAULT_TIMEZONE.to_string()
}

fn default_region() -> String {
    window::DEFAULT_REGION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            base_url: default_base_url(),
            log_file_path: None,
            http_timeout_seconds: None,
            timezone: default_timezone(),
            region: default_region(),
            test_mode: false,
            fixtures_dir: None,
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location, falling back
    /// to defaults when no file exists. `.env` and `config/.env` are read first,
    /// then environment variables override file values.
    ///
    /// # Environment Variables
    /// - `ODDS_API_KEY` - API key
    /// - `WAGYU_BASE_URL` - Override base URL
    /// - `WAGYU_LOG_FILE` - Override log file path
    /// - `WAGYU_HTTP_TIMEOUT` - Request timeout in seconds
    /// - `WAGYU_TIMEZONE` - Default timezone for the window filter
    /// - `WAGYU_FIXTURES_DIR` - Fixture directory for offline mode
    pub async fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        dotenvy::from_filename("config/.env").ok();

        let config_path = get_config_path();
        let mut config = if Path::new(&config_path).exists() {
            debug!("Loading config from {config_path}");
            let content = fs::read_to_string(&config_path).await?;
            toml::from_str(&content)?
        } else {
            debug!("No config file at {config_path}, using defaults");
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies environment variable overrides on top of the current values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var(API_KEY_ENV)
            && !api_key.trim().is_empty()
        {
            self.api_key = Some(api_key);
        }

        if let Ok(base_url) = std::env::var("WAGYU_BASE_URL") {
            self.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Ok(log_file_path) = std::env::var("WAGYU_LOG_FILE") {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var("WAGYU_HTTP_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = Some(timeout);
        }

        if let Ok(timezone) = std::env::var("WAGYU_TIMEZONE") {
            self.timezone = timezone;
        }

        if let Ok(fixtures_dir) = std::env::var("WAGYU_FIXTURES_DIR") {
            self.fixtures_dir = Some(fixtures_dir);
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(
            &self.base_url,
            self.api_key.as_deref(),
            self.http_timeout_seconds,
            &self.log_file_path,
        )
    }

    /// Returns the API key or a configuration error when it is missing.
    /// Callers check this before building a live client so no request is
    /// ever sent without a key.
    pub fn require_api_key(&self) -> Result<&str, AppError> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(AppError::config_error(format!(
                "{API_KEY_ENV} is not set; provide it via environment, .env file, config file or --api-key"
            ))),
        }
    }

    /// Fixture directory for offline mode, defaulting to the platform config dir.
    pub fn fixtures_dir_or_default(&self) -> String {
        self.fixtures_dir
            .clone()
            .unwrap_or_else(get_fixtures_dir_path)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout. The API key is masked.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        if Path::new(&config_path).exists() {
            let config = Config::load().await?;
            println!("\nCurrent Configuration");
            println!("────────────────────────────────────");
            println!("Config Location:");
            println!("{config_path}");
            println!("────────────────────────────────────");
            println!("API Key:");
            println!("{}", mask_api_key(config.api_key.as_deref()));
            println!("────────────────────────────────────");
            println!("Base URL:");
            println!("{}", config.base_url);
            println!("────────────────────────────────────");
            println!("HTTP Timeout:");
            match config.http_timeout_seconds {
                Some(seconds) => println!("{seconds} seconds"),
                None => println!("none"),
            }
            println!("────────────────────────────────────");
            println!("Default Timezone / Region:");
            println!("{} / {}", config.timezone, config.region);
            println!("────────────────────────────────────");
            println!("Test Mode:");
            println!(
                "{} (fixtures: {})",
                config.test_mode,
                config.fixtures_dir_or_default()
            );
            println!("────────────────────────────────────");
            println!("Log File Location:");
            if let Some(custom_path) = &config.log_file_path {
                println!("{custom_path}");
            } else {
                println!("{log_dir}/{LOG_FILE_NAME}");
                println!("(Default location)");
            }
        } else {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path, creating the parent
    /// directory when needed. A trailing slash on the base URL is dropped.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }

        let content = toml::to_string_pretty(&Config {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            ..self.clone()
        })?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path without env overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Shows the last four characters of a key, enough to tell keys apart.
fn mask_api_key(api_key: Option<&str>) -> String {
    match api_key {
        None => "(not set)".to_string(),
        Some(key) if key.chars().count() <= 4 => "****".to_string(),
        Some(key) => {
            let tail: String = key.chars().skip(key.chars().count() - 4).collect();
            format!("****{tail}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn clear_env() {
        unsafe {
            std::env::remove_var(API_KEY_ENV);
            std::env::remove_var("WAGYU_BASE_URL");
            std::env::remove_var("WAGYU_LOG_FILE");
            std::env::remove_var("WAGYU_HTTP_TIMEOUT");
            std::env::remove_var("WAGYU_TIMEZONE");
            std::env::remove_var("WAGYU_FIXTURES_DIR");
        }
    }

    #[tokio::test]
    async fn test_config_load_existing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let config_content = r#"
api_key = "secret-key"
base_url = "https://odds.example.com/v4"
timezone = "Europe/Helsinki"
http_timeout_seconds = 15
"#;
        tokio::fs::write(&config_path, config_content).await.unwrap();

        let config = Config::load_from_path(&config_path_str).await.unwrap();

        assert_eq!(config.api_key.as_deref(), Some("secret-key"));
        assert_eq!(config.base_url, "https://odds.example.com/v4");
        assert_eq!(config.timezone, "Europe/Helsinki");
        assert_eq!(config.http_timeout_seconds, Some(15));
        assert_eq!(config.region, "us");
        assert!(!config.test_mode);
    }

    #[tokio::test]
    async fn test_config_empty_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "").await.unwrap();

        let config = Config::load_from_path(&config_path.to_string_lossy())
            .await
            .unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timezone, "America/Los_Angeles");
        assert_eq!(config.http_timeout_seconds, None);
    }

    #[tokio::test]
    async fn test_config_malformed_toml_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "api_key = [unclosed")
            .await
            .unwrap();

        let result = Config::load_from_path(&config_path.to_string_lossy()).await;
        assert!(matches!(result.unwrap_err(), AppError::TomlDeserialize(_)));
    }

    #[tokio::test]
    async fn test_config_save_and_load_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let original = Config {
            api_key: Some("abc123".to_string()),
            base_url: "https://odds.example.com/v4/".to_string(),
            test_mode: true,
            fixtures_dir: Some("/tmp/fixtures".to_string()),
            ..Config::default()
        };
        original.save_to_path(&config_path_str).await.unwrap();
        assert!(config_path.exists());

        let loaded = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(loaded.api_key, original.api_key);
        assert_eq!(loaded.base_url, "https://odds.example.com/v4");
        assert!(loaded.test_mode);
        assert_eq!(loaded.fixtures_dir.as_deref(), Some("/tmp/fixtures"));
    }

    #[test]
    fn test_optional_fields_not_serialized_when_none() {
        let toml_string = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(!toml_string.contains("api_key"));
        assert!(!toml_string.contains("log_file_path"));
        assert!(!toml_string.contains("http_timeout_seconds"));
        assert!(toml_string.contains("base_url"));
    }

    #[test]
    fn test_require_api_key() {
        let config = Config::default();
        let err = config.require_api_key().unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("ODDS_API_KEY"));

        let config = Config {
            api_key: Some("key".to_string()),
            ..Config::default()
        };
        assert_eq!(config.require_api_key().unwrap(), "key");
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key(None), "(not set)");
        assert_eq!(mask_api_key(Some("abc")), "****");
        assert_eq!(mask_api_key(Some("0123456789abcdef")), "****cdef");
    }

    #[test]
    #[serial]
    fn test_environment_variable_override() {
        clear_env();
        unsafe {
            std::env::set_var(API_KEY_ENV, "env-key");
            std::env::set_var("WAGYU_BASE_URL", "http://localhost:9999/v4/");
            std::env::set_var("WAGYU_HTTP_TIMEOUT", "12");
            std::env::set_var("WAGYU_TIMEZONE", "Europe/London");
        }

        let mut config = Config {
            api_key: Some("file-key".to_string()),
            ..Config::default()
        };
        config.apply_env_overrides();

        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.base_url, "http://localhost:9999/v4");
        assert_eq!(config.http_timeout_seconds, Some(12));
        assert_eq!(config.timezone, "Europe/London");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_env_api_key_does_not_override() {
        clear_env();
        unsafe {
            std::env::set_var(API_KEY_ENV, "  ");
        }

        let mut config = Config {
            api_key: Some("file-key".to_string()),
            ..Config::default()
        };
        config.apply_env_overrides();
        assert_eq!(config.api_key.as_deref(), Some("file-key"));

        clear_env();
    }

    #[tokio::test]
    async fn test_config_display_runs() {
        let result = Config::display().await;
        assert!(result.is_ok());
    }
}
