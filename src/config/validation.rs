use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - Base URL cannot be empty and must use http:// or https://
/// - API key, if present, cannot be blank
/// - HTTP timeout, if present, must be greater than zero
/// - If log file path is provided, it cannot be empty and its parent directory
///   must exist or be creatable
pub fn validate_config(
    base_url: &str,
    api_key: Option<&str>,
    http_timeout_seconds: Option<u64>,
    log_file_path: &Option<String>,
) -> Result<(), AppError> {
    if base_url.is_empty() {
        return Err(AppError::config_error("Base URL cannot be empty"));
    }

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(AppError::config_error(
            "Base URL must start with http:// or https://",
        ));
    }

    if let Some(key) = api_key
        && key.trim().is_empty()
    {
        return Err(AppError::config_error("API key cannot be blank"));
    }

    if http_timeout_seconds == Some(0) {
        return Err(AppError::config_error(
            "HTTP timeout must be greater than zero seconds",
        ));
    }

    if let Some(log_path) = log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
