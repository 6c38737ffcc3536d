use std::path::Path;

const APP_DIR: &str = "wagyu_sports";

/// Returns the platform-specific path for the config file.
///
/// # Notes
/// - Uses platform-specific config directory (e.g., ~/.config on Linux)
/// - Falls back to current directory if config directory is unavailable
pub fn get_config_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_DIR)
        .join("config.toml")
        .to_string_lossy()
        .to_string()
}

/// Returns the platform-specific path for the log directory.
pub fn get_log_dir_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_DIR)
        .join("logs")
        .to_string_lossy()
        .to_string()
}

/// Returns the default fixtures directory used in offline/test mode.
pub fn get_fixtures_dir_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_DIR)
        .join("fixtures")
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_app_directory() {
        let config_path = get_config_path();
        assert!(config_path.contains(APP_DIR));
        assert!(config_path.ends_with("config.toml"));

        let log_dir = get_log_dir_path();
        assert!(log_dir.contains(APP_DIR));
        assert!(log_dir.ends_with("logs"));

        assert!(get_fixtures_dir_path().ends_with("fixtures"));
    }
}
