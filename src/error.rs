use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to fetch data from API: {0}")]
    ApiFetch(#[from] reqwest::Error),

    #[error("Failed to parse API response: {0}")]
    ApiParse(#[from] serde_json::Error),

    /// Any non-2xx answer from the odds API. The URL never contains the API key.
    #[error("Upstream API returned HTTP {status}: {body} (URL: {url})")]
    Upstream {
        status: u16,
        body: String,
        url: String,
    },

    // Network-specific errors
    #[error("Network timeout while fetching data from: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    #[error("API returned malformed JSON: {message} (URL: {url})")]
    ApiMalformedJson { message: String, url: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Date/time parsing error: {0}")]
    DateTimeParse(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),

    #[error("MCP session error: {0}")]
    Mcp(String),
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a date/time parsing error with context
    pub fn datetime_parse_error(msg: impl Into<String>) -> Self {
        Self::DateTimeParse(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create an MCP session error (handshake or transport failure)
    pub fn mcp_error(msg: impl Into<String>) -> Self {
        Self::Mcp(msg.into())
    }

    /// Create an error for a non-2xx upstream response
    pub fn upstream(status: u16, body: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
            url: url.into(),
        }
    }

    /// Create an invalid argument error (empty path, empty sport key, ...)
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a fixture loading error
    pub fn fixture_error(msg: impl Into<String>) -> Self {
        Self::Fixture(msg.into())
    }

    /// Create a network timeout error
    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    /// Create a network connection error
    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a malformed JSON error
    pub fn api_malformed_json(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiMalformedJson {
            message: message.into(),
            url: url.into(),
        }
    }

    /// True for errors that are reported before any network I/O happens
    pub fn is_config_error(&self) -> bool {
        matches!(self, AppError::Config(_))
    }

    /// True for non-2xx answers from the odds API
    pub fn is_upstream(&self) -> bool {
        matches!(self, AppError::Upstream { .. })
    }

    /// HTTP status of an upstream failure, if this is one
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_helper() {
        let error = AppError::config_error("ODDS_API_KEY is not set");
        assert!(matches!(error, AppError::Config(_)));
        assert!(error.is_config_error());
        assert_eq!(
            error.to_string(),
            "Configuration error: ODDS_API_KEY is not set"
        );
    }

    #[test]
    fn test_upstream_helper() {
        let error = AppError::upstream(
            401,
            r#"{"message":"API key is not valid"}"#,
            "https://api.the-odds-api.com/v4/sports",
        );
        assert_eq!(error.upstream_status(), Some(401));
        assert!(error.is_upstream());
        assert!(!error.is_config_error());
        assert_eq!(
            error.to_string(),
            r#"Upstream API returned HTTP 401: {"message":"API key is not valid"} (URL: https://api.the-odds-api.com/v4/sports)"#
        );
    }

    #[test]
    fn test_invalid_argument_helper() {
        let error = AppError::invalid_argument("sport key must not be empty");
        assert!(matches!(error, AppError::InvalidArgument(_)));
        assert_eq!(error.upstream_status(), None);
        assert_eq!(
            error.to_string(),
            "Invalid argument: sport key must not be empty"
        );
    }

    #[test]
    fn test_fixture_error_helper() {
        let error = AppError::fixture_error("Fixture file sports.json not found");
        assert_eq!(
            error.to_string(),
            "Fixture error: Fixture file sports.json not found"
        );
    }

    #[test]
    fn test_mcp_error_helper() {
        let error = AppError::mcp_error("connection closed: initialize request");
        assert!(matches!(error, AppError::Mcp(_)));
        assert!(!error.is_config_error());
        assert_eq!(
            error.to_string(),
            "MCP session error: connection closed: initialize request"
        );
    }

    #[test]
    fn test_network_helpers() {
        let timeout = AppError::network_timeout("https://api.example.com");
        assert_eq!(
            timeout.to_string(),
            "Network timeout while fetching data from: https://api.example.com"
        );

        let connection = AppError::network_connection("https://api.example.com", "refused");
        assert_eq!(
            connection.to_string(),
            "Connection failed to: https://api.example.com - refused"
        );
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_error: AppError = json_error.into();
        assert!(matches!(app_error, AppError::ApiParse(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert!(matches!(app_error, AppError::Io(_)));
    }

    #[test]
    fn test_error_from_toml_deserialize() {
        let toml_error = toml::from_str::<serde_json::Value>("invalid = [toml").unwrap_err();
        let app_error: AppError = toml_error.into();
        assert!(matches!(app_error, AppError::TomlDeserialize(_)));
    }

    #[test]
    fn test_error_from_reqwest() {
        let client = reqwest::Client::new();
        match client.get("not a valid url").build() {
            Err(reqwest_error) => {
                let app_error: AppError = reqwest_error.into();
                assert!(matches!(app_error, AppError::ApiFetch(_)));
            }
            Ok(_) => panic!("Expected an error from invalid URL"),
        }
    }
}
