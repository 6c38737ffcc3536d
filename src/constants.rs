//! Application-wide constants and configuration values
//!
//! Upstream endpoints, header names and defaults live here so the client,
//! the window filter and the MCP server agree on them.

/// Base URL of The Odds API v4
pub const DEFAULT_BASE_URL: &str = "https://api.the-odds-api.com/v4";

/// Query parameter carrying the API key
pub const API_KEY_PARAM: &str = "apiKey";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "ODDS_API_KEY";

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Rate-limit headers returned by the odds API
pub mod headers {
    /// Requests left in the current billing period
    pub const REQUESTS_REMAINING: &str = "x-requests-remaining";

    /// Requests used in the current billing period
    pub const REQUESTS_USED: &str = "x-requests-used";
}

/// Defaults for the time-window filter
pub mod window {
    /// Timezone used when the caller does not name one
    pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

    /// Betting region used when the caller does not name one
    pub const DEFAULT_REGION: &str = "us";

    /// Date format requested for per-sport odds so commence times are ISO-8601
    pub const ODDS_DATE_FORMAT: &str = "iso";
}

/// Fixture files served in offline/test mode
pub mod fixtures {
    pub const SPORTS_FILE: &str = "sports.json";
    pub const ODDS_FALLBACK_FILE: &str = "odds.json";
    pub const QUOTA_FILE: &str = "quota.json";

    /// Key written by capture tooling that is not part of the response
    pub const METADATA_KEY: &str = "_metadata";
}

/// MCP server identity and protocol constants
pub mod mcp {
    pub const SERVER_NAME: &str = "wagyu-sports-mcp";
    pub const SPORTS_RESOURCE_URI: &str = "wagyu://sports";
}

/// Root directory for saved response snapshots
pub const SNAPSHOT_ROOT_DIR: &str = "test_outputs";

/// Default log file name
pub const LOG_FILE_NAME: &str = "wagyu_sports.log";
