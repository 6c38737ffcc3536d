//! Wagyu Sports: a client for The Odds API with an MCP tool server.
//!
//! The library wraps the odds API's sports and odds endpoints, tracks the
//! API's rate-limit counters, finds sports with games inside a time window,
//! and exposes those operations as MCP tools.
//!
//! # Examples
//!
//! ```rust,no_run
//! use wagyu_sports::odds_api::{OddsClient, OddsOptions, WindowRequest};
//! use wagyu_sports::error::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let mut client = OddsClient::new("your-api-key")?;
//!
//!     let sports = client.get_sports(false).await?;
//!     println!("{}", sports.data);
//!
//!     let options = OddsOptions::new().regions("us").markets("h2h");
//!     let odds = client.get_odds("basketball_nba", &options).await?;
//!     println!("remaining requests: {:?}", odds.headers.requests_remaining);
//!
//!     let request = WindowRequest::parse(None, None, Some("America/New_York"))?;
//!     let report = client.sports_with_games_in_window("us", &request).await?;
//!     println!("{} sports playing today", report.data.len());
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod mcp;
pub mod odds_api;
pub mod snapshots;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::AppError;
pub use mcp::OddsMcpServer;
pub use odds_api::{Envelope, FixtureSource, OddsClient, OddsOptions, QuotaHeaders, WindowReport, WindowRequest};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
