pub mod client;
pub mod fixtures;
pub mod http_client;
pub mod models;
pub mod options;
pub mod urls;
pub mod window;

pub use client::OddsClient;
pub use fixtures::FixtureSource;
pub use http_client::create_http_client;
pub use models::{Envelope, QuotaHeaders, QuotaInfo, Sport, WindowReport};
pub use options::OddsOptions;
pub use urls::{build_query, build_url, odds_path, sports_path, validate_sport_key};
pub use window::{ResolvedWindow, TimeBound, WindowRequest, resolve_timezone};
