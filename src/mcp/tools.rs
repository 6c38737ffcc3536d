//! Tool arguments and the typed call each tool dispatches to.
//!
//! Input schemas are derived from these structs, so field docs double as the
//! parameter descriptions clients see in `tools/list`.

use rmcp::schemars::JsonSchema;
use serde::Deserialize;

use crate::odds_api::OddsOptions;

pub const GET_SPORTS: &str = "get_sports";
pub const GET_ODDS: &str = "get_odds";
pub const GET_QUOTA_INFO: &str = "get_quota_info";
pub const GET_SPORTS_IN_WINDOW: &str = "get_sports_in_window";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[schemars(crate = "rmcp::schemars")]
#[serde(default)]
pub struct GetSportsArgs {
    /// Include out-of-season sports
    pub all_sports: bool,
    /// Override the server's test mode (true for fixture data, false for the live API)
    pub use_test_mode: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
#[schemars(crate = "rmcp::schemars")]
pub struct GetOddsArgs {
    /// Sport key, e.g. basketball_nba
    pub sport: String,
    /// Comma-separated regions, e.g. us,uk
    #[serde(default)]
    pub regions: Option<String>,
    /// Comma-separated markets, e.g. h2h,spreads
    #[serde(default)]
    pub markets: Option<String>,
    /// decimal or american
    #[serde(default)]
    pub odds_format: Option<String>,
    /// unix or iso
    #[serde(default)]
    pub date_format: Option<String>,
    /// Override the server's test mode (true for fixture data, false for the live API)
    #[serde(default)]
    pub use_test_mode: Option<bool>,
}

impl GetOddsArgs {
    /// Query options for the call. Blank strings count as not given.
    pub fn options(&self) -> OddsOptions {
        OddsOptions {
            regions: non_blank(&self.regions),
            markets: non_blank(&self.markets),
            odds_format: non_blank(&self.odds_format),
            date_format: non_blank(&self.date_format),
            extra: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[schemars(crate = "rmcp::schemars")]
#[serde(default)]
pub struct QuotaArgs {
    /// Override the server's test mode (true for fixture data, false for the live API)
    pub use_test_mode: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[schemars(crate = "rmcp::schemars")]
#[serde(default)]
pub struct WindowArgs {
    /// Betting region, defaults to us
    pub region: Option<String>,
    /// Window start, ISO-8601; defaults to now
    pub start_time: Option<String>,
    /// Window end, ISO-8601; defaults to 23:59:59 today in the timezone
    pub end_time: Option<String>,
    /// IANA timezone name, defaults to America/Los_Angeles
    pub timezone: Option<String>,
    /// Override the server's test mode (true for fixture data, false for the live API)
    pub use_test_mode: Option<bool>,
}

/// One tool invocation with its arguments already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    GetSports(GetSportsArgs),
    GetOdds(GetOddsArgs),
    GetQuotaInfo(QuotaArgs),
    GetSportsInWindow(WindowArgs),
}

impl ToolCall {
    /// Per-call override of the server's offline mode.
    pub fn use_test_mode(&self) -> Option<bool> {
        match self {
            ToolCall::GetSports(args) => args.use_test_mode,
            ToolCall::GetOdds(args) => args.use_test_mode,
            ToolCall::GetQuotaInfo(args) => args.use_test_mode,
            ToolCall::GetSportsInWindow(args) => args.use_test_mode,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::GetSports(_) => GET_SPORTS,
            ToolCall::GetOdds(_) => GET_ODDS,
            ToolCall::GetQuotaInfo(_) => GET_QUOTA_INFO,
            ToolCall::GetSportsInWindow(_) => GET_SPORTS_IN_WINDOW,
        }
    }
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_arguments_use_defaults() {
        let args: GetSportsArgs = serde_json::from_value(json!({})).unwrap();
        assert_eq!(args, GetSportsArgs::default());

        let call = ToolCall::GetSports(args);
        assert_eq!(call.use_test_mode(), None);
        assert_eq!(call.name(), GET_SPORTS);
    }

    #[test]
    fn test_get_odds_requires_sport() {
        assert!(serde_json::from_value::<GetOddsArgs>(json!({"regions": "us"})).is_err());
    }

    #[test]
    fn test_get_odds_options_mapping() {
        let args: GetOddsArgs = serde_json::from_value(json!({
            "sport": "basketball_nba",
            "regions": "us",
            "odds_format": "american",
            "use_test_mode": true
        }))
        .unwrap();
        let options = args.options();
        assert_eq!(options.regions.as_deref(), Some("us"));
        assert_eq!(options.odds_format.as_deref(), Some("american"));
        assert_eq!(options.markets, None);
        assert_eq!(ToolCall::GetOdds(args).use_test_mode(), Some(true));
    }

    #[test]
    fn test_get_odds_blank_options_are_dropped() {
        let args: GetOddsArgs = serde_json::from_value(json!({
            "sport": "basketball_nba",
            "regions": "",
            "markets": "   ",
            "odds_format": "decimal",
            "date_format": ""
        }))
        .unwrap();

        let options = args.options();
        assert_eq!(options.regions, None);
        assert_eq!(options.markets, None);
        assert_eq!(options.date_format, None);
        assert_eq!(
            options.to_query(),
            vec![("oddsFormat".to_string(), "decimal".to_string())]
        );
    }

    #[test]
    fn test_argument_schemas_describe_fields() {
        let schema = serde_json::to_value(rmcp::schemars::schema_for!(GetOddsArgs)).unwrap();
        assert_eq!(schema["required"], json!(["sport"]));
        assert_eq!(
            schema["properties"]["sport"]["description"],
            "Sport key, e.g. basketball_nba"
        );
    }
}
