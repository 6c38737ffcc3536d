//! MCP server exposing the odds client as tools, built on `rmcp`.
//!
//! Calls answer from fixture files in test mode and from the live API
//! otherwise. `use_test_mode` on any call overrides the server-wide mode.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    AnnotateAble, CallToolResult, Content, ErrorData as McpError, Implementation,
    ListResourcesResult, PaginatedRequestParam, ProtocolVersion, RawResource,
    ReadResourceRequestParam, ReadResourceResult, Resource, ResourceContents, ServerCapabilities,
    ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::transport::stdio;
use rmcp::{ServerHandler, ServiceExt, tool, tool_handler, tool_router};
use serde::Serialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::tools::{GetOddsArgs, GetSportsArgs, QuotaArgs, ToolCall, WindowArgs, non_blank};
use crate::config::Config;
use crate::constants::mcp::{SERVER_NAME, SPORTS_RESOURCE_URI};
use crate::constants::window::{DEFAULT_REGION, DEFAULT_TIMEZONE};
use crate::error::AppError;
use crate::odds_api::{FixtureSource, OddsClient, QuotaInfo, WindowRequest};

const JSON_MIME_TYPE: &str = "application/json";

const INSTRUCTIONS: &str = "Sports betting data from The Odds API. Use get_sports to list \
sport keys, get_odds for one sport, get_sports_in_window to find sports with games starting \
in a time window and get_quota_info for the remaining request budget.";

#[derive(Clone)]
pub struct OddsMcpServer {
    // Tool handlers take `&self`; the client needs `&mut` to track quota.
    client: Arc<Mutex<Option<OddsClient>>>,
    fixtures: FixtureSource,
    test_mode: bool,
    timezone: String,
    region: String,
    tool_router: ToolRouter<Self>,
}

impl OddsMcpServer {
    pub fn new(client: Option<OddsClient>, fixtures: FixtureSource, test_mode: bool) -> Self {
        Self {
            client: Arc::new(Mutex::new(client)),
            fixtures,
            test_mode,
            timezone: DEFAULT_TIMEZONE.to_string(),
            region: DEFAULT_REGION.to_string(),
            tool_router: Self::tool_router(),
        }
    }

    /// Builds the server from configuration.
    ///
    /// Outside test mode a missing API key is a configuration error. In test
    /// mode the live client is still built when a key is available, so
    /// individual calls can opt out of fixtures with `use_test_mode: false`.
    pub fn from_config(config: &Config, test_mode: bool) -> Result<Self, AppError> {
        let client = if test_mode && config.require_api_key().is_err() {
            None
        } else {
            Some(OddsClient::from_config(config)?)
        };
        let fixtures = FixtureSource::new(config.fixtures_dir_or_default());
        Ok(Self::new(client, fixtures, test_mode).with_defaults(&config.timezone, &config.region))
    }

    /// Timezone and region used by the window tool when a call omits them.
    pub fn with_defaults(mut self, timezone: &str, region: &str) -> Self {
        self.timezone = timezone.to_string();
        self.region = region.to_string();
        self
    }

    pub fn test_mode(&self) -> bool {
        self.test_mode
    }

    /// Serves one MCP session on stdin/stdout and returns when it ends.
    pub async fn run_stdio(self) -> Result<(), AppError> {
        info!("Starting {SERVER_NAME} on stdio (test mode: {})", self.test_mode);
        let service = self
            .serve(stdio())
            .await
            .map_err(|e| AppError::mcp_error(format!("failed to start session: {e}")))?;
        let reason = service
            .waiting()
            .await
            .map_err(|e| AppError::mcp_error(e.to_string()))?;
        info!("Session ended: {reason:?}");
        Ok(())
    }

    /// Runs one tool. Failures become tool results, never protocol errors.
    pub async fn run_tool(&self, call: ToolCall) -> CallToolResult {
        let offline = call.use_test_mode().unwrap_or(self.test_mode);
        info!("Calling {} (test mode: {offline})", call.name());

        if offline {
            return match self.call_fixture_tool(call).await {
                Ok(text) => CallToolResult::success(vec![Content::text(text)]),
                Err(e) => {
                    warn!("Fixture lookup failed: {e}");
                    CallToolResult::success(vec![Content::text(error_json(&e.to_string()))])
                }
            };
        }

        match self.call_live_tool(call).await {
            Ok(text) => CallToolResult::success(vec![Content::text(text)]),
            Err(e) => {
                error!("Live call failed: {e}");
                CallToolResult::error(vec![Content::text(e.to_string())])
            }
        }
    }

    /// Current sports listing as pretty JSON, from fixtures in test mode.
    pub async fn sports_listing(&self) -> Result<String, AppError> {
        let envelope = if self.test_mode {
            self.fixtures.sports(false).await?
        } else {
            let mut guard = self.client.lock().await;
            let client = guard
                .as_mut()
                .ok_or_else(|| AppError::config_error("ODDS_API_KEY is not set"))?;
            client.get_sports(false).await?
        };
        pretty(&envelope.data)
    }

    async fn call_fixture_tool(&self, call: ToolCall) -> Result<String, AppError> {
        match call {
            ToolCall::GetSports(args) => pretty(&self.fixtures.sports(args.all_sports).await?),
            ToolCall::GetOdds(args) => pretty(&self.fixtures.odds(&args.sport).await?),
            ToolCall::GetQuotaInfo(_) => pretty(&self.fixtures.quota().await?),
            ToolCall::GetSportsInWindow(args) => {
                let request = self.window_request(&args)?;
                pretty(&self.fixtures.sports_in_window(&request).await?)
            }
        }
    }

    async fn call_live_tool(&self, call: ToolCall) -> Result<String, AppError> {
        let request = match &call {
            ToolCall::GetSportsInWindow(args) => Some(self.window_request(args)?),
            _ => None,
        };

        let mut guard = self.client.lock().await;
        let client = guard.as_mut().ok_or_else(|| {
            AppError::config_error(
                "ODDS_API_KEY is not set; live requests are unavailable, use test mode",
            )
        })?;

        match call {
            ToolCall::GetSports(args) => pretty(&client.get_sports(args.all_sports).await?),
            ToolCall::GetOdds(args) => {
                pretty(&client.get_odds(&args.sport, &args.options()).await?)
            }
            ToolCall::GetQuotaInfo(_) => pretty(&QuotaInfo::from(client.quota())),
            ToolCall::GetSportsInWindow(args) => {
                let region = non_blank(&args.region).unwrap_or_else(|| self.region.clone());
                let request = request.unwrap_or_default();
                pretty(&client.sports_with_games_in_window(&region, &request).await?)
            }
        }
    }

    fn window_request(&self, args: &WindowArgs) -> Result<WindowRequest, AppError> {
        let timezone = args.timezone.as_deref().unwrap_or(&self.timezone);
        WindowRequest::parse(
            args.start_time.as_deref(),
            args.end_time.as_deref(),
            Some(timezone),
        )
    }
}

#[tool_router]
impl OddsMcpServer {
    #[tool(description = "Get a list of available sports")]
    async fn get_sports(
        &self,
        Parameters(args): Parameters<GetSportsArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run_tool(ToolCall::GetSports(args)).await)
    }

    #[tool(description = "Get odds for a specific sport")]
    async fn get_odds(
        &self,
        Parameters(args): Parameters<GetOddsArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run_tool(ToolCall::GetOdds(args)).await)
    }

    #[tool(description = "Get API quota information")]
    async fn get_quota_info(
        &self,
        Parameters(args): Parameters<QuotaArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run_tool(ToolCall::GetQuotaInfo(args)).await)
    }

    #[tool(description = "List active sports with games starting inside a time window")]
    async fn get_sports_in_window(
        &self,
        Parameters(args): Parameters<WindowArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run_tool(ToolCall::GetSportsInWindow(args)).await)
    }
}

#[tool_handler]
impl ServerHandler for OddsMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(vec![sports_resource()]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        if request.uri != SPORTS_RESOURCE_URI {
            return Err(McpError::resource_not_found(
                format!("Unknown resource: {}", request.uri),
                Some(json!({ "uri": request.uri })),
            ));
        }

        let text = self.sports_listing().await.map_err(|e| {
            error!("Reading {SPORTS_RESOURCE_URI} failed: {e}");
            McpError::internal_error(e.to_string(), None)
        })?;
        let mut contents = ResourceContents::text(text, SPORTS_RESOURCE_URI);
        if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
            *mime_type = Some(JSON_MIME_TYPE.to_string());
        }
        Ok(ReadResourceResult {
            contents: vec![contents],
        })
    }
}

fn sports_resource() -> Resource {
    let mut resource = RawResource::new(SPORTS_RESOURCE_URI, "Available sports");
    resource.description = Some("Sports currently offered by the odds API".to_string());
    resource.mime_type = Some(JSON_MIME_TYPE.to_string());
    resource.no_annotation()
}

fn pretty<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn error_json(message: &str) -> String {
    let value = json!({ "error": message });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds_api::http_client::create_test_http_client;
    use serde_json::Value;
    use tempfile::tempdir;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn offline_server(dir: &std::path::Path) -> OddsMcpServer {
        OddsMcpServer::new(None, FixtureSource::new(dir), true)
    }

    fn live_server(mock_server: &MockServer, dir: &std::path::Path) -> OddsMcpServer {
        let client = OddsClient::with_http_client(create_test_http_client(), "k")
            .with_base_url(mock_server.uri());
        OddsMcpServer::new(Some(client), FixtureSource::new(dir), false)
    }

    fn text_of(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|content| content.as_text())
            .map(|text| text.text.clone())
            .collect()
    }

    fn is_error(result: &CallToolResult) -> bool {
        result.is_error.unwrap_or(false)
    }

    #[test]
    fn test_info_reports_server_identity() {
        let dir = tempdir().unwrap();
        let info = offline_server(dir.path()).get_info();
        assert_eq!(info.server_info.name, SERVER_NAME);
        assert_eq!(info.protocol_version, ProtocolVersion::V_2024_11_05);
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
    }

    #[test]
    fn test_router_lists_every_tool() {
        let dir = tempdir().unwrap();
        let server = offline_server(dir.path());
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec!["get_odds", "get_quota_info", "get_sports", "get_sports_in_window"]
        );
    }

    #[tokio::test]
    async fn test_missing_fixture_yields_error_object_text() {
        let dir = tempdir().unwrap();
        let server = offline_server(dir.path());
        let result = server
            .run_tool(ToolCall::GetQuotaInfo(QuotaArgs::default()))
            .await;
        assert!(!is_error(&result));
        let body: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert!(body["error"].as_str().unwrap().contains("quota.json"));
    }

    #[tokio::test]
    async fn test_live_call_without_client_is_tool_error() {
        let dir = tempdir().unwrap();
        let server = offline_server(dir.path());
        let call = ToolCall::GetSports(GetSportsArgs {
            all_sports: false,
            use_test_mode: Some(false),
        });
        let result = server.run_tool(call).await;
        assert!(is_error(&result));
        assert!(text_of(&result).contains("ODDS_API_KEY"));
    }

    #[tokio::test]
    async fn test_live_upstream_error_is_tool_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sports"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&mock_server)
            .await;
        let dir = tempdir().unwrap();
        let server = live_server(&mock_server, dir.path());

        let result = server
            .run_tool(ToolCall::GetSports(GetSportsArgs::default()))
            .await;
        assert!(is_error(&result));
        assert!(text_of(&result).contains("401"));
    }

    #[tokio::test]
    async fn test_live_quota_reflects_last_call() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sports"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .insert_header("x-requests-remaining", "42")
                    .insert_header("x-requests-used", "8"),
            )
            .mount(&mock_server)
            .await;
        let dir = tempdir().unwrap();
        let server = live_server(&mock_server, dir.path());
        let quota = || ToolCall::GetQuotaInfo(QuotaArgs::default());

        let before: Value = serde_json::from_str(&text_of(&server.run_tool(quota()).await)).unwrap();
        assert_eq!(before, json!({"remaining_requests": null, "used_requests": null}));

        server
            .run_tool(ToolCall::GetSports(GetSportsArgs::default()))
            .await;
        let after: Value = serde_json::from_str(&text_of(&server.run_tool(quota()).await)).unwrap();
        assert_eq!(after, json!({"remaining_requests": "42", "used_requests": "8"}));
    }

    #[tokio::test]
    async fn test_clones_share_live_counters() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sports"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .insert_header("x-requests-remaining", "7")
                    .insert_header("x-requests-used", "3"),
            )
            .mount(&mock_server)
            .await;
        let dir = tempdir().unwrap();
        let server = live_server(&mock_server, dir.path());
        let session_copy = server.clone();

        session_copy
            .run_tool(ToolCall::GetSports(GetSportsArgs::default()))
            .await;
        let quota = server
            .run_tool(ToolCall::GetQuotaInfo(QuotaArgs::default()))
            .await;
        let quota: Value = serde_json::from_str(&text_of(&quota)).unwrap();
        assert_eq!(quota["remaining_requests"], "7");
    }

    #[tokio::test]
    async fn test_blank_window_region_uses_default() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sports"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&mock_server)
            .await;
        let dir = tempdir().unwrap();
        let server = live_server(&mock_server, dir.path());

        let result = server
            .run_tool(ToolCall::GetSportsInWindow(WindowArgs {
                region: Some(String::new()),
                timezone: Some("UTC".to_string()),
                ..WindowArgs::default()
            }))
            .await;
        assert!(!is_error(&result));
        let report: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(report["data"], json!([]));
        assert_eq!(report["time_window"]["timezone"], "UTC");
    }

    #[tokio::test]
    async fn test_sports_listing_without_key_outside_test_mode() {
        let dir = tempdir().unwrap();
        let server = OddsMcpServer::new(None, FixtureSource::new(dir.path()), false);
        let err = server.sports_listing().await.unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_sports_resource_is_json() {
        let resource = sports_resource();
        assert_eq!(resource.raw.uri, SPORTS_RESOURCE_URI);
        assert_eq!(resource.raw.mime_type.as_deref(), Some(JSON_MIME_TYPE));
    }

    #[test]
    fn test_from_config_requires_key_outside_test_mode() {
        let config = Config::default();
        let err = OddsMcpServer::from_config(&config, false).err().unwrap();
        assert!(err.is_config_error());

        let server = OddsMcpServer::from_config(&config, true).unwrap();
        assert!(server.test_mode());
    }
}
