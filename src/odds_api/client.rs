//! The odds API client.
//!
//! Every call is one GET with the API key merged into the query. Successful
//! responses update the client's rate-limit counters, and each envelope
//! carries a copy of them. Failed calls leave the counters alone.

use chrono::Utc;
use futures::future::join_all;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use super::http_client::create_http_client;
use super::models::{Envelope, QuotaHeaders, Sport, WindowReport, parse_sports};
use super::options::OddsOptions;
use super::urls::{build_query, build_url, odds_path, sports_path};
use super::window::{ResolvedWindow, WindowRequest, build_report};
use crate::config::Config;
use crate::constants::{DEFAULT_BASE_URL, window::ODDS_DATE_FORMAT};
use crate::error::AppError;

pub struct OddsClient {
    http: Client,
    base_url: String,
    api_key: String,
    quota: QuotaHeaders,
}

impl std::fmt::Debug for OddsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OddsClient")
            .field("base_url", &self.base_url)
            .field("quota", &self.quota)
            .finish_non_exhaustive()
    }
}

impl OddsClient {
    /// Client for the public API with no request timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self, AppError> {
        Ok(Self::with_http_client(create_http_client(None)?, api_key))
    }

    /// Builds a client from configuration. Fails with a configuration error
    /// when no API key is configured, before anything touches the network.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let api_key = config.require_api_key()?;
        let http = create_http_client(config.http_timeout_seconds)?;
        Ok(Self::with_http_client(http, api_key).with_base_url(&config.base_url))
    }

    pub fn with_http_client(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            quota: QuotaHeaders::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Counters from the most recent successful calls.
    pub fn quota(&self) -> &QuotaHeaders {
        &self.quota
    }

    /// Issues one GET to `path` and wraps the JSON body in an envelope.
    ///
    /// # Errors
    /// * `AppError::InvalidArgument` - empty `path`
    /// * `AppError::Upstream` - any non-2xx status, with the response body
    /// * `AppError::NetworkTimeout` / `AppError::NetworkConnection` / `AppError::ApiFetch` - transport failures
    /// * `AppError::ApiMalformedJson` - a 2xx body that is not JSON
    pub async fn request(
        &mut self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Envelope, AppError> {
        let (data, observed) = self.fetch(path, params).await?;
        self.quota.absorb(&observed);
        Ok(Envelope {
            data,
            headers: self.quota.clone(),
        })
    }

    /// Lists sports. Out-of-season sports are included when `include_inactive` is set.
    pub async fn get_sports(&mut self, include_inactive: bool) -> Result<Envelope, AppError> {
        let params = if include_inactive {
            vec![("all".to_string(), "true".to_string())]
        } else {
            Vec::new()
        };
        self.request(sports_path(), &params).await
    }

    /// Fetches odds for one sport.
    pub async fn get_odds(
        &mut self,
        sport_key: &str,
        options: &OddsOptions,
    ) -> Result<Envelope, AppError> {
        let path = odds_path(sport_key)?;
        self.request(&path, &options.to_query()).await
    }

    /// Finds the active sports with at least one event starting inside the
    /// window, fetching odds for every sport concurrently.
    ///
    /// A failed sports listing fails the call. A failed odds fetch only drops
    /// that sport from the result.
    #[instrument(skip(self, request))]
    pub async fn sports_with_games_in_window(
        &mut self,
        region: &str,
        request: &WindowRequest,
    ) -> Result<WindowReport, AppError> {
        let window = ResolvedWindow::resolve(request, Utc::now());
        info!(
            "Scanning for games between {} and {} ({})",
            window.start_utc,
            window.end_utc,
            window.timezone_name()
        );

        let sports_envelope = self.get_sports(false).await?;
        let sports = parse_sports(&sports_envelope.data);
        debug!("Checking odds for {} sports", sports.len());

        let query = OddsOptions::new()
            .regions(region)
            .date_format(ODDS_DATE_FORMAT)
            .to_query();

        let results = {
            let client = &*self;
            let query = &query;
            join_all(sports.iter().map(|sport| async move {
                match odds_path(sport.key()) {
                    Ok(path) => client.fetch(&path, query).await,
                    Err(e) => Err(e),
                }
            }))
            .await
        };

        let mut outcomes: Vec<(Sport, Result<Value, AppError>)> = Vec::with_capacity(sports.len());
        for (sport, result) in sports.into_iter().zip(results) {
            let outcome = result.map(|(events, observed)| {
                self.quota.absorb(&observed);
                events
            });
            outcomes.push((sport, outcome));
        }

        let report = build_report(outcomes, &window, self.quota.clone());
        info!("Found {} sports with games in the window", report.data.len());
        Ok(report)
    }

    /// Performs the GET without touching the counters. Returns the parsed body
    /// and the counters this single response carried.
    #[instrument(skip(self, params))]
    async fn fetch(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<(Value, QuotaHeaders), AppError> {
        let url = build_url(&self.base_url, path)?;
        let query = build_query(&self.api_key, params);
        info!("Fetching data from URL: {url}");

        let response = match self.http.get(&url).query(&query).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Request failed for URL {}: {}", url, e);
                return Err(if e.is_timeout() {
                    AppError::network_timeout(&url)
                } else if e.is_connect() {
                    AppError::network_connection(&url, e.to_string())
                } else {
                    AppError::ApiFetch(e)
                });
            }
        };

        let status = response.status();
        let observed = QuotaHeaders::from_response_headers(response.headers());
        debug!("Response status: {status}");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                warn!("Failed to read error body from {url}: {e}");
                String::new()
            });
            error!("HTTP {} from {}: {}", status.as_u16(), url, body);
            return Err(AppError::upstream(status.as_u16(), body, url));
        }

        let body = response.text().await.map_err(|e| {
            error!("Failed to read response text from URL {}: {}", url, e);
            AppError::ApiFetch(e)
        })?;
        debug!("Response length: {} bytes", body.len());

        let data = serde_json::from_str::<Value>(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            error!("Failed to parse API response: {} (URL: {}): {}", e, url, preview);
            if body.trim().is_empty() {
                AppError::api_malformed_json("Response body is empty", &url)
            } else {
                AppError::api_malformed_json(e.to_string(), &url)
            }
        })?;

        Ok((data, observed))
    }
}
