//! Offline responses read from a fixtures directory.
//!
//! Each file holds either a full `{data, headers}` envelope or a bare data
//! value. A top-level `_metadata` key, left behind by capture tooling, is
//! ignored in both shapes.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::models::{Envelope, QuotaHeaders, QuotaInfo, Sport, WindowReport, parse_sports};
use super::urls::validate_sport_key;
use super::window::{ResolvedWindow, WindowRequest, build_report};
use crate::constants::fixtures::{METADATA_KEY, ODDS_FALLBACK_FILE, QUOTA_FILE, SPORTS_FILE};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSource {
    dir: PathBuf,
}

impl FixtureSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads one fixture file and normalizes it into an envelope.
    pub async fn load(&self, file_name: &str) -> Result<Envelope, AppError> {
        let value = self.read_json(file_name).await?;
        Ok(into_envelope(value))
    }

    /// Sports listing. Entries flagged `"active": false` are dropped unless
    /// `include_inactive` is set.
    pub async fn sports(&self, include_inactive: bool) -> Result<Envelope, AppError> {
        let mut envelope = self.load(SPORTS_FILE).await?;
        if !include_inactive && let Value::Array(records) = &mut envelope.data {
            records.retain(|record| record.get("active") != Some(&Value::Bool(false)));
        }
        Ok(envelope)
    }

    /// Odds for one sport from `odds_{sport}.json`, or the shared `odds.json`
    /// when no sport-specific file exists.
    pub async fn odds(&self, sport_key: &str) -> Result<Envelope, AppError> {
        let specific = sport_fixture_name(sport_key)?;
        if self.dir.join(&specific).is_file() {
            return self.load(&specific).await;
        }
        debug!("No {specific} fixture, using {ODDS_FALLBACK_FILE}");
        self.load(ODDS_FALLBACK_FILE).await
    }

    /// Quota counters. Accepts either `{remaining_requests, used_requests}`
    /// or an envelope whose `headers` carry the counters.
    pub async fn quota(&self) -> Result<QuotaInfo, AppError> {
        let value = strip_metadata(self.read_json(QUOTA_FILE).await?);
        if let Some(headers) = value.get("headers") {
            let headers: QuotaHeaders = serde_json::from_value(headers.clone())
                .map_err(|e| AppError::fixture_error(format!("Invalid {QUOTA_FILE}: {e}")))?;
            return Ok(QuotaInfo::from(&headers));
        }
        serde_json::from_value(value)
            .map_err(|e| AppError::fixture_error(format!("Invalid {QUOTA_FILE}: {e}")))
    }

    /// Window scan over fixture data. Sports whose odds fixture cannot be
    /// loaded are skipped the same way failed live fetches are.
    pub async fn sports_in_window(&self, request: &WindowRequest) -> Result<WindowReport, AppError> {
        let window = ResolvedWindow::resolve(request, Utc::now());
        let sports_envelope = self.sports(false).await?;
        let mut quota = sports_envelope.headers.clone();

        let sports = parse_sports(&sports_envelope.data);
        let mut outcomes: Vec<(Sport, Result<Value, AppError>)> = Vec::with_capacity(sports.len());
        for sport in sports {
            let outcome = self.odds(sport.key()).await.map(|envelope| {
                quota.absorb(&envelope.headers);
                envelope.data
            });
            outcomes.push((sport, outcome));
        }

        Ok(build_report(outcomes, &window, quota))
    }

    async fn read_json(&self, file_name: &str) -> Result<Value, AppError> {
        let path = self.dir.join(file_name);
        info!("Loading fixture {}", path.display());

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Fixture file missing: {}", path.display());
                return Err(AppError::fixture_error(format!(
                    "Fixture file {file_name} not found in {}",
                    self.dir.display()
                )));
            }
            Err(e) => return Err(AppError::Io(e)),
        };

        serde_json::from_str(&content)
            .map_err(|e| AppError::fixture_error(format!("Error loading {file_name}: {e}")))
    }
}

fn sport_fixture_name(sport_key: &str) -> Result<String, AppError> {
    let sport_key = validate_sport_key(sport_key)?;
    Ok(format!("odds_{sport_key}.json"))
}

fn strip_metadata(mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        map.remove(METADATA_KEY);
    }
    value
}

fn into_envelope(value: Value) -> Envelope {
    match strip_metadata(value) {
        Value::Object(mut map) if map.contains_key("data") => {
            let headers = map
                .remove("headers")
                .and_then(|headers| serde_json::from_value::<QuotaHeaders>(headers).ok())
                .unwrap_or_default();
            Envelope {
                data: map.remove("data").unwrap_or(Value::Null),
                headers,
            }
        }
        data => Envelope {
            data,
            headers: QuotaHeaders::default(),
        },
    }
}
