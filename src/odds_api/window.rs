//! Time-window filtering of events across sports.
//!
//! Window bounds may carry an offset or be wall-clock times in the window's
//! timezone. Both are normalized to UTC and compared inclusively against each
//! event's `commence_time`. Records that cannot be read are skipped, never
//! reported as errors.

use crate::constants::window::DEFAULT_TIMEZONE;
use crate::error::AppError;
use crate::odds_api::models::{
    Event, LocalizedEvent, QuotaHeaders, Sport, SportSummary, TimeWindowEcho, WindowReport,
};
use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDateTime, NaiveTime, SecondsFormat,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, warn};

/// Bounds that carry an offset but not the full RFC 3339 precision.
/// `%#z` takes `Z`, `+02`, `+0200` and `+02:00`.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%#z", "%Y-%m-%d %H:%M%#z"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// One end of a requested window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBound {
    /// A fixed instant (the input carried an offset or `Z`).
    Instant(DateTime<FixedOffset>),
    /// Wall-clock time in the window's timezone.
    Wall(NaiveDateTime),
}

impl FromStr for TimeBound {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Ok(TimeBound::Instant(instant));
        }
        if let Some(instant) = OFFSET_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(raw, format).ok())
        {
            return Ok(TimeBound::Instant(instant));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(TimeBound::Wall)
            .ok_or_else(|| {
                AppError::datetime_parse_error(format!(
                    "'{raw}' is not an ISO-8601 date-time (e.g. 2024-01-01T18:00:00Z or 2024-01-01T18:00:00)"
                ))
            })
    }
}

impl From<DateTime<Utc>> for TimeBound {
    fn from(instant: DateTime<Utc>) -> Self {
        TimeBound::Instant(instant.fixed_offset())
    }
}

/// Caller input for a window scan. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowRequest {
    pub start: Option<TimeBound>,
    pub end: Option<TimeBound>,
    /// IANA timezone name. Unknown names fall back to UTC.
    pub timezone: Option<String>,
}

impl WindowRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, start: impl Into<TimeBound>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn end(mut self, end: impl Into<TimeBound>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Builds a request from optional string inputs, as received from the CLI
    /// or a tool call.
    pub fn parse(
        start: Option<&str>,
        end: Option<&str>,
        timezone: Option<&str>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            start: start.map(str::parse).transpose()?,
            end: end.map(str::parse).transpose()?,
            timezone: timezone.map(str::to_string),
        })
    }
}

/// A window with both bounds fixed, in local and UTC form.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedWindow {
    pub timezone: Tz,
    pub start_local: DateTime<Tz>,
    pub end_local: DateTime<Tz>,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
}

impl ResolvedWindow {
    /// Fills in defaults relative to `now`: a missing start is `now`, a missing
    /// end is 23:59:59 of `now`'s calendar day in the window's timezone.
    pub fn resolve(request: &WindowRequest, now: DateTime<Utc>) -> Self {
        let timezone = resolve_timezone(request.timezone.as_deref());
        let now_local = now.with_timezone(&timezone);

        let start_local = match request.start {
            Some(bound) => bound_to_local(bound, &timezone),
            None => now_local,
        };
        let end_local = match request.end {
            Some(bound) => bound_to_local(bound, &timezone),
            None => {
                let end_of_day = now_local.date_naive().and_time(end_of_day_time());
                localize(&timezone, end_of_day)
            }
        };

        Self {
            timezone,
            start_utc: start_local.with_timezone(&Utc),
            end_utc: end_local.with_timezone(&Utc),
            start_local,
            end_local,
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start_utc <= instant && instant <= self.end_utc
    }

    pub fn timezone_name(&self) -> &'static str {
        self.timezone.name()
    }

    pub fn echo(&self) -> TimeWindowEcho {
        TimeWindowEcho {
            start_time_local: format_iso(&self.start_local),
            end_time_local: format_iso(&self.end_local),
            start_time_utc: format_iso(&self.start_utc),
            end_time_utc: format_iso(&self.end_utc),
            timezone: self.timezone_name().to_string(),
        }
    }
}

/// Resolves an IANA timezone name. `None` gives the default zone; an unknown
/// name gives UTC.
pub fn resolve_timezone(name: Option<&str>) -> Tz {
    let name = name.map(str::trim).filter(|n| !n.is_empty());
    match name {
        None => DEFAULT_TIMEZONE.parse::<Tz>().unwrap_or(Tz::UTC),
        Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            warn!("Unknown timezone '{name}', falling back to UTC");
            Tz::UTC
        }),
    }
}

/// Parses an event's `commence_time`. A trailing `Z` counts as UTC; values
/// without an offset are rejected.
pub fn parse_commence_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|instant| instant.with_timezone(&Utc))
}

/// Picks the events of one sport that start inside the window.
///
/// Returns `None` when `events` is not an array or nothing qualifies.
pub fn summarize_sport(
    sport: Sport,
    events: &Value,
    window: &ResolvedWindow,
) -> Option<SportSummary> {
    let Some(records) = events.as_array() else {
        debug!("Odds payload for {} is not a list, skipping", sport.key());
        return None;
    };

    let mut qualifying: Vec<(DateTime<Utc>, Event)> = records
        .iter()
        .filter_map(|record| {
            let Some(event) = Event::from_value(record) else {
                debug!("Skipping non-object event in {}", sport.key());
                return None;
            };
            let Some(starts_at) = event.commence_time_utc() else {
                debug!(
                    "Skipping event {:?} in {} with unreadable commence_time {:?}",
                    event.get("id"),
                    sport.key(),
                    event.get("commence_time")
                );
                return None;
            };
            window.contains(starts_at).then_some((starts_at, event))
        })
        .collect();

    if qualifying.is_empty() {
        return None;
    }

    qualifying.sort_by_key(|(starts_at, _)| *starts_at);
    let games_count = qualifying.len();
    let (starts_at, earliest) = qualifying.into_iter().next()?;

    Some(SportSummary {
        sport,
        games_count,
        sample_game: LocalizedEvent {
            event: earliest,
            commence_time_local: format_iso(&starts_at.with_timezone(&window.timezone)),
        },
        timezone: window.timezone_name().to_string(),
    })
}

/// Assembles the report from per-sport odds outcomes. Sports whose fetch
/// failed are logged and left out.
pub fn build_report(
    outcomes: Vec<(Sport, Result<Value, AppError>)>,
    window: &ResolvedWindow,
    headers: QuotaHeaders,
) -> WindowReport {
    let data = outcomes
        .into_iter()
        .filter_map(|(sport, outcome)| match outcome {
            Ok(events) => summarize_sport(sport, &events, window),
            Err(e) => {
                warn!("Skipping {}: failed to fetch odds: {e}", sport.key());
                None
            }
        })
        .collect();

    WindowReport {
        data,
        headers,
        time_window: window.echo(),
    }
}

fn bound_to_local(bound: TimeBound, timezone: &Tz) -> DateTime<Tz> {
    match bound {
        TimeBound::Instant(instant) => instant.with_timezone(timezone),
        TimeBound::Wall(naive) => localize(timezone, naive),
    }
}

/// Interprets a wall-clock time in `timezone`. Ambiguous times (DST fall-back)
/// take the later instant; times inside a DST gap move forward one hour.
fn localize(timezone: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match timezone.from_local_datetime(&naive) {
        LocalResult::Single(local) => local,
        LocalResult::Ambiguous(_, latest) => latest,
        LocalResult::None => timezone
            .from_local_datetime(&(naive + Duration::hours(1)))
            .latest()
            .unwrap_or_else(|| timezone.from_utc_datetime(&naive)),
    }
}

fn end_of_day_time() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default()
}

fn format_iso<Z: TimeZone>(instant: &DateTime<Z>) -> String
where
    Z::Offset: std::fmt::Display,
{
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}
