use super::envelope::QuotaHeaders;
use super::sport::{Event, Sport};
use serde::Serialize;

/// An event with its start time rendered in the window's timezone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedEvent {
    #[serde(flatten)]
    pub event: Event,
    pub commence_time_local: String,
}

/// A sport with at least one event inside the requested window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SportSummary {
    #[serde(flatten)]
    pub sport: Sport,
    pub games_count: usize,
    /// Earliest qualifying event
    pub sample_game: LocalizedEvent,
    pub timezone: String,
}

/// The resolved window echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeWindowEcho {
    pub start_time_local: String,
    pub end_time_local: String,
    pub start_time_utc: String,
    pub end_time_utc: String,
    pub timezone: String,
}

/// Result of a window scan across all active sports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReport {
    pub data: Vec<SportSummary>,
    pub headers: QuotaHeaders,
    pub time_window: TimeWindowEcho,
}
