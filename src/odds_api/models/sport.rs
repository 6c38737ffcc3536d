use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Sport descriptor as listed by `/sports`.
///
/// Only `key` is required. The record is kept as the upstream sent it, so
/// fields of any JSON type pass through and re-serialize unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sport {
    #[serde(skip)]
    key: String,
    #[serde(flatten)]
    record: Map<String, Value>,
}

impl Sport {
    /// Reads a descriptor from a JSON object with a string `key`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let record = value.as_object()?;
        let key = record.get("key").and_then(Value::as_str)?.to_string();
        Some(Self {
            key,
            record: record.clone(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.record.get(field)
    }

    /// Sports count as active unless `active` is literally `false`.
    pub fn is_active(&self) -> bool {
        self.record
            .get("active")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }
}

/// One event from `/sports/{key}/odds`, kept as the raw upstream object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    #[serde(flatten)]
    record: Map<String, Value>,
}

impl Event {
    /// Wraps any JSON object. Non-objects are not events.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(|record| Self {
            record: record.clone(),
        })
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.record.get(field)
    }

    /// `id` when the upstream sent it as a string.
    pub fn id(&self) -> Option<&str> {
        self.record.get("id").and_then(Value::as_str)
    }

    pub fn commence_time(&self) -> Option<&str> {
        self.record.get("commence_time").and_then(Value::as_str)
    }

    /// Start time in UTC, or `None` when missing or not an ISO-8601 instant.
    pub fn commence_time_utc(&self) -> Option<DateTime<Utc>> {
        self.commence_time()
            .and_then(crate::odds_api::window::parse_commence_time)
    }
}

/// Parses every element of a JSON array that carries a string `key`.
/// Non-arrays yield an empty list and keyless entries are dropped.
pub fn parse_sports(data: &Value) -> Vec<Sport> {
    data.as_array()
        .map(|records| records.iter().filter_map(Sport::from_value).collect())
        .unwrap_or_default()
}
