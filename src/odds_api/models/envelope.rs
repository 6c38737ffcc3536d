use crate::constants::headers::{REQUESTS_REMAINING, REQUESTS_USED};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rate-limit counters reported by the odds API.
///
/// Values are passed through as the strings the API sent; nothing is parsed
/// or validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaHeaders {
    #[serde(default)]
    pub requests_remaining: Option<String>,
    #[serde(default)]
    pub requests_used: Option<String>,
}

impl QuotaHeaders {
    /// Reads the counters present on a single response. Missing or non-UTF-8
    /// headers come back as `None`.
    pub fn from_response_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        Self {
            requests_remaining: read(REQUESTS_REMAINING),
            requests_used: read(REQUESTS_USED),
        }
    }

    /// Takes every counter the newer observation carries and keeps the
    /// current value for the ones it lacks.
    pub fn absorb(&mut self, observed: &QuotaHeaders) {
        if let Some(remaining) = &observed.requests_remaining {
            self.requests_remaining = Some(remaining.clone());
        }
        if let Some(used) = &observed.requests_used {
            self.requests_used = Some(used.clone());
        }
    }
}

/// The `{data, headers}` wrapper returned by every client call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub data: Value,
    pub headers: QuotaHeaders,
}

/// Quota snapshot in the shape returned by the `get_quota_info` tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaInfo {
    #[serde(default)]
    pub remaining_requests: Option<String>,
    #[serde(default)]
    pub used_requests: Option<String>,
}

impl From<&QuotaHeaders> for QuotaInfo {
    fn from(headers: &QuotaHeaders) -> Self {
        Self {
            remaining_requests: headers.requests_remaining.clone(),
            used_requests: headers.requests_used.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_from_response_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUESTS_REMAINING, HeaderValue::from_static("100"));
        headers.insert(REQUESTS_USED, HeaderValue::from_static("5"));

        let quota = QuotaHeaders::from_response_headers(&headers);
        assert_eq!(quota.requests_remaining.as_deref(), Some("100"));
        assert_eq!(quota.requests_used.as_deref(), Some("5"));
    }

    #[test]
    fn test_absorb_keeps_previous_values_for_missing_headers() {
        let mut quota = QuotaHeaders {
            requests_remaining: Some("100".to_string()),
            requests_used: Some("5".to_string()),
        };

        quota.absorb(&QuotaHeaders {
            requests_remaining: Some("99".to_string()),
            requests_used: None,
        });

        assert_eq!(quota.requests_remaining.as_deref(), Some("99"));
        assert_eq!(quota.requests_used.as_deref(), Some("5"));
    }

    #[test]
    fn test_envelope_serializes_null_counters() {
        let envelope = Envelope {
            data: serde_json::json!([]),
            headers: QuotaHeaders::default(),
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data": [],
                "headers": {"requests_remaining": null, "requests_used": null}
            })
        );
    }

    #[test]
    fn test_quota_info_from_headers() {
        let headers = QuotaHeaders {
            requests_remaining: Some("42".to_string()),
            requests_used: Some("8".to_string()),
        };
        let info = QuotaInfo::from(&headers);
        assert_eq!(info.remaining_requests.as_deref(), Some("42"));
        assert_eq!(info.used_requests.as_deref(), Some("8"));
    }
}
