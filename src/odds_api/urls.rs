//! URL and query-string building for the odds API endpoints

use crate::constants::API_KEY_PARAM;
use crate::error::AppError;
use std::collections::BTreeMap;

/// Joins the base URL and an endpoint path.
///
/// # Example
/// ```
/// use wagyu_sports::odds_api::build_url;
///
/// let url = build_url("https://api.the-odds-api.com/v4/", "/sports").unwrap();
/// assert_eq!(url, "https://api.the-odds-api.com/v4/sports");
/// ```
pub fn build_url(base_url: &str, path: &str) -> Result<String, AppError> {
    let path = path.trim();
    if path.is_empty() || path == "/" {
        return Err(AppError::invalid_argument("request path must not be empty"));
    }
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        Ok(format!("{base}{path}"))
    } else {
        Ok(format!("{base}/{path}"))
    }
}

/// Path of the sports listing endpoint.
pub fn sports_path() -> &'static str {
    "/sports"
}

/// Checks that a sport key is one path segment made of ASCII letters,
/// digits and `_`. Returns the trimmed key.
pub fn validate_sport_key(sport_key: &str) -> Result<&str, AppError> {
    let sport_key = sport_key.trim();
    if sport_key.is_empty() {
        return Err(AppError::invalid_argument("sport key must not be empty"));
    }
    if !sport_key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AppError::invalid_argument(format!(
            "invalid sport key {sport_key:?}: only letters, digits and '_' are allowed"
        )));
    }
    Ok(sport_key)
}

/// Path of the odds endpoint for one sport.
///
/// # Example
/// ```
/// use wagyu_sports::odds_api::odds_path;
///
/// assert_eq!(odds_path("basketball_nba").unwrap(), "/sports/basketball_nba/odds");
/// assert!(odds_path("  ").is_err());
/// assert!(odds_path("nba?apiKey=x").is_err());
/// ```
pub fn odds_path(sport_key: &str) -> Result<String, AppError> {
    let sport_key = validate_sport_key(sport_key)?;
    Ok(format!("/sports/{sport_key}/odds"))
}

/// Merges caller parameters with the API key.
///
/// Later caller entries overwrite earlier ones with the same name. The API key
/// is inserted last so no caller entry can replace it, and it is always the
/// first pair of the result.
pub fn build_query(api_key: &str, params: &[(String, String)]) -> Vec<(String, String)> {
    let mut merged: BTreeMap<&str, &str> = BTreeMap::new();
    for (name, value) in params {
        merged.insert(name.as_str(), value.as_str());
    }
    merged.remove(API_KEY_PARAM);

    let mut query = Vec::with_capacity(merged.len() + 1);
    query.push((API_KEY_PARAM.to_string(), api_key.to_string()));
    query.extend(
        merged
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string())),
    );
    query
}
