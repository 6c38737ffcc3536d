//! Query options for the odds endpoint

/// Options for `/sports/{key}/odds`. Values are passed to the API as-is;
/// their meaning (`us,uk`, `h2h,spreads`, `american`, `iso`, ...) is the
/// API's business.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OddsOptions {
    pub regions: Option<String>,
    pub markets: Option<String>,
    pub odds_format: Option<String>,
    pub date_format: Option<String>,
    /// Any other query parameters, sent before the named ones.
    pub extra: Vec<(String, String)>,
}

impl OddsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regions(mut self, regions: impl Into<String>) -> Self {
        self.regions = Some(regions.into());
        self
    }

    pub fn markets(mut self, markets: impl Into<String>) -> Self {
        self.markets = Some(markets.into());
        self
    }

    pub fn odds_format(mut self, odds_format: impl Into<String>) -> Self {
        self.odds_format = Some(odds_format.into());
        self
    }

    pub fn date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = Some(date_format.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }

    /// Query pairs in API naming (`regions`, `markets`, `oddsFormat`, `dateFormat`).
    /// Named options that are unset or blank are left out.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = self.extra.clone();
        let named = [
            ("regions", &self.regions),
            ("markets", &self.markets),
            ("oddsFormat", &self.odds_format),
            ("dateFormat", &self.date_format),
        ];
        for (name, value) in named {
            if let Some(value) = value
                && !value.trim().is_empty()
            {
                query.push((name.to_string(), value.clone()));
            }
        }
        query
    }
}
