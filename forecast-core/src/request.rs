use chrono::{DateTime, Utc};

use crate::{
    model::Location,
    options::{ExcludeBlock, ExtensionMode, UnitSystem},
};

pub const DEFAULT_BASE_URL: &str = "https://api.forecast.io/forecast";

/// Everything that goes into one forecast request besides the credential.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub location: Location,
    pub time: Option<DateTime<Utc>>,
    pub units: Option<UnitSystem>,
    pub extend: Option<ExtensionMode>,
    pub exclude: Vec<ExcludeBlock>,
}

impl ForecastRequest {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            time: None,
            units: None,
            extend: None,
            exclude: Vec::new(),
        }
    }

    pub fn at(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn units(mut self, units: UnitSystem) -> Self {
        self.units = Some(units);
        self
    }

    pub fn extend(mut self, extend: ExtensionMode) -> Self {
        self.extend = Some(extend);
        self
    }

    /// Sets the blocks to exclude. `None` entries are dropped; order is kept.
    ///
    /// ```
    /// use forecast_core::{ExcludeBlock, ForecastRequest, Location};
    ///
    /// let req = ForecastRequest::new(Location::new(0.0, 0.0).unwrap())
    ///     .exclude([Some(ExcludeBlock::Hourly), None, Some(ExcludeBlock::Daily)]);
    /// assert_eq!(req.exclude, vec![ExcludeBlock::Hourly, ExcludeBlock::Daily]);
    /// ```
    pub fn exclude<I, B>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Option<ExcludeBlock>>,
    {
        self.exclude = blocks.into_iter().filter_map(Into::into).collect();
        self
    }
}

/// Renders the request URL:
/// `{base}/{api_key}/{lat},{lon}[,{unix_seconds}][?units=..][&extend=..][&exclude=a,b]`.
///
/// Pure string building; the key is not checked here.
pub fn build_url(base_url: &str, api_key: &str, request: &ForecastRequest) -> String {
    let mut url = format!(
        "{}/{}/{},{}",
        base_url.trim_end_matches('/'),
        api_key,
        request.location.latitude(),
        request.location.longitude(),
    );

    if let Some(time) = request.time {
        // Sub-second precision is dropped, rounding toward zero.
        url.push(',');
        url.push_str(&(time.timestamp_millis() / 1000).to_string());
    }

    let mut params: Vec<(&str, String)> = Vec::with_capacity(3);
    if let Some(units) = request.units {
        params.push(("units", units.as_str().to_string()));
    }
    if let Some(extend) = request.extend {
        params.push(("extend", extend.as_str().to_string()));
    }
    if !request.exclude.is_empty() {
        let joined = request
            .exclude
            .iter()
            .map(ExcludeBlock::as_str)
            .collect::<Vec<_>>()
            .join(",");
        params.push(("exclude", joined));
    }

    for (i, (key, value)) in params.iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str(key);
        url.push('=');
        url.push_str(value);
    }

    url
}
