use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::header::{CACHE_CONTROL, EXPIRES, HeaderMap, HeaderName};

use crate::{
    error::{ForecastError, Result},
    model::{ForecastResponse, ResponseMetadata},
};

pub const API_CALLS_HEADER: &str = "X-Forecast-API-Calls";
pub const RESPONSE_TIME_HEADER: &str = "X-Response-Time";

/// What to do when a quota or timing header is missing or not numeric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderPolicy {
    /// Fail the whole call with [`ForecastError::NumericHeader`].
    ///
    /// Values are read as unsigned, so a signed value such as `-1` also fails.
    #[default]
    Strict,
    /// Leave the value unset and log a warning.
    Lenient,
}

/// The response headers the mapper consumes, as raw strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForecastHeaders<'a> {
    pub cache_control: Option<&'a str>,
    pub expires: Option<&'a str>,
    pub api_calls: Option<&'a str>,
    pub response_time: Option<&'a str>,
}

impl<'a> ForecastHeaders<'a> {
    pub fn from_header_map(headers: &'a HeaderMap) -> Self {
        let get = |name: &HeaderName| headers.get(name).and_then(|v| v.to_str().ok());

        Self {
            cache_control: get(&CACHE_CONTROL),
            expires: get(&EXPIRES),
            api_calls: get(&HeaderName::from_static("x-forecast-api-calls")),
            response_time: get(&HeaderName::from_static("x-response-time")),
        }
    }
}

/// Decodes the body and attaches the header-derived metadata.
///
/// Body decoding runs first, so a garbage body is reported as
/// [`ForecastError::BodyDecode`] even when the headers are also bad.
pub fn map_response(
    body: &[u8],
    headers: &ForecastHeaders<'_>,
    policy: HeaderPolicy,
) -> Result<ForecastResponse> {
    let mut response: ForecastResponse =
        serde_json::from_slice(body).map_err(ForecastError::BodyDecode)?;

    response.metadata = ResponseMetadata {
        cache_control: headers.cache_control.map(str::to_string),
        expires: headers.expires.and_then(parse_expires),
        api_calls: numeric_header(API_CALLS_HEADER, headers.api_calls, policy)?,
        response_time_ms: numeric_header(
            RESPONSE_TIME_HEADER,
            headers.response_time.map(strip_unit_suffix),
            policy,
        )?,
    };

    tracing::debug!(
        api_calls = ?response.metadata.api_calls,
        response_time_ms = ?response.metadata.response_time_ms,
        "mapped forecast response"
    );

    Ok(response)
}

fn numeric_header(
    header: &'static str,
    value: Option<&str>,
    policy: HeaderPolicy,
) -> Result<Option<u32>> {
    match value.map(|v| v.trim().parse::<u32>()) {
        Some(Ok(n)) => Ok(Some(n)),
        _ => match policy {
            HeaderPolicy::Strict => Err(ForecastError::NumericHeader {
                header,
                value: value.map(str::to_string),
            }),
            HeaderPolicy::Lenient => {
                tracing::warn!(header, value = ?value, "ignoring missing or non-numeric header");
                Ok(None)
            }
        },
    }
}

/// `"42ms"` -> `"42"`. Any trailing letters count as the unit.
fn strip_unit_suffix(value: &str) -> &str {
    value.trim().trim_end_matches(|c: char| c.is_ascii_alphabetic()).trim_end()
}

/// Obsolete HTTP date forms, tried after RFC 1123 on whitespace-normalized input.
const OBSOLETE_HTTP_DATE_FORMATS: &[&str] = &[
    // RFC 850: Sunday, 06-Nov-94 08:49:37 GMT
    "%A, %d-%b-%y %H:%M:%S GMT",
    // asctime: Sun Nov  6 08:49:37 1994
    "%a %b %d %H:%M:%S %Y",
];

/// HTTP dates are RFC 1123, which chrono's RFC 2822 parser accepts (including `GMT`).
/// The RFC 850 and asctime forms are accepted as a fallback, always as UTC.
fn parse_expires(value: &str) -> Option<DateTime<Utc>> {
    let err = match DateTime::parse_from_rfc2822(value.trim()) {
        Ok(dt) => return Some(dt.with_timezone(&Utc)),
        Err(err) => err,
    };

    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
    let fallback = OBSOLETE_HTTP_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
        .map(|ndt| ndt.and_utc());

    if fallback.is_none() {
        tracing::warn!(value, error = %err, "ignoring unparseable Expires header");
    }
    fallback
}
