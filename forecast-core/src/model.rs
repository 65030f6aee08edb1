//! Typed shape of a decoded Forecast.io response.
//!
//! Every struct here ignores JSON members it does not know about, so new
//! fields added by the API never break decoding. Fields that only some
//! granularities carry are `Option`s: "absent" and "zero" stay distinct.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ForecastError, Result};

/// A validated point on the globe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ForecastError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ForecastError::InvalidLongitude(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Missing and `null` both decode to an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Weather attributes at a single instant (or averaged over one minute, hour or day).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    /// Start of the period this point describes.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub time: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    /// Machine-readable summary such as `clear-day` or `rain`.
    pub icon: Option<String>,

    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub sunrise_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub sunset_time: Option<DateTime<Utc>>,
    /// Fraction of the lunation, 0 being a new moon.
    pub moon_phase: Option<f64>,

    pub nearest_storm_distance: Option<f64>,
    pub nearest_storm_bearing: Option<f64>,

    pub precip_intensity: Option<f64>,
    pub precip_intensity_max: Option<f64>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub precip_intensity_max_time: Option<DateTime<Utc>>,
    pub precip_intensity_error: Option<f64>,
    pub precip_probability: Option<f64>,
    /// `rain`, `snow` or `sleet`; absent when no precipitation is expected.
    pub precip_type: Option<String>,
    /// Snowfall accumulation, daily and hourly points only.
    pub precip_accumulation: Option<f64>,

    pub temperature: Option<f64>,
    pub temperature_min: Option<f64>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub temperature_min_time: Option<DateTime<Utc>>,
    pub temperature_max: Option<f64>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub temperature_max_time: Option<DateTime<Utc>>,

    pub apparent_temperature: Option<f64>,
    pub apparent_temperature_min: Option<f64>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub apparent_temperature_min_time: Option<DateTime<Utc>>,
    pub apparent_temperature_max: Option<f64>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub apparent_temperature_max_time: Option<DateTime<Utc>>,

    pub dew_point: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_bearing: Option<f64>,
    pub visibility: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub pressure: Option<f64>,
    pub ozone: Option<f64>,
}

/// Data points over a range (minutely, hourly or daily), in the order the API returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataBlock {
    pub summary: Option<String>,
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<DataPoint>,
}

/// Server-reported metadata about how the response was produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flags {
    /// Unit system actually applied, e.g. `si`.
    pub units: Option<String>,
    /// Data sources that contributed to the response.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<String>,
    /// Every other flag, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A severe weather advisory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub expires: Option<DateTime<Utc>>,
    pub uri: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub regions: Vec<String>,
}

/// Values taken from the HTTP response headers rather than the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseMetadata {
    /// `Cache-Control`, verbatim.
    pub cache_control: Option<String>,
    /// `Expires`, as an absolute instant.
    pub expires: Option<DateTime<Utc>>,
    /// `X-Forecast-API-Calls`: calls made against the key's quota.
    pub api_calls: Option<u32>,
    /// `X-Response-Time` in milliseconds.
    pub response_time_ms: Option<u32>,
}

impl ResponseMetadata {
    pub fn expires_epoch_millis(&self) -> Option<i64> {
        self.expires.map(|dt| dt.timestamp_millis())
    }
}

/// Top-level response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// IANA time zone name of the location.
    pub timezone: Option<String>,
    /// UTC offset in hours; may be fractional.
    pub offset: Option<f64>,

    pub currently: Option<DataPoint>,
    pub minutely: Option<DataBlock>,
    pub hourly: Option<DataBlock>,
    pub daily: Option<DataBlock>,
    pub flags: Option<Flags>,
    pub alerts: Option<Vec<Alert>>,

    /// Filled in by the response mapper once the body has decoded.
    #[serde(skip_deserializing)]
    pub metadata: ResponseMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_accepts_range_bounds() {
        assert!(Location::new(90.0, 180.0).is_ok());
        assert!(Location::new(-90.0, -180.0).is_ok());

        let loc = Location::new(53.430833, -2.960833).unwrap();
        assert_eq!(loc.latitude(), 53.430833);
        assert_eq!(loc.longitude(), -2.960833);
    }

    #[test]
    fn location_rejects_out_of_range() {
        assert!(matches!(
            Location::new(90.5, 0.0),
            Err(ForecastError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Location::new(0.0, -180.1),
            Err(ForecastError::InvalidLongitude(_))
        ));
        assert!(matches!(
            Location::new(f64::NAN, 0.0),
            Err(ForecastError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn data_point_tolerates_missing_and_unknown_fields() {
        let json = r#"{"time": 1400000000, "temperature": 0, "someNewField": [1, 2]}"#;
        let point: DataPoint = serde_json::from_str(json).unwrap();

        assert_eq!(point.time.map(|t| t.timestamp()), Some(1_400_000_000));
        assert_eq!(point.temperature, Some(0.0));
        assert_eq!(point.humidity, None);
        assert_eq!(point.sunrise_time, None);
    }

    #[test]
    fn data_point_decodes_camel_case_timestamps() {
        let json = r#"{
            "temperatureMax": 14.2,
            "temperatureMaxTime": 1400050000,
            "apparentTemperatureMinTime": 1400010000,
            "precipIntensityMaxTime": 1400020000
        }"#;
        let point: DataPoint = serde_json::from_str(json).unwrap();

        assert_eq!(point.temperature_max, Some(14.2));
        assert_eq!(point.temperature_max_time.unwrap().timestamp(), 1_400_050_000);
        assert_eq!(point.apparent_temperature_min_time.unwrap().timestamp(), 1_400_010_000);
        assert_eq!(point.precip_intensity_max_time.unwrap().timestamp(), 1_400_020_000);
    }

    #[test]
    fn flags_keep_unknown_keys() {
        let json = r#"{"units": "si", "sources": ["metno_ne"], "isd-stations": ["03316099999"]}"#;
        let flags: Flags = serde_json::from_str(json).unwrap();

        assert_eq!(flags.units.as_deref(), Some("si"));
        assert_eq!(flags.sources, vec!["metno_ne".to_string()]);
        assert!(flags.extra.contains_key("isd-stations"));
        assert!(!flags.extra.contains_key("units"));
    }

    #[test]
    fn data_block_without_data_is_empty() {
        let block: DataBlock = serde_json::from_str(r#"{"summary": "Dry."}"#).unwrap();
        assert_eq!(block.summary.as_deref(), Some("Dry."));
        assert!(block.data.is_empty());
    }

    #[test]
    fn null_lists_decode_as_empty() {
        let block: DataBlock = serde_json::from_str(r#"{"summary": "Dry.", "data": null}"#).unwrap();
        assert!(block.data.is_empty());

        let flags: Flags = serde_json::from_str(r#"{"units": "si", "sources": null}"#).unwrap();
        assert_eq!(flags.units.as_deref(), Some("si"));
        assert!(flags.sources.is_empty());
        assert!(flags.extra.is_empty());

        let alert: Alert = serde_json::from_str(r#"{"title": "Wind", "regions": null}"#).unwrap();
        assert!(alert.regions.is_empty());
    }

    #[test]
    fn envelope_tolerates_null_members() {
        let json = r#"{
            "latitude": null,
            "timezone": null,
            "hourly": {"data": null},
            "flags": {"sources": null},
            "alerts": [{"regions": null}]
        }"#;
        let response: ForecastResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.latitude, None);
        assert_eq!(response.longitude, None);
        assert!(response.hourly.unwrap().data.is_empty());
        assert!(response.flags.unwrap().sources.is_empty());
        assert!(response.alerts.unwrap()[0].regions.is_empty());
    }

    #[test]
    fn metadata_is_never_read_from_body() {
        let json = r#"{"latitude": 1.0, "longitude": 2.0, "metadata": {"api_calls": 9}}"#;
        let response: ForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.metadata, ResponseMetadata::default());
    }

    #[test]
    fn expires_epoch_millis() {
        let meta = ResponseMetadata {
            expires: DateTime::from_timestamp(1_400_000_000, 0),
            ..Default::default()
        };
        assert_eq!(meta.expires_epoch_millis(), Some(1_400_000_000_000));
    }
}
