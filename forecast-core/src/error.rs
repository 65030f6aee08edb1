use thiserror::Error;

/// Failure of the transport collaborator. Passed through to the caller unchanged.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to send request to Forecast.io: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Forecast.io request failed with status {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Failed to parse Forecast.io response body: {0}")]
    BodyDecode(#[source] serde_json::Error),

    /// A quota or timing header was missing or not a base-10 integer.
    #[error("Header '{header}' is missing or not numeric (value: {value:?})")]
    NumericHeader {
        header: &'static str,
        value: Option<String>,
    },

    #[error("Latitude {0} is outside the valid range [-90, 90]")]
    InvalidLatitude(f64),

    #[error("Longitude {0} is outside the valid range [-180, 180]")]
    InvalidLongitude(f64),

    #[error("No API key configured for Forecast.io")]
    MissingApiKey,
}

/// A string that does not name any variant of one of the option enums.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown {kind} '{value}'. Supported values: {supported}.")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
    pub supported: String,
}

pub type Result<T, E = ForecastError> = std::result::Result<T, E>;
