//! Client library for the Forecast.io weather API.
//!
//! This crate defines:
//! - Request options and URL construction
//! - The typed response model and its mapping from body + headers
//! - A straight-through client over a pluggable transport
//! - Configuration & credentials handling for the `forecast` CLI
//!
//! ```no_run
//! use forecast_core::{ExcludeBlock, ForecastClient, ForecastRequest, Location, UnitSystem};
//!
//! # async fn run() -> Result<(), forecast_core::ForecastError> {
//! let client = ForecastClient::new("my-api-key")?;
//!
//! let now = client.fetch_now(53.430833, -2.960833).await?;
//! println!("{:?}", now.currently.and_then(|c| c.summary));
//!
//! let request = ForecastRequest::new(Location::new(53.430833, -2.960833)?)
//!     .units(UnitSystem::Si)
//!     .exclude([ExcludeBlock::Minutely, ExcludeBlock::Flags]);
//! let forecast = client.fetch(&request).await?;
//! println!("calls made today: {:?}", forecast.metadata.api_calls);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod mapper;
pub mod model;
pub mod options;
pub mod request;
pub mod transport;

pub use client::{ClientConfig, ForecastClient};
pub use config::Config;
pub use error::{ForecastError, TransportError, UnknownOption};
pub use mapper::{ForecastHeaders, HeaderPolicy, map_response};
pub use model::{
    Alert, DataBlock, DataPoint, Flags, ForecastResponse, Location, ResponseMetadata,
};
pub use options::{ExcludeBlock, ExtensionMode, UnitSystem};
pub use request::{ForecastRequest, build_url};
pub use transport::{HttpTransport, RawResponse, Transport};
