//! Point Time Series API Protocol
//!
//! Wire types of the time series service: query string and JSON body of a
//! point series request, the exception document returned on errors, and the
//! small status documents.
//!
//! # Example
//!
//! ```rust
//! use timeseries_protocol::{TimeseriesParams, TimeseriesRequest};
//!
//! let params = TimeseriesParams {
//!     longitude: Some("-123".to_string()),
//!     latitude: Some("45".to_string()),
//!     csv: Some("true".to_string()),
//!     ..Default::default()
//! };
//! let request = params.into_request("annual_5x5x5_dataset", "float32_variable").unwrap();
//! assert_eq!(request.longitude, -123.0);
//! assert!(request.csv);
//! ```

pub mod errors;
pub mod request;
pub mod responses;

// Re-export commonly used types
pub use errors::ProtocolError;
pub use request::{Geometry, TimeResolution, TimeseriesBody, TimeseriesParams, TimeseriesRequest};
pub use responses::{ExceptionResponse, HealthResponse, StatusResponse};

/// Default base path of the API routes.
pub const DEFAULT_BASE_PATH: &str = "/timeseries-service/api/v1";

/// Name reported by the status endpoint.
pub const SERVICE_NAME: &str = "SKOPE Timeseries Service";
