//! Error types for point series extraction.

use thiserror::Error;

/// Errors that can occur while extracting a point time series.
///
/// NODATA samples are not errors; they travel through the success path as
/// [`SampleValue::NoData`](crate::SampleValue::NoData).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    /// Unknown dataset or variable.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed or missing request parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The requested range has its start after its end.
    #[error("invalid time range: start {start} is after end {end}")]
    InvalidRange { start: u64, end: u64 },

    /// The coordinate lies outside the dataset grid.
    #[error("coordinate ({lon}, {lat}) is outside the grid extent {extent}")]
    OutOfBounds { lon: f64, lat: f64, extent: String },

    /// The requested time step does not exist.
    #[error("time index {index} is outside the temporal axis of {available} steps")]
    TimeIndexOutOfRange { index: u64, available: u64 },

    /// The dataset geotransform cannot be inverted.
    #[error("invalid geotransform: {0}")]
    InvalidGeotransform(String),

    /// An uncertainty delta is negative, non-finite or NODATA.
    #[error("invalid uncertainty: {0}")]
    InvalidUncertainty(String),

    /// The underlying raster could not be read.
    #[error("failed to read raster data: {0}")]
    ReadFailure(String),
}

impl SeriesError {
    /// Create a NotFound error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create an InvalidGeotransform error.
    pub fn invalid_geotransform(msg: impl Into<String>) -> Self {
        Self::InvalidGeotransform(msg.into())
    }

    /// Create an InvalidUncertainty error.
    pub fn invalid_uncertainty(msg: impl Into<String>) -> Self {
        Self::InvalidUncertainty(msg.into())
    }

    /// Create a ReadFailure error.
    pub fn read_failure(msg: impl Into<String>) -> Self {
        Self::ReadFailure(msg.into())
    }

    /// Get the HTTP status code for this error.
    ///
    /// Caller mistakes map to 4xx, dataset and storage problems to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            SeriesError::NotFound(_) => 404,
            SeriesError::InvalidParameter(_)
            | SeriesError::InvalidRange { .. }
            | SeriesError::OutOfBounds { .. }
            | SeriesError::TimeIndexOutOfRange { .. } => 400,
            SeriesError::InvalidGeotransform(_)
            | SeriesError::InvalidUncertainty(_)
            | SeriesError::ReadFailure(_) => 500,
        }
    }

    /// Whether the failure was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

impl From<std::io::Error> for SeriesError {
    fn from(err: std::io::Error) -> Self {
        Self::ReadFailure(err.to_string())
    }
}

/// Result type for series operations.
pub type Result<T> = std::result::Result<T, SeriesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(SeriesError::not_found("x").status_code(), 404);
        assert_eq!(SeriesError::invalid_parameter("x").status_code(), 400);
        assert_eq!(SeriesError::InvalidRange { start: 3, end: 1 }.status_code(), 400);
        assert_eq!(
            SeriesError::TimeIndexOutOfRange {
                index: 9,
                available: 5
            }
            .status_code(),
            400
        );
        assert_eq!(SeriesError::read_failure("disk").status_code(), 500);
        assert_eq!(SeriesError::invalid_geotransform("singular").status_code(), 500);
    }

    #[test]
    fn test_client_error_classification() {
        let err = SeriesError::OutOfBounds {
            lon: 0.0,
            lat: 0.0,
            extent: "5x5".to_string(),
        };
        assert!(err.is_client_error());
        assert!(!SeriesError::read_failure("corrupt chunk").is_client_error());
    }

    #[test]
    fn test_error_display() {
        let err = SeriesError::InvalidRange { start: 4, end: 2 };
        let display = err.to_string();
        assert!(display.contains("start 4"));
        assert!(display.contains("end 2"));
    }
}
