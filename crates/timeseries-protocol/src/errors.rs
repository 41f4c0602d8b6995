//! Request validation errors.

use thiserror::Error;

use crate::responses::ExceptionResponse;

/// Errors raised while turning a wire request into a [`TimeseriesRequest`].
///
/// All of them are client errors.
///
/// [`TimeseriesRequest`]: crate::request::TimeseriesRequest
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtocolError {
    /// A required property is absent.
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// A property is present but malformed.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Geometry other than a point.
    #[error("Unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    /// Unknown `timeResolution`.
    #[error("Unknown time resolution: {0}")]
    UnknownTimeResolution(String),
}

impl ProtocolError {
    pub fn missing(property: impl Into<String>) -> Self {
        Self::MissingParameter(property.into())
    }

    pub fn invalid(property: &str, value: &str) -> Self {
        Self::InvalidParameter(format!("{} = '{}'", property, value))
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        400
    }

    /// Convert to an ExceptionResponse.
    pub fn to_exception(&self) -> ExceptionResponse {
        ExceptionResponse::bad_request(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_to_exception() {
        let err = ProtocolError::missing("longitude");
        let exc = err.to_exception();

        assert_eq!(err.status_code(), 400);
        assert_eq!(exc.status, Some(400));
        assert!(exc.detail.unwrap().contains("longitude"));
    }

    #[test]
    fn test_error_display() {
        let err = ProtocolError::invalid("start", "abc");
        assert_eq!(err.to_string(), "Invalid parameter: start = 'abc'");
    }
}
