//! Response documents.

use serde::{Deserialize, Serialize};

/// Exception document returned with every error status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptionResponse {
    /// Exception type identifier.
    #[serde(rename = "type")]
    pub type_: String,

    /// Human-readable title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// HTTP status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Detailed error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI of the request that caused the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ExceptionResponse {
    /// Create a new exception response.
    pub fn new(type_: impl Into<String>, status: u16, detail: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            title: None,
            status: Some(status),
            detail: Some(detail.into()),
            instance: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the instance URI.
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Create a 404 Not Found exception.
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new("not-found", 404, detail).with_title("Not Found")
    }

    /// Create a 400 Bad Request exception.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new("invalid-parameter-value", 400, detail).with_title("Bad Request")
    }

    /// Create a 500 Internal Server Error exception.
    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::new("server-error", 500, detail).with_title("Internal Server Error")
    }

    /// Exception for an arbitrary status; unknown codes map to a server error.
    pub fn for_status(status: u16, detail: impl Into<String>) -> Self {
        match status {
            404 => Self::not_found(detail),
            400..=499 => Self::bad_request(detail),
            _ => Self::internal_error(detail),
        }
    }
}

/// Body of the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub name: String,
}

impl StatusResponse {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Body of the health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_not_found() {
        let exc = ExceptionResponse::not_found("dataset 'x' not found");

        assert_eq!(exc.status, Some(404));
        assert_eq!(exc.title, Some("Not Found".to_string()));
        assert!(exc.detail.unwrap().contains("'x'"));
    }

    #[test]
    fn test_exception_for_status() {
        assert_eq!(ExceptionResponse::for_status(404, "x").status, Some(404));
        assert_eq!(
            ExceptionResponse::for_status(400, "x").title,
            Some("Bad Request".to_string())
        );
        assert_eq!(ExceptionResponse::for_status(500, "x").type_, "server-error");
        assert_eq!(ExceptionResponse::for_status(200, "x").status, Some(500));
    }

    #[test]
    fn test_exception_serialization() {
        let exc = ExceptionResponse::bad_request("start > end").with_instance("/timeseries/a/b");
        let json = serde_json::to_value(&exc).unwrap();

        assert_eq!(json["type"], "invalid-parameter-value");
        assert_eq!(json["title"], "Bad Request");
        assert_eq!(json["status"], 400);
        assert_eq!(json["detail"], "start > end");
        assert_eq!(json["instance"], "/timeseries/a/b");
    }

    #[test]
    fn test_exception_omits_empty_fields() {
        let exc = ExceptionResponse::new("server-error", 500, "boom");
        let json = serde_json::to_string(&exc).unwrap();
        assert!(!json.contains("title"));
        assert!(!json.contains("instance"));
    }

    #[test]
    fn test_status_documents() {
        let json = serde_json::to_string(&StatusResponse::new(crate::SERVICE_NAME)).unwrap();
        assert_eq!(json, r#"{"name":"SKOPE Timeseries Service"}"#);
        let json = serde_json::to_string(&HealthResponse::ok()).unwrap();
        assert_eq!(json, r#"{"status":"ok"}"#);
    }
}
