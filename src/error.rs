//! Error types for the Synapse client
//!
//! Every failed call surfaces exactly one [`SynapseError`]. The upstream-facing
//! variants carry an [`ErrorInfo`] holding the HTTP code, the English message
//! and the raw response body, so callers can reconstruct the failure without
//! touching transport internals.

use serde_json::Value;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, SynapseError>;

/// Message attached to synthesized timeout errors
pub const TIMEOUT_MESSAGE: &str = "Request Timeout";

/// HTTP code attached to synthesized timeout errors
pub const TIMEOUT_HTTP_CODE: u16 = 504;

/// Structured description of a failed exchange
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    /// HTTP code reported by the upstream (or synthesized)
    pub http_code: u16,
    /// English error message
    pub message_en: String,
    /// Upstream error code, when the body carried one
    pub error_code: Option<String>,
    /// Raw response body. Unstructured bodies are kept as a JSON string.
    pub raw: Value,
}

impl ErrorInfo {
    /// Info for a request that did not complete before the deadline
    pub fn timeout() -> Self {
        let raw = serde_json::json!({
            "error": { "en": TIMEOUT_MESSAGE },
            "http_code": TIMEOUT_HTTP_CODE,
        });
        Self {
            http_code: TIMEOUT_HTTP_CODE,
            message_en: TIMEOUT_MESSAGE.to_string(),
            error_code: None,
            raw,
        }
    }

    /// Info for a non-JSON error body
    pub fn unstructured(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            http_code: status,
            message_en: body.clone(),
            error_code: None,
            raw: Value::String(body),
        }
    }

    /// Build info from a parsed JSON error body.
    ///
    /// Reads `error.en`, `http_code` and `error_code`. `http_code` may be a number
    /// or a numeric string; `fallback_status` is used when it is missing or invalid.
    /// Without `error.en` the message is the body's JSON text.
    pub fn from_response_body(body: &Value, fallback_status: u16) -> Self {
        let message_en = body
            .pointer("/error/en")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string());

        let http_code = body
            .get("http_code")
            .and_then(|code| match code {
                Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
                Value::String(s) => s.trim().parse::<u16>().ok(),
                _ => None,
            })
            .unwrap_or(fallback_status);

        let error_code = body.get("error_code").and_then(|code| match code {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        Self {
            http_code,
            message_en,
            error_code,
            raw: body.clone(),
        }
    }

    /// Classify the HTTP code
    pub fn kind(&self) -> ApiErrorKind {
        ApiErrorKind::from_http_code(self.http_code)
    }
}

/// Coarse classification of upstream HTTP codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    Unauthorized,
    RequestFailed,
    Forbidden,
    NotFound,
    Conflict,
    TooManyRequests,
    InternalServerError,
    BadGateway,
    ServiceUnavailable,
    GatewayTimeout,
    Other,
}

impl ApiErrorKind {
    /// Map an HTTP code onto a kind
    pub fn from_http_code(code: u16) -> Self {
        match code {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            402 => Self::RequestFailed,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            429 => Self::TooManyRequests,
            500 => Self::InternalServerError,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            504 => Self::GatewayTimeout,
            _ => Self::Other,
        }
    }
}

/// Errors raised by the Synapse client
#[derive(Error, Debug)]
pub enum SynapseError {
    #[error("Request timed out ({}): {}", .0.http_code, .0.message_en)]
    Timeout(ErrorInfo),

    #[error("API error ({}): {}", .0.http_code, .0.message_en)]
    Api(ErrorInfo),

    #[error("Unstructured API error ({}): {}", .0.http_code, .0.message_en)]
    UnstructuredApi(ErrorInfo),

    #[error("Failed to parse response body as JSON: {source}")]
    ResponseParse {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SynapseError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid header error
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader(message.into())
    }

    /// Classify a reqwest failure. Timeouts become [`SynapseError::Timeout`].
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(ErrorInfo::timeout())
        } else {
            Self::Transport(err)
        }
    }

    /// Structured info for upstream-facing errors
    pub fn info(&self) -> Option<&ErrorInfo> {
        match self {
            Self::Timeout(info) | Self::Api(info) | Self::UnstructuredApi(info) => Some(info),
            _ => None,
        }
    }

    /// HTTP code, when the error carries one
    pub fn http_code(&self) -> Option<u16> {
        self.info().map(|info| info.http_code)
    }

    /// English message, when the error carries one
    pub fn message_en(&self) -> Option<&str> {
        self.info().map(|info| info.message_en.as_str())
    }

    /// Classification of the upstream code
    pub fn kind(&self) -> Option<ApiErrorKind> {
        self.info().map(ErrorInfo::kind)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timeout_info() {
        let info = ErrorInfo::timeout();
        assert_eq!(info.http_code, 504);
        assert_eq!(info.message_en, "Request Timeout");
        assert_eq!(info.raw["error"]["en"], "Request Timeout");
        assert_eq!(info.kind(), ApiErrorKind::GatewayTimeout);
    }

    #[test]
    fn test_from_response_body() {
        let body = json!({
            "error": { "en": "Invalid fingerprint" },
            "error_code": "110",
            "http_code": 400,
            "success": false
        });
        let info = ErrorInfo::from_response_body(&body, 500);
        assert_eq!(info.http_code, 400);
        assert_eq!(info.message_en, "Invalid fingerprint");
        assert_eq!(info.error_code.as_deref(), Some("110"));
        assert_eq!(info.raw, body);
    }

    #[test]
    fn test_from_response_body_string_code() {
        let body = json!({ "error": { "en": "Not found" }, "http_code": "404" });
        let info = ErrorInfo::from_response_body(&body, 500);
        assert_eq!(info.http_code, 404);
        assert_eq!(info.kind(), ApiErrorKind::NotFound);
    }

    #[test]
    fn test_from_response_body_falls_back_to_status() {
        let body = json!({ "message": "something else" });
        let info = ErrorInfo::from_response_body(&body, 422);
        assert_eq!(info.http_code, 422);
        assert_eq!(info.message_en, r#"{"message":"something else"}"#);
        assert_eq!(info.kind(), ApiErrorKind::Other);
    }

    #[test]
    fn test_unstructured_info() {
        let info = ErrorInfo::unstructured(502, "Bad Gateway");
        assert_eq!(info.http_code, 502);
        assert_eq!(info.message_en, "Bad Gateway");
        assert_eq!(info.raw, Value::String("Bad Gateway".to_string()));
    }

    #[test]
    fn test_error_accessors() {
        let err = SynapseError::Api(ErrorInfo::unstructured(401, "nope"));
        assert_eq!(err.http_code(), Some(401));
        assert_eq!(err.message_en(), Some("nope"));
        assert_eq!(err.kind(), Some(ApiErrorKind::Unauthorized));
        assert!(!err.is_timeout());

        let err = SynapseError::config("bad url");
        assert!(err.info().is_none());
        assert_eq!(err.to_string(), "Configuration error: bad url");
    }
}
