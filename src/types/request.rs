//! Per-call request description

use serde_json::Value;
use std::fmt;

/// HTTP verbs used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// GET and DELETE never carry a body
    pub fn carries_body(&self) -> bool {
        matches!(self, Method::Post | Method::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A single request to dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    /// Path appended verbatim to the base URL
    pub path: String,
    pub payload: Option<Value>,
    pub idempotency_key: Option<String>,
}

impl RequestSpec {
    /// Create a request without payload
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            payload: None,
            idempotency_key: None,
        }
    }

    /// Set the JSON payload
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Set the idempotency key
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Body that goes on the wire. Dropped for GET and DELETE.
    pub fn body(&self) -> Option<&Value> {
        if self.method.carries_body() {
            self.payload.as_ref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_dropped_for_get_and_delete() {
        let payload = json!({ "amount": 10 });
        for method in [Method::Get, Method::Delete] {
            let spec = RequestSpec::new(method, "/users").with_payload(payload.clone());
            assert!(spec.body().is_none(), "{} should not carry a body", method);
        }
        for method in [Method::Post, Method::Patch] {
            let spec = RequestSpec::new(method, "/users").with_payload(payload.clone());
            assert_eq!(spec.body(), Some(&payload));
        }
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(reqwest::Method::from(Method::Patch), reqwest::Method::PATCH);
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
