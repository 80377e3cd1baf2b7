//! HTTP client for the Synapse API
//!
//! This module performs one HTTP exchange per call and normalizes the outcome:
//! a parsed JSON body on success, or exactly one [`SynapseError`] on failure.
//!
//! # Architecture
//!
//! - [`HttpClient`] - Request dispatch and error translation
//! - [`CredentialStore`] - Source of the authentication headers
//! - Tests - Mock-server driven suite covering every failure mode
//!
//! # Examples
//!
//! ```no_run
//! use synapse_pay_rest::http_client::HttpClient;
//! use synapse_pay_rest::types::{ClientConfig, CredentialUpdate, Credentials};
//! use serde_json::json;
//!
//! # async fn example() -> synapse_pay_rest::Result<()> {
//! let credentials = Credentials::new("client_id", "client_secret", "fingerprint", "127.0.0.1");
//! let client = HttpClient::new(ClientConfig::sandbox(credentials))?;
//!
//! // Sign in, then attach the session token to later calls
//! let session = client
//!     .post("/oauth/user_id", &json!({ "refresh_token": "token" }), None)
//!     .await?;
//! if let Some(oauth_key) = session["oauth_key"].as_str() {
//!     client.update_credentials(CredentialUpdate::new().with_oauth_key(oauth_key));
//! }
//!
//! let nodes = client.get("/users/user_id/nodes").await?;
//! println!("Nodes: {}", nodes);
//! # Ok(())
//! # }
//! ```
//!
//! # Failure translation
//!
//! - Deadline exceeded - [`SynapseError::Timeout`] with code 504 and "Request Timeout"
//! - Non-2xx with a JSON body - [`SynapseError::Api`] built from `error.en` and `http_code`
//! - Non-2xx with any other body - [`SynapseError::UnstructuredApi`] carrying the raw text
//! - 2xx with a non-JSON body - [`SynapseError::ResponseParse`]
//!
//! No call is retried.

use crate::credential_store::CredentialStore;
use crate::error::ErrorInfo;
use crate::types::{headers, ClientConfig, CredentialUpdate, Method, RequestSpec};
use crate::{Result, SynapseError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;


/// Client that dispatches requests to the Synapse API
#[derive(Clone)]
pub struct HttpClient {
    /// Base URL of the API
    base_url: String,
    /// HTTP client
    client: Client,
    /// Shared authentication state
    credentials: Arc<CredentialStore>,
    /// Proxy for outbound requests
    proxy_url: Option<String>,
    /// Log parsed responses
    logging: bool,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("proxy_url", &self.proxy_url)
            .field("logging", &self.logging)
            .field("credentials", &"<credentials>")
            .finish()
    }
}

impl HttpClient {
    /// Create a new client with its own credential store
    pub fn new(config: ClientConfig) -> Result<Self> {
        let store = Arc::new(CredentialStore::new(config.credentials.clone()));
        Self::with_credential_store(config, store)
    }

    /// Create a client that shares an existing credential store.
    ///
    /// The credentials in `config` are ignored in favor of the store.
    pub fn with_credential_store(
        config: ClientConfig,
        credentials: Arc<CredentialStore>,
    ) -> Result<Self> {
        // Validate configuration first
        config.validate()?;

        let mut client_builder = Client::builder().use_rustls_tls().timeout(config.timeout);

        client_builder = match &config.proxy_url {
            Some(proxy_url) => {
                let proxy = reqwest::Proxy::all(proxy_url.as_str())
                    .map_err(|e| SynapseError::config(format!("Invalid proxy URL: {}", e)))?;
                client_builder.proxy(proxy)
            }
            None => client_builder.no_proxy(),
        };

        if let Some(certificate) = &config.certificate {
            if certificate.has_private_key() {
                let identity = reqwest::Identity::from_pem(certificate.as_pem()).map_err(|e| {
                    SynapseError::config(format!("Invalid client certificate: {}", e))
                })?;
                client_builder = client_builder.identity(identity);
            } else {
                let root = reqwest::Certificate::from_pem(certificate.as_pem()).map_err(|e| {
                    SynapseError::config(format!("Invalid pinned certificate: {}", e))
                })?;
                client_builder = client_builder.add_root_certificate(root);
            }
        }

        if config.danger_accept_invalid_server_certs {
            tracing::warn!("Server certificate verification is disabled");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| SynapseError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url,
            client,
            credentials,
            proxy_url: config.proxy_url,
            logging: config.logging,
        })
    }

    /// Send a GET request
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.execute(RequestSpec::new(Method::Get, path)).await
    }

    /// Send a POST request with a JSON payload
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        idempotency_key: Option<&str>,
    ) -> Result<Value> {
        let mut spec =
            RequestSpec::new(Method::Post, path).with_payload(serde_json::to_value(payload)?);
        if let Some(key) = idempotency_key {
            spec = spec.with_idempotency_key(key);
        }
        self.execute(spec).await
    }

    /// Send a PATCH request with a JSON payload
    pub async fn patch<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<Value> {
        let spec =
            RequestSpec::new(Method::Patch, path).with_payload(serde_json::to_value(payload)?);
        self.execute(spec).await
    }

    /// Send a DELETE request
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.execute(RequestSpec::new(Method::Delete, path)).await
    }

    /// Perform one request and translate the outcome
    pub async fn execute(&self, spec: RequestSpec) -> Result<Value> {
        let url = self.full_url(&spec.path);

        let mut header_map = to_header_map(self.headers())?;
        if let Some(key) = &spec.idempotency_key {
            let value = HeaderValue::from_str(key).map_err(|_| {
                SynapseError::invalid_header(format!(
                    "{} is not a valid header value",
                    headers::IDEMPOTENCY_KEY
                ))
            })?;
            header_map.insert(HeaderName::from_static("x-sp-idempotency-key"), value);
        }

        tracing::debug!(method = %spec.method, url = %url, "Sending request");

        let mut request = self
            .client
            .request(spec.method.into(), url.as_str())
            .headers(header_map);

        if let Some(body) = spec.body() {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await.map_err(|e| {
            let err = SynapseError::from_transport(e);
            tracing::error!(method = %spec.method, url = %url, error = %err, "Request failed");
            err
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(SynapseError::from_transport)?;

        if !status.is_success() {
            let err = error_from_response(status.as_u16(), content_type.as_deref(), body);
            tracing::error!(
                method = %spec.method,
                url = %url,
                status = status.as_u16(),
                error = %err,
                "Request returned an error response"
            );
            return Err(err);
        }

        let parsed: Value = serde_json::from_str(&body)
            .map_err(|source| SynapseError::ResponseParse { body, source })?;

        if self.logging {
            tracing::info!(
                method = %spec.method,
                path = %spec.path,
                response = %parsed,
                "RESPONSE"
            );
        }

        Ok(parsed)
    }

    /// Headers for the next request, with CORS headers when proxying
    pub fn headers(&self) -> HashMap<String, String> {
        self.credentials.headers(self.proxy_url.is_some())
    }

    /// Overwrite the credential fields present in `update`
    pub fn update_credentials(&self, update: CredentialUpdate) {
        self.credentials.update_credentials(update);
    }

    /// The shared credential store
    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the proxy URL, if any
    pub fn proxy_url(&self) -> Option<&str> {
        self.proxy_url.as_deref()
    }

    pub fn logging(&self) -> bool {
        self.logging
    }

    // Paths are appended verbatim; callers supply well-formed, encoded paths.
    fn full_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn to_header_map(headers: HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            SynapseError::invalid_header(format!("{} is not a valid header name", name))
        })?;
        let header_value = HeaderValue::from_str(&value)
            .map_err(|_| SynapseError::invalid_header(format!("{} has an invalid value", name)))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Whether a `Content-Type` value names JSON, ignoring parameters
fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .map(|media_type| media_type.trim().eq_ignore_ascii_case(headers::JSON))
        .unwrap_or(false)
}

/// Build the error for a non-success response
fn error_from_response(status: u16, content_type: Option<&str>, body: String) -> SynapseError {
    if is_json_content_type(content_type) {
        match serde_json::from_str::<Value>(&body) {
            Ok(parsed) => {
                return SynapseError::Api(ErrorInfo::from_response_body(&parsed, status))
            }
            Err(e) => {
                tracing::warn!(status, error = %e, "JSON error response did not parse");
            }
        }
    }
    SynapseError::UnstructuredApi(ErrorInfo::unstructured(status, body))
}
