//! Client configuration and the pinned transport certificate

use super::constants::{environments, DEFAULT_TIMEOUT};
use super::credentials::Credentials;
use crate::{Result, SynapseError};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Opaque PEM credential presented on every request.
///
/// A bundle holding a private key is presented as the client identity; a bare
/// certificate is added as a trusted root.
#[derive(Clone, PartialEq, Eq)]
pub struct PinnedCertificate {
    pem: Vec<u8>,
}

impl std::fmt::Debug for PinnedCertificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinnedCertificate")
            .field("len", &self.pem.len())
            .field("has_private_key", &self.has_private_key())
            .finish()
    }
}

impl PinnedCertificate {
    /// Wrap PEM bytes
    pub fn from_pem(pem: impl Into<Vec<u8>>) -> Self {
        Self { pem: pem.into() }
    }

    /// Read a PEM file
    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self> {
        let pem = std::fs::read(path.as_ref())?;
        if pem.is_empty() {
            return Err(SynapseError::config(format!(
                "Certificate file {} is empty",
                path.as_ref().display()
            )));
        }
        Ok(Self::from_pem(pem))
    }

    pub fn as_pem(&self) -> &[u8] {
        &self.pem
    }

    /// Whether the bundle carries a private key
    pub fn has_private_key(&self) -> bool {
        String::from_utf8_lossy(&self.pem).contains("PRIVATE KEY-----")
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (sandbox or production)
    pub base_url: String,
    /// Credentials the client starts with
    pub credentials: Credentials,
    /// Proxy for outbound requests. Enables the CORS headers.
    pub proxy_url: Option<String>,
    /// Pinned certificate.
    ///
    /// A PEM bundle holding a private key is presented as the TLS client
    /// identity. A bare certificate cannot be presented without its key, so it
    /// is added as a trusted root for the server's chain instead.
    pub certificate: Option<PinnedCertificate>,
    /// Log parsed responses
    pub logging: bool,
    /// Deadline for every request
    pub timeout: Duration,
    /// Skip verification of the server's certificate chain.
    ///
    /// This is a security trade-off. It matches the trust model of the sandbox
    /// proxy, where the client authenticates itself with the pinned
    /// certificate but does not validate the server.
    pub danger_accept_invalid_server_certs: bool,
}

impl ClientConfig {
    /// Create a new client config
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            proxy_url: None,
            certificate: None,
            logging: false,
            timeout: DEFAULT_TIMEOUT,
            danger_accept_invalid_server_certs: false,
        }
    }

    /// Config pointing at the sandbox environment
    pub fn sandbox(credentials: Credentials) -> Self {
        Self::new(environments::SANDBOX_BASE_URL, credentials)
    }

    /// Config pointing at the production environment
    pub fn production(credentials: Credentials) -> Self {
        Self::new(environments::PRODUCTION_BASE_URL, credentials)
    }

    /// Build a config from `SYNAPSE_*` environment variables
    pub fn from_env() -> Result<Self> {
        let required = |name: &str| {
            env::var(name).map_err(|_| SynapseError::config(format!("Missing {}", name)))
        };

        let credentials = Credentials::new(
            required("SYNAPSE_CLIENT_ID")?,
            required("SYNAPSE_CLIENT_SECRET")?,
            required("SYNAPSE_FINGERPRINT")?,
            env::var("SYNAPSE_IP_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),
        );

        let base_url = env::var("SYNAPSE_BASE_URL")
            .unwrap_or_else(|_| environments::SANDBOX_BASE_URL.to_string());

        let mut config = Self::new(base_url, credentials);

        if let Ok(proxy_url) = env::var("SYNAPSE_PROXY_URL") {
            if !proxy_url.is_empty() {
                config = config.with_proxy_url(proxy_url);
            }
        }

        if let Ok(path) = env::var("SYNAPSE_CERT_PATH") {
            config = config.with_certificate(PinnedCertificate::from_pem_file(path)?);
        }

        if let Ok(logging) = env::var("SYNAPSE_LOGGING") {
            config = config.with_logging(parse_flag(&logging));
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the client configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(SynapseError::config("Base URL cannot be empty"));
        }
        validate_http_url("Base URL", &self.base_url)?;

        if let Some(proxy_url) = &self.proxy_url {
            validate_http_url("Proxy URL", proxy_url)?;
        }

        if self.timeout.is_zero() {
            return Err(SynapseError::config("Timeout must be greater than zero"));
        }

        Ok(())
    }

    /// Set the proxy URL
    pub fn with_proxy_url(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    /// Set the pinned certificate
    pub fn with_certificate(mut self, certificate: PinnedCertificate) -> Self {
        self.certificate = Some(certificate);
        self
    }

    /// Enable or disable response logging
    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disable verification of the server's certificate chain
    pub fn with_danger_accept_invalid_server_certs(mut self, accept: bool) -> Self {
        self.danger_accept_invalid_server_certs = accept;
        self
    }
}

fn validate_http_url(label: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| SynapseError::config(format!("{} is invalid: {}", label, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(SynapseError::config(format!(
            "{} must start with http:// or https://",
            label
        ))),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
