//! Authentication material

use serde::{Deserialize, Serialize};

/// Credentials attached to every request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Platform client id
    pub client_id: String,
    /// Platform client secret
    pub client_secret: String,
    /// Device fingerprint of the end user
    pub fingerprint: String,
    /// End user's IP address
    pub ip_address: String,
    /// Session token, empty until the user signs in
    #[serde(default)]
    pub oauth_key: String,
}

impl Credentials {
    /// Create credentials with an empty oauth key
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        fingerprint: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            fingerprint: fingerprint.into(),
            ip_address: ip_address.into(),
            oauth_key: String::new(),
        }
    }

    /// `client_id|client_secret`
    pub fn gateway(&self) -> String {
        format!("{}|{}", self.client_id, self.client_secret)
    }

    /// `oauth_key|fingerprint`
    pub fn user(&self) -> String {
        format!("{}|{}", self.oauth_key, self.fingerprint)
    }

    /// Apply a partial update. Fields left as `None` are untouched.
    pub fn apply(&mut self, update: CredentialUpdate) {
        if let Some(oauth_key) = update.oauth_key {
            self.oauth_key = oauth_key;
        }
        if let Some(fingerprint) = update.fingerprint {
            self.fingerprint = fingerprint;
        }
        if let Some(client_id) = update.client_id {
            self.client_id = client_id;
        }
        if let Some(client_secret) = update.client_secret {
            self.client_secret = client_secret;
        }
        if let Some(ip_address) = update.ip_address {
            self.ip_address = ip_address;
        }
    }
}

/// Partial credential update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialUpdate {
    pub oauth_key: Option<String>,
    pub fingerprint: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub ip_address: Option<String>,
}

impl CredentialUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the oauth key
    pub fn with_oauth_key(mut self, oauth_key: impl Into<String>) -> Self {
        self.oauth_key = Some(oauth_key.into());
        self
    }

    /// Set the fingerprint
    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// Set the client id
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the client secret
    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Set the IP address
    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
