//! Shared, mutable authentication state
//!
//! [`CredentialStore`] holds the credentials used to sign every request and
//! derives the request headers from them. It performs no I/O. A store can be
//! shared between several clients through an `Arc`, so a token refresh made by
//! one caller is seen by every client using it.

use crate::types::headers;
use crate::types::{CredentialUpdate, Credentials};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Holds credentials and builds request headers from them
#[derive(Debug, Default)]
pub struct CredentialStore {
    credentials: RwLock<Credentials>,
}

impl CredentialStore {
    /// Create a store seeded with the given credentials
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: RwLock::new(credentials),
        }
    }

    /// Copy of the current credentials
    pub fn snapshot(&self) -> Credentials {
        self.read().clone()
    }

    /// Request headers built from one snapshot of the credentials.
    ///
    /// With `include_proxy_headers` the permissive CORS headers are added.
    pub fn headers(&self, include_proxy_headers: bool) -> HashMap<String, String> {
        let (gateway, user, ip_address) = {
            let creds = self.read();
            (creds.gateway(), creds.user(), creds.ip_address.clone())
        };

        let mut map = HashMap::with_capacity(8);
        map.insert(headers::CONTENT_TYPE.to_string(), headers::JSON.to_string());
        map.insert(headers::ACCEPT.to_string(), headers::JSON.to_string());
        map.insert(headers::GATEWAY.to_string(), gateway);
        map.insert(headers::USER.to_string(), user);
        map.insert(headers::USER_IP.to_string(), ip_address);

        if include_proxy_headers {
            for (name, value) in headers::ACCESS_CONTROL {
                map.insert(name.to_string(), value.to_string());
            }
        }

        map
    }

    /// Overwrite the fields present in `update`
    pub fn update_credentials(&self, update: CredentialUpdate) {
        if update.is_empty() {
            return;
        }
        tracing::debug!(
            oauth_key = update.oauth_key.is_some(),
            fingerprint = update.fingerprint.is_some(),
            client_id = update.client_id.is_some(),
            client_secret = update.client_secret.is_some(),
            ip_address = update.ip_address.is_some(),
            "Updating credentials"
        );
        self.write().apply(update);
    }

    // Credentials are plain strings replaced whole, so a poisoned lock still
    // holds a valid value.
    fn read(&self) -> RwLockReadGuard<'_, Credentials> {
        self.credentials
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Credentials> {
        self.credentials
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl From<Credentials> for CredentialStore {
    fn from(credentials: Credentials) -> Self {
        Self::new(credentials)
    }
}
