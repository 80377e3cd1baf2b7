//! # Synapse REST client
//!
//! A typed Rust client for the Synapse payment API.
//!
//! ## Features
//!
//! - **Credential management**: Gateway, user and IP headers derived from a shared, updatable store
//! - **Pinned certificate**: A fixed PEM credential presented on every request
//! - **Uniform deadline**: Every verb runs under the same bounded wait (300 s by default)
//! - **Typed failures**: Timeouts, structured and unstructured API errors, and malformed bodies
//! - **Resource helpers**: Node listing, creation, verification and deletion
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use synapse_pay_rest::{
//!     api::{NodeQuery, Nodes},
//!     types::{ClientConfig, Credentials},
//!     HttpClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::new("client_id", "client_secret", "fingerprint", "127.0.0.1");
//!     let client = HttpClient::new(ClientConfig::sandbox(credentials))?;
//!
//!     let nodes = Nodes::new(client, "user_id");
//!     let listing = nodes.get(None, &NodeQuery::new().with_per_page(20)).await?;
//!     println!("{}", listing);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`types`**: Credentials, configuration and request descriptions
//! - **`credential_store`**: Shared authentication state and header derivation
//! - **`http_client`**: Request dispatch and error translation
//! - **`api`**: Resource endpoints
//! - **`error`**: Error taxonomy
//!
//! ## Logging
//!
//! The crate emits `tracing` events and never installs a subscriber. Enable
//! [`ClientConfig::logging`](types::ClientConfig) to log every parsed response.

pub mod api;
pub mod credential_store;
pub mod error;
pub mod http_client;
pub mod types;

// Re-exports for convenience
pub use credential_store::CredentialStore;
pub use error::{ApiErrorKind, ErrorInfo, Result, SynapseError};
pub use http_client::HttpClient;
pub use types::*;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_environments() {
        assert_eq!(
            environments::base_url(false),
            "https://uat-api.synapsefi.com/v3.1"
        );
        assert_eq!(environments::base_url(true), "https://api.synapsefi.com/v3.1");
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(300));
    }

    #[test]
    fn test_header_names() {
        assert_eq!(headers::GATEWAY, "X-SP-GATEWAY");
        assert_eq!(headers::USER, "X-SP-USER");
        assert_eq!(headers::USER_IP, "X-SP-USER-IP");
        assert_eq!(headers::IDEMPOTENCY_KEY, "X-SP-IDEMPOTENCY-KEY");
    }
}
