//! Core types for the Synapse client
//!
//! This module defines the data structures shared by the credential store, the
//! HTTP client and the resource layer.
//!
//! # Architecture
//!
//! The types module is organized as follows:
//! - [`credentials`] - Authentication material and partial updates
//! - [`config`] - Client configuration and the pinned certificate
//! - [`request`] - Per-call request description
//! - [`constants`] - Base URLs, header names and the default deadline
//!
//! # Examples
//!
//! ```
//! use synapse_pay_rest::types::{ClientConfig, CredentialUpdate, Credentials};
//! use std::time::Duration;
//!
//! # fn example() -> synapse_pay_rest::Result<()> {
//! let credentials = Credentials::new("client_id", "client_secret", "fingerprint", "127.0.0.1");
//! let config = ClientConfig::sandbox(credentials)
//!     .with_timeout(Duration::from_secs(60))
//!     .with_logging(true);
//!
//! config.validate()?;
//!
//! let update = CredentialUpdate::new().with_oauth_key("oauth_key");
//! assert!(!update.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod credentials;
pub mod request;

// Re-export commonly used types
pub use config::{ClientConfig, PinnedCertificate};
pub use constants::{environments, headers, DEFAULT_TIMEOUT};
pub use credentials::{CredentialUpdate, Credentials};
pub use request::{Method, RequestSpec};
