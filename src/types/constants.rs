//! Common constants for environments and wire headers

use std::time::Duration;

/// API base URLs
pub mod environments {
    /// Sandbox (UAT) base URL
    pub const SANDBOX_BASE_URL: &str = "https://uat-api.synapsefi.com/v3.1";
    /// Production base URL
    pub const PRODUCTION_BASE_URL: &str = "https://api.synapsefi.com/v3.1";

    /// Pick the base URL for an environment
    pub fn base_url(production: bool) -> &'static str {
        if production {
            PRODUCTION_BASE_URL
        } else {
            SANDBOX_BASE_URL
        }
    }
}

/// Header names sent to the upstream API
pub mod headers {
    /// `client_id|client_secret`
    pub const GATEWAY: &str = "X-SP-GATEWAY";
    /// `oauth_key|fingerprint`
    pub const USER: &str = "X-SP-USER";
    /// End user's IP address
    pub const USER_IP: &str = "X-SP-USER-IP";
    /// Caller-supplied deduplication token
    pub const IDEMPOTENCY_KEY: &str = "X-SP-IDEMPOTENCY-KEY";

    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const ACCEPT: &str = "Accept";
    pub const JSON: &str = "application/json";

    /// CORS headers added when requests go through a proxy
    pub const ACCESS_CONTROL: [(&str, &str); 3] = [
        (
            "Access-Control-Allow-Methods",
            "GET,PUT,POST,DELETE,OPTIONS",
        ),
        (
            "Access-Control-Allow-Headers",
            "X-Requested-With,Content-type,Accept,X-Access-Token,X-Key",
        ),
        ("Access-Control-Allow-Origin", "*"),
    ];
}

/// Deadline applied to every request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
