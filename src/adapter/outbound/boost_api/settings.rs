//! Upstream boost API configuration.

use serde::Deserialize;

/// Connection settings for the boost API.
///
/// The admin bearer token is read from `BOOST_ADMIN_TOKEN`, never from the
/// config file.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL, e.g. `https://api.myboostiq.app`.
    #[serde(default)]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
