//! Block explorer configuration.

use serde::Deserialize;

/// Explorer API and link settings.
///
/// The API key is read from `BSC_API_KEY`, never from the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerConfig {
    /// Explorer API endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Human-facing explorer site, used for links.
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,
}

fn default_api_url() -> String {
    "https://api.bscscan.com/api".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_explorer_url() -> String {
    "https://bscscan.com".to_string()
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            explorer_url: default_explorer_url(),
        }
    }
}

impl ExplorerConfig {
    /// Explorer page for an address.
    #[must_use]
    pub fn address_url(&self, address: &str) -> String {
        format!("{}/address/{address}", self.explorer_url.trim_end_matches('/'))
    }

    /// Explorer page for a transaction.
    #[must_use]
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{tx_hash}", self.explorer_url.trim_end_matches('/'))
    }
}
