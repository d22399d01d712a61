//! Boost API HTTP client.
//!
//! One client serves two ports: [`BoostStatusSource`] reads the current
//! campaign and [`WhitelistRegistry`] edits the VIP whitelist through the
//! bearer-authenticated admin endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{AdminAction, AdminRequest, StatusResponse, WhitelistResponse};
use super::settings::UpstreamConfig;
use crate::domain::{address::WalletAddress, boost::BoostEvent};
use crate::port::outbound::{
    boost::BoostStatusSource, registry::WhitelistRegistry, TransportError,
};

const SERVICE: &str = "boost_api";

/// HTTP client for the upstream boost API.
pub struct BoostApiClient {
    http: HttpClient,
    base_url: String,
    admin_token: String,
}

impl BoostApiClient {
    /// Create a client for `base_url` with the given request timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>, admin_token: impl Into<String>, timeout: Duration) -> Self {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            admin_token: admin_token.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &UpstreamConfig, admin_token: impl Into<String>) -> Self {
        Self::new(
            config.base_url.clone(),
            admin_token,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| TransportError::from_reqwest(SERVICE, &e))?;

        response
            .json::<T>()
            .await
            .map_err(|e| TransportError::MalformedResponse {
                service: SERVICE,
                reason: e.to_string(),
            })
    }

    async fn admin(&self, action: AdminAction, wallet: &WalletAddress) -> Result<(), TransportError> {
        let body = AdminRequest {
            action,
            wallet_address: wallet.as_str(),
        };

        self.http
            .post(self.url("/api/admin"))
            .bearer_auth(&self.admin_token)
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| TransportError::from_reqwest(SERVICE, &e))?;

        debug!(?action, %wallet, "Whitelist updated");
        Ok(())
    }
}

#[async_trait]
impl BoostStatusSource for BoostApiClient {
    async fn fetch_status(&self) -> Result<BoostEvent, TransportError> {
        let response: StatusResponse = self.get_json("/api/status").await?;
        Ok(response.into_event())
    }
}

#[async_trait]
impl WhitelistRegistry for BoostApiClient {
    async fn add(&self, wallet: &WalletAddress) -> Result<(), TransportError> {
        self.admin(AdminAction::AddWhitelist, wallet).await
    }

    async fn remove(&self, wallet: &WalletAddress) -> Result<(), TransportError> {
        self.admin(AdminAction::RemoveWhitelist, wallet).await
    }

    async fn list(&self) -> Result<Vec<String>, TransportError> {
        let response: WhitelistResponse = self.get_json("/api/whitelist").await?;
        Ok(response.whitelist)
    }
}
