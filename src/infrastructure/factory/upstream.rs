//! Factories for the HTTP adapters: upstream boost API and block explorer.

use std::sync::Arc;

use crate::adapter::outbound::boost_api::BoostApiClient;
use crate::adapter::outbound::explorer::BscScanVerifier;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;

/// Build the upstream client. Whitelist calls need `BOOST_ADMIN_TOKEN`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] if the admin token is not set.
pub fn build_upstream(config: &Config) -> Result<Arc<BoostApiClient>> {
    let admin_token = config
        .secrets
        .admin_token
        .clone()
        .ok_or(ConfigError::MissingField {
            field: "BOOST_ADMIN_TOKEN",
        })?;
    Ok(Arc::new(BoostApiClient::from_config(
        &config.upstream,
        admin_token,
    )))
}

/// Build the payment verifier. `BSC_API_KEY` is optional.
#[must_use]
pub fn build_verifier(config: &Config) -> Arc<BscScanVerifier> {
    Arc::new(BscScanVerifier::from_config(
        &config.explorer,
        config.secrets.bsc_api_key.clone(),
        config.subscription.token_decimals,
    ))
}
