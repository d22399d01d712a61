//! Subscription pricing and payment configuration.

use std::time::Duration as StdDuration;

use chrono::Duration;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::subscription::SubscriptionSettings;
use crate::domain::address::WalletAddress;
use crate::error::{ConfigError, Result};

/// USDT on BNB Smart Chain.
pub const USDT_BEP20: &str = "0x55d398326f99059fF775485246999027B3197955";

/// What a subscription costs and where it is paid.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionConfig {
    /// Payment destination wallet.
    #[serde(default)]
    pub wallet: String,
    /// Token contract accepted as payment.
    #[serde(default = "default_token_contract")]
    pub token_contract: String,
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u32,
    /// Minimum payment, in whole tokens.
    #[serde(default = "default_price")]
    pub price: Decimal,
    #[serde(default = "default_duration_days")]
    pub duration_days: i64,
    /// Seconds between expiry sweeps (default: 3600).
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_token_contract() -> String {
    USDT_BEP20.to_string()
}

const fn default_token_decimals() -> u32 {
    18
}

fn default_price() -> Decimal {
    Decimal::from(50)
}

const fn default_duration_days() -> i64 {
    7
}

const fn default_sweep_interval_secs() -> u64 {
    3600
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            wallet: String::new(),
            token_contract: default_token_contract(),
            token_decimals: default_token_decimals(),
            price: default_price(),
            duration_days: default_duration_days(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl SubscriptionConfig {
    /// Lifecycle settings with parsed addresses.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for a malformed wallet or
    /// contract address.
    pub fn to_settings(&self) -> Result<SubscriptionSettings> {
        Ok(SubscriptionSettings {
            destination: parse_address("subscription.wallet", &self.wallet)?,
            token_contract: parse_address("subscription.token_contract", &self.token_contract)?,
            price: self.price,
            duration: Duration::days(self.duration_days),
        })
    }

    #[must_use]
    pub fn sweep_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.sweep_interval_secs)
    }
}

fn parse_address(field: &'static str, value: &str) -> Result<WalletAddress> {
    WalletAddress::parse(value).map_err(|e| {
        ConfigError::InvalidValue {
            field,
            reason: e.to_string(),
        }
        .into()
    })
}
