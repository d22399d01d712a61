//! Canonical test settings.
//!
//! Single source of truth for the settings structs used across tests.

use std::time::Duration as StdDuration;

use chrono::Duration;
use rust_decimal::Decimal;

use super::domain::{PAYMENT_WALLET, USDT_CONTRACT};
use crate::application::monitor::MonitorSettings;
use crate::application::subscription::SubscriptionSettings;
use crate::domain::address::WalletAddress;

/// Monitor settings with a 5 minute VIP lead and no media.
pub fn monitor() -> MonitorSettings {
    MonitorSettings {
        poll_interval: StdDuration::from_millis(10),
        vip_lead: Duration::minutes(5),
        site_url: "https://boost.example".to_string(),
        vip_media: None,
        public_media: None,
    }
}

/// 50 USDT for 7 days, paid to [`PAYMENT_WALLET`].
pub fn subscription() -> SubscriptionSettings {
    SubscriptionSettings {
        destination: WalletAddress::parse(PAYMENT_WALLET).expect("valid wallet"),
        token_contract: WalletAddress::parse(USDT_CONTRACT).expect("valid contract"),
        price: Decimal::from(50),
        duration: Duration::days(7),
    }
}
