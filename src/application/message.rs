//! Message templates for alerts and subscriber notices.
//!
//! Plain text only; transports send these without a parse mode.

use chrono::{DateTime, Utc};

use crate::domain::{boost::BoostEvent, subscription::Subscription};

const DEXSCREENER_URL: &str = "https://dexscreener.com/bsc";

/// Early alert for VIP subscribers ahead of the active phase.
#[must_use]
pub fn vip_alert(event: &BoostEvent, now: DateTime<Utc>, site_url: &str) -> String {
    format!(
        "🚨 VIP BOOST ALERT 🚨\n\
        \n\
        Pair: {pair}\n\
        Contract: {contract}\n\
        Starts in: {minutes} minutes\n\
        \n\
        📊 Chart: {DEXSCREENER_URL}/{contract}\n\
        🌐 Join: {site_url}\n\
        \n\
        ⏰ Prepare your position NOW!",
        pair = event.pair_symbol,
        contract = event.contract_address,
        minutes = event.minutes_until_start(now),
    )
}

/// Public alert once the boost is live.
#[must_use]
pub fn public_alert(event: &BoostEvent, site_url: &str) -> String {
    format!(
        "🔥 BOOST LIVE NOW!\n\
        \n\
        Pair: {pair}\n\
        Phase: {phase}\n\
        Status: ACTIVE ✅\n\
        \n\
        🌐 Join: {site_url}\n\
        \n\
        ⚡ ACT FAST!",
        pair = event.pair_symbol,
        phase = event.status.as_str().to_uppercase(),
    )
}

/// Direct notice to a subscriber whose access just expired.
#[must_use]
pub fn expiry_notice(subscription: &Subscription) -> String {
    format!(
        "⌛ Your VIP subscription expired on {expired}.\n\
        \n\
        Wallet: {wallet}\n\
        \n\
        Renew anytime with /subscribe.",
        expired = subscription.expires_at.format("%Y-%m-%d %H:%M UTC"),
        wallet = subscription.wallet,
    )
}
