//! Builders for domain primitives used across tests.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    address::{TxHash, WalletAddress},
    boost::{BoostEvent, BoostStatus},
    id::{BoostId, SubscriberId},
    subscription::Subscription,
};

/// Payment destination used by the canonical test settings.
pub const PAYMENT_WALLET: &str = "0xbad5eebd86acebf1a9457ef881b0e22a1fb5b56d";

/// USDT BEP-20 contract used by the canonical test settings.
pub const USDT_CONTRACT: &str = "0x55d398326f99059fF775485246999027B3197955";

/// A boost event for `id` with the given status and start time.
pub fn boost(id: &str, status: BoostStatus, start_time: i64) -> BoostEvent {
    BoostEvent {
        id: BoostId::new(id),
        status,
        start_time,
        pair_symbol: "CAKE/USDT".to_string(),
        contract_address: "0x0eD7e52944161450477ee417DE9Cd3a859b14fD0".to_string(),
    }
}

/// Deterministic wallet string number `n` (`0x` + 40 hex).
pub fn wallet_str(n: u64) -> String {
    format!("0x{n:040x}")
}

/// Deterministic valid wallet number `n`.
pub fn wallet(n: u64) -> WalletAddress {
    WalletAddress::parse(&wallet_str(n)).expect("valid wallet")
}

/// Deterministic transaction hash string number `n` (`0x` + 64 hex).
pub fn tx_hash_str(n: u64) -> String {
    format!("0x{n:064x}")
}

/// Deterministic valid transaction hash number `n`.
pub fn tx_hash(n: u64) -> TxHash {
    TxHash::parse(&tx_hash_str(n)).expect("valid tx hash")
}

/// A subscription for subscriber `id` expiring at `expires_at`.
pub fn subscription(id: i64, expires_at: DateTime<Utc>) -> Subscription {
    let n = id.unsigned_abs();
    Subscription {
        subscriber: SubscriberId::new(id),
        wallet: wallet(n),
        expires_at,
        proof: tx_hash(n),
        registered_at: expires_at - Duration::days(7),
        amount: Decimal::from(50),
    }
}
