//! VIP whitelist registry port.

use async_trait::async_trait;

use super::TransportError;
use crate::domain::address::WalletAddress;

/// External system of record for which wallets currently have VIP access.
#[async_trait]
pub trait WhitelistRegistry: Send + Sync {
    /// Grant access to `wallet`.
    async fn add(&self, wallet: &WalletAddress) -> Result<(), TransportError>;

    /// Revoke access for `wallet`.
    async fn remove(&self, wallet: &WalletAddress) -> Result<(), TransportError>;

    /// Every whitelisted wallet, as reported by the registry.
    async fn list(&self) -> Result<Vec<String>, TransportError>;
}
