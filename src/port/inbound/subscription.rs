//! Subscription use cases exposed to inbound adapters.
//!
//! The Telegram command surface depends on this trait rather than on the
//! concrete lifecycle manager, so it can be driven by a fake in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    error::ValidationError,
    id::SubscriberId,
    payment::VerificationFailure,
    subscription::{Confirmation, Subscription, SubscriptionStatus},
};
use crate::error::Error;
use crate::port::outbound::TransportError;

/// Why a registration did not go through.
///
/// No variant leaves local state changed.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Malformed wallet or transaction hash; nothing was checked.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The payment already bought a subscription period, for this
    /// subscriber or another one.
    #[error("transaction already used for a subscription")]
    ProofAlreadyUsed,

    /// Another subscriber holds the wallet.
    #[error("wallet already registered by another subscriber")]
    WalletInUse,

    /// The ledger was checked and the payment does not qualify.
    #[error("payment rejected: {0}")]
    Verification(VerificationFailure),

    /// The ledger could not be checked.
    #[error("payment could not be verified right now: {0}")]
    VerifierUnavailable(TransportError),

    /// The whitelist registry refused or could not be reached.
    #[error("whitelist update failed: {0}")]
    Registry(TransportError),

    /// Local persistence failed.
    #[error("storage error: {0}")]
    Store(#[source] Error),
}

/// Why an unregistration did not go through.
#[derive(Error, Debug)]
pub enum UnregisterError {
    #[error("no active subscription")]
    NotFound,

    #[error("whitelist update failed: {0}")]
    Registry(TransportError),

    #[error("storage error: {0}")]
    Store(#[source] Error),
}

/// Subscriber-facing subscription operations.
#[async_trait]
pub trait SubscriptionService: Send + Sync {
    /// Verify the payment and grant VIP access to `wallet`.
    async fn register(
        &self,
        subscriber: SubscriberId,
        wallet: &str,
        tx_hash: &str,
    ) -> Result<Confirmation, RegistrationError>;

    /// Look up the subscriber's current subscription.
    async fn check_status(&self, subscriber: SubscriberId) -> Result<SubscriptionStatus, Error>;

    /// Revoke VIP access and forget the subscription.
    async fn unregister(&self, subscriber: SubscriberId) -> Result<Subscription, UnregisterError>;
}
