//! Payment verification port.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use super::TransportError;
use crate::domain::address::{TxHash, WalletAddress};
use crate::domain::payment::{VerificationFailure, VerifiedPayment};

/// Why a payment could not be accepted.
///
/// `Rejected` means the ledger was checked and said no. `Unavailable` means
/// the check could not be made; callers must not treat it as a rejection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error(transparent)]
    Rejected(#[from] VerificationFailure),

    #[error(transparent)]
    Unavailable(#[from] TransportError),
}

/// Checks a transaction against the ledger.
#[async_trait]
pub trait PaymentVerifier: Send + Sync {
    /// Verify that `tx_hash` is a confirmed transfer of at least
    /// `minimum_amount` of `token_contract` to `destination`.
    async fn verify(
        &self,
        tx_hash: &TxHash,
        destination: &WalletAddress,
        token_contract: &WalletAddress,
        minimum_amount: Decimal,
    ) -> Result<VerifiedPayment, VerifyError>;
}
