//! Payment verification outcomes.

use rust_decimal::Decimal;
use thiserror::Error;

use super::address::{TxHash, WalletAddress};

/// A transfer that satisfied every verification check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPayment {
    pub tx_hash: TxHash,
    /// Sender of the token transfer, if the ledger reported one.
    pub from: Option<String>,
    pub to: WalletAddress,
    /// Decimal-adjusted token amount.
    pub amount: Decimal,
}

/// The ledger was checked and the payment does not qualify.
///
/// Each variant is a distinct, user-facing reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationFailure {
    /// No transaction, or no transfer of the expected token in it.
    #[error("no matching token transfer found for this transaction")]
    NotFound,

    /// The transfer paid someone else.
    #[error("payment was sent to {actual}, expected {expected}")]
    WrongDestination { expected: String, actual: String },

    /// The transfer paid less than the subscription price.
    #[error("payment of {received} is below the required {required}")]
    InsufficientAmount { required: Decimal, received: Decimal },

    /// The transaction has not been confirmed yet.
    #[error("transaction is not confirmed yet")]
    Unconfirmed,

    /// The transaction was mined but failed.
    #[error("transaction failed on-chain")]
    Reverted,
}
