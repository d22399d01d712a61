//! Input validation errors for domain types.
//!
//! Returned by the `parse` constructors of [`WalletAddress`] and [`TxHash`]
//! before any network call is made.
//!
//! [`WalletAddress`]: crate::domain::address::WalletAddress
//! [`TxHash`]: crate::domain::address::TxHash

use thiserror::Error;

/// Malformed subscriber input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Wallet is not `0x` followed by 40 hex characters.
    #[error("invalid wallet address `{0}`: expected 0x followed by 40 hex characters")]
    InvalidWallet(String),

    /// Transaction hash is not `0x` followed by 64 hex characters.
    #[error("invalid transaction hash `{0}`: expected 0x followed by 64 hex characters")]
    InvalidTxHash(String),
}
