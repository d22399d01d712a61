//! Validated on-chain identifiers: wallet addresses and transaction hashes.
//!
//! Both checks are purely syntactic. The `0x` prefix is case sensitive
//! while the hex digits may be in either case.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

const WALLET_HEX_LEN: usize = 40;
const TX_HASH_HEX_LEN: usize = 64;

fn is_prefixed_hex(value: &str, hex_len: usize) -> bool {
    match value.strip_prefix("0x") {
        Some(digits) => digits.len() == hex_len && digits.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

/// An EVM wallet or contract address (`0x` + 40 hex characters).
///
/// The original casing is kept for display. Comparisons through
/// [`WalletAddress::matches`] ignore case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse and validate a wallet address.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidWallet`] when the input is not `0x`
    /// followed by exactly 40 hexadecimal characters.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if is_prefixed_hex(value, WALLET_HEX_LEN) {
            Ok(Self(value.to_string()))
        } else {
            Err(ValidationError::InvalidWallet(value.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against another address string.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }

    /// Lowercase form, used for registry calls and log correlation.
    #[must_use]
    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

/// A transaction hash (`0x` + 64 hex characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxHash(String);

impl TxHash {
    /// Parse and validate a transaction hash.
    ///
    /// Hashes are stored lowercase so the same payment always maps to the
    /// same proof string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTxHash`] when the input is not `0x`
    /// followed by exactly 64 hexadecimal characters.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if is_prefixed_hex(value, TX_HASH_HEX_LEN) {
            Ok(Self(value.to_ascii_lowercase()))
        } else {
            Err(ValidationError::InvalidTxHash(value.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TxHash {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TxHash> for String {
    fn from(value: TxHash) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(n: usize) -> String {
        "a1B2c3D4e5".chars().cycle().take(n).collect()
    }

    #[test]
    fn wallet_accepts_0x_plus_40_hex() {
        let wallet = format!("0x{}", hex(40));
        assert!(WalletAddress::parse(&wallet).is_ok());
    }

    #[test]
    fn wallet_rejects_39_hex() {
        let wallet = format!("0x{}", hex(39));
        assert_eq!(
            WalletAddress::parse(&wallet),
            Err(ValidationError::InvalidWallet(wallet.clone()))
        );
    }

    #[test]
    fn wallet_rejects_41_hex() {
        assert!(WalletAddress::parse(&format!("0x{}", hex(41))).is_err());
    }

    #[test]
    fn wallet_rejects_uppercase_prefix() {
        assert!(WalletAddress::parse(&format!("0X{}", hex(40))).is_err());
    }

    #[test]
    fn wallet_rejects_missing_prefix() {
        assert!(WalletAddress::parse(&hex(40)).is_err());
        assert!(WalletAddress::parse(&hex(42)).is_err());
    }

    #[test]
    fn wallet_rejects_non_hex_characters() {
        let wallet = format!("0x{}g", hex(39));
        assert!(WalletAddress::parse(&wallet).is_err());
    }

    #[test]
    fn wallet_trims_surrounding_whitespace() {
        let wallet = format!("  0x{}\n", hex(40));
        let parsed = WalletAddress::parse(&wallet).unwrap();
        assert_eq!(parsed.as_str(), wallet.trim());
    }

    #[test]
    fn wallet_matches_ignores_case() {
        let wallet = WalletAddress::parse("0xbad5eebd86acebf1a9457ef881b0e22a1fb5b56d").unwrap();
        assert!(wallet.matches("0xBAD5EEBD86ACEBF1A9457EF881B0E22A1FB5B56D"));
        assert!(!wallet.matches("0x0000000000000000000000000000000000000000"));
    }

    #[test]
    fn tx_hash_accepts_64_hex_and_lowercases() {
        let raw = format!("0x{}", hex(64));
        let hash = TxHash::parse(&raw).unwrap();
        assert_eq!(hash.as_str(), raw.to_ascii_lowercase());
    }

    #[test]
    fn tx_hash_rejects_wrong_length_and_prefix() {
        assert!(TxHash::parse(&format!("0x{}", hex(63))).is_err());
        assert!(TxHash::parse(&format!("0X{}", hex(64))).is_err());
        assert!(TxHash::parse(&hex(66)).is_err());
        assert!(TxHash::parse("").is_err());
    }

    #[test]
    fn wallet_is_not_a_tx_hash() {
        assert!(TxHash::parse(&format!("0x{}", hex(40))).is_err());
    }

    #[test]
    fn serde_rejects_invalid_wallet() {
        let result: Result<WalletAddress, _> = serde_json::from_str("\"0x1234\"");
        assert!(result.is_err());
    }
}
