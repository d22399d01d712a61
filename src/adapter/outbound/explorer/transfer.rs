//! ERC-20 `Transfer` log decoding and payment checks.

use rust_decimal::Decimal;

use super::dto::ReceiptLog;
use crate::domain::{address::WalletAddress, payment::VerificationFailure};

/// `keccak256("Transfer(address,address,uint256)")`.
pub const TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// A decoded token transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTransfer {
    /// Lowercase `0x` sender address.
    pub from: String,
    /// Lowercase `0x` recipient address.
    pub to: String,
    /// Decimal-adjusted amount.
    pub amount: Decimal,
}

/// Decode a `Transfer` log. `None` for any other event or bad encoding.
#[must_use]
pub fn decode_transfer(log: &ReceiptLog, decimals: u32) -> Option<TokenTransfer> {
    let [topic0, from, to] = log.topics.get(..3)? else {
        return None;
    };
    if !topic0.eq_ignore_ascii_case(TRANSFER_TOPIC) {
        return None;
    }

    Some(TokenTransfer {
        from: topic_address(from)?,
        to: topic_address(to)?,
        amount: scale_amount(&log.data, decimals)?,
    })
}

/// Last 20 bytes of a 32-byte topic, as a lowercase address.
fn topic_address(topic: &str) -> Option<String> {
    let hex = topic.strip_prefix("0x")?;
    if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("0x{}", hex[24..].to_ascii_lowercase()))
}

/// Parse a hex `uint256` and shift it by `decimals`.
fn scale_amount(data: &str, decimals: u32) -> Option<Decimal> {
    let hex = data.strip_prefix("0x").unwrap_or(data);
    let significant = hex.trim_start_matches('0');
    let raw = if significant.is_empty() {
        0
    } else {
        u128::from_str_radix(significant, 16).ok()?
    };
    let raw = i128::try_from(raw).ok()?;
    Decimal::try_from_i128_with_scale(raw, decimals)
        .ok()
        .map(|d| d.normalize())
}

/// Pick the transfer that pays for the subscription.
///
/// Only logs emitted by `token_contract` count. Among those, a transfer to
/// `destination` is preferred, the largest one if there are several.
///
/// # Errors
///
/// [`VerificationFailure::NotFound`] without any transfer of the token,
/// [`VerificationFailure::WrongDestination`] when none pays `destination`,
/// [`VerificationFailure::InsufficientAmount`] when the best one pays less
/// than `minimum_amount`.
pub fn select_payment(
    logs: &[ReceiptLog],
    destination: &WalletAddress,
    token_contract: &WalletAddress,
    minimum_amount: Decimal,
    decimals: u32,
) -> Result<TokenTransfer, VerificationFailure> {
    let transfers: Vec<_> = logs
        .iter()
        .filter(|log| token_contract.matches(&log.address))
        .filter_map(|log| decode_transfer(log, decimals))
        .collect();

    let Some(first) = transfers.first() else {
        return Err(VerificationFailure::NotFound);
    };

    let best = transfers
        .iter()
        .filter(|t| destination.matches(&t.to))
        .max_by_key(|t| t.amount)
        .ok_or_else(|| VerificationFailure::WrongDestination {
            expected: destination.to_lowercase(),
            actual: first.to.clone(),
        })?;

    if best.amount < minimum_amount {
        return Err(VerificationFailure::InsufficientAmount {
            required: minimum_amount,
            received: best.amount,
        });
    }

    Ok(best.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const USDT: &str = "0x55d398326f99059fF775485246999027B3197955";
    const DEST: &str = "0xbad5eebd86acebf1a9457ef881b0e22a1fb5b56d";
    const PAYER: &str = "0x1111111111111111111111111111111111111111";
    const OTHER: &str = "0x2222222222222222222222222222222222222222";

    fn topic(address: &str) -> String {
        format!("0x{:0>64}", &address[2..])
    }

    /// Transfer log for `tokens` whole tokens with 18 decimals.
    fn transfer_log(contract: &str, to: &str, tokens: u128) -> ReceiptLog {
        ReceiptLog {
            address: contract.to_string(),
            topics: vec![TRANSFER_TOPIC.to_string(), topic(PAYER), topic(to)],
            data: format!("0x{:064x}", tokens * 10u128.pow(18)),
        }
    }

    fn wallet(s: &str) -> WalletAddress {
        WalletAddress::parse(s).unwrap()
    }

    fn select(logs: &[ReceiptLog], minimum: Decimal) -> Result<TokenTransfer, VerificationFailure> {
        select_payment(logs, &wallet(DEST), &wallet(USDT), minimum, 18)
    }

    #[test]
    fn decodes_transfer_log() {
        let transfer = decode_transfer(&transfer_log(USDT, DEST, 50), 18).unwrap();
        assert_eq!(transfer.from, PAYER);
        assert_eq!(transfer.to, DEST);
        assert_eq!(transfer.amount, dec!(50));
    }

    #[test]
    fn fractional_amounts_keep_precision() {
        let mut log = transfer_log(USDT, DEST, 0);
        log.data = format!("0x{:064x}", 49_990_000_000_000_000_000u128);
        assert_eq!(decode_transfer(&log, 18).unwrap().amount, dec!(49.99));
    }

    #[test]
    fn other_events_are_ignored() {
        let mut log = transfer_log(USDT, DEST, 50);
        log.topics[0] = format!("0x{}", "8c".repeat(32));
        assert!(decode_transfer(&log, 18).is_none());

        let mut log = transfer_log(USDT, DEST, 50);
        log.topics.truncate(2);
        assert!(decode_transfer(&log, 18).is_none());
    }

    #[test]
    fn accepts_exact_price_with_mixed_case_contract() {
        let log = transfer_log(&USDT.to_lowercase(), DEST, 50);
        assert_eq!(select(&[log], dec!(50)).unwrap().amount, dec!(50));
    }

    #[test]
    fn other_token_is_not_found() {
        let log = transfer_log(OTHER, DEST, 500);
        assert_eq!(select(&[log], dec!(50)), Err(VerificationFailure::NotFound));
        assert_eq!(select(&[], dec!(50)), Err(VerificationFailure::NotFound));
    }

    #[test]
    fn wrong_destination_reports_recipient() {
        let log = transfer_log(USDT, OTHER, 50);
        assert_eq!(
            select(&[log], dec!(50)),
            Err(VerificationFailure::WrongDestination {
                expected: DEST.to_string(),
                actual: OTHER.to_string(),
            })
        );
    }

    #[test]
    fn insufficient_amount_reports_both() {
        let log = transfer_log(USDT, DEST, 49);
        assert_eq!(
            select(&[log], dec!(50)),
            Err(VerificationFailure::InsufficientAmount {
                required: dec!(50),
                received: dec!(49),
            })
        );
    }

    #[test]
    fn prefers_transfer_to_destination() {
        let logs = [
            transfer_log(USDT, OTHER, 1_000),
            transfer_log(USDT, DEST, 10),
            transfer_log(USDT, DEST, 60),
        ];
        let chosen = select(&logs, dec!(50)).unwrap();
        assert_eq!(chosen.to, DEST);
        assert_eq!(chosen.amount, dec!(60));
    }
}
