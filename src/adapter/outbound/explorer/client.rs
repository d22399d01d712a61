//! BscScan API client implementing [`PaymentVerifier`].
//!
//! A payment is verified with two lookups: the transaction receipt (for the
//! token transfer logs) and the receipt status (for on-chain success). A
//! missing receipt triggers a third lookup that tells a pending transaction
//! from an unknown one.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::dto::{Envelope, ReceiptStatus, TxReceipt, TxSummary};
use super::settings::ExplorerConfig;
use super::transfer::select_payment;
use crate::domain::{
    address::{TxHash, WalletAddress},
    payment::{VerificationFailure, VerifiedPayment},
};
use crate::port::outbound::{
    payment::{PaymentVerifier, VerifyError},
    TransportError,
};

const SERVICE: &str = "explorer";

/// Verifies token payments through a BscScan-compatible API.
pub struct BscScanVerifier {
    http: HttpClient,
    api_url: String,
    api_key: Option<String>,
    token_decimals: u32,
}

impl BscScanVerifier {
    #[must_use]
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<String>,
        token_decimals: u32,
        timeout: Duration,
    ) -> Self {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            api_url: api_url.into(),
            api_key,
            token_decimals,
        }
    }

    #[must_use]
    pub fn from_config(config: &ExplorerConfig, api_key: Option<String>, token_decimals: u32) -> Self {
        Self::new(
            config.api_url.clone(),
            api_key,
            token_decimals,
            Duration::from_secs(config.timeout_secs),
        )
    }

    async fn call(&self, module: &str, action: &str, tx_hash: &TxHash) -> Result<Envelope, TransportError> {
        let mut query = vec![
            ("module", module),
            ("action", action),
            ("txhash", tx_hash.as_str()),
        ];
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.as_str()));
        }

        let response = self
            .http
            .get(&self.api_url)
            .query(&query)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| TransportError::from_reqwest(SERVICE, &e))?;

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| malformed(e.to_string()))?;

        if let Some(error) = &envelope.error {
            return Err(TransportError::Unavailable {
                service: SERVICE,
                reason: format!("rpc error {}: {}", error.code, error.message),
            });
        }
        Ok(envelope)
    }

    /// Fetch the receipt. `None` when the explorer does not know the hash.
    async fn receipt(&self, tx_hash: &TxHash) -> Result<Option<TxReceipt>, TransportError> {
        let envelope = self
            .call("proxy", "eth_getTransactionReceipt", tx_hash)
            .await?;
        match envelope.result {
            Value::Null => Ok(None),
            Value::String(reason) => Err(refused(reason)),
            other => parse(other).map(Some),
        }
    }

    /// Fetch the transaction itself. `None` when the hash is unknown.
    async fn transaction(&self, tx_hash: &TxHash) -> Result<Option<TxSummary>, TransportError> {
        let envelope = self
            .call("proxy", "eth_getTransactionByHash", tx_hash)
            .await?;
        match envelope.result {
            Value::Null => Ok(None),
            Value::String(reason) => Err(refused(reason)),
            other => parse(other).map(Some),
        }
    }

    async fn receipt_status(&self, tx_hash: &TxHash) -> Result<ReceiptStatus, TransportError> {
        let envelope = self
            .call("transaction", "gettxreceiptstatus", tx_hash)
            .await?;
        match envelope.result {
            Value::String(reason) => Err(refused(reason)),
            other => parse(other),
        }
    }
}

fn malformed(reason: String) -> TransportError {
    TransportError::MalformedResponse {
        service: SERVICE,
        reason,
    }
}

fn refused(reason: String) -> TransportError {
    TransportError::Unavailable {
        service: SERVICE,
        reason,
    }
}

fn parse<T: DeserializeOwned>(value: Value) -> Result<T, TransportError> {
    serde_json::from_value(value).map_err(|e| malformed(e.to_string()))
}

#[async_trait]
impl PaymentVerifier for BscScanVerifier {
    async fn verify(
        &self,
        tx_hash: &TxHash,
        destination: &WalletAddress,
        token_contract: &WalletAddress,
        minimum_amount: Decimal,
    ) -> Result<VerifiedPayment, VerifyError> {
        let Some(receipt) = self.receipt(tx_hash).await? else {
            return match self.transaction(tx_hash).await? {
                Some(tx) => {
                    debug!(%tx_hash, block = ?tx.block_number, "Transaction has no receipt yet");
                    Err(VerificationFailure::Unconfirmed.into())
                }
                None => {
                    debug!(%tx_hash, "Unknown transaction");
                    Err(VerificationFailure::NotFound.into())
                }
            };
        };

        let status = self.receipt_status(tx_hash).await?;
        match status.status.as_str() {
            "1" => {}
            "0" => return Err(VerificationFailure::Reverted.into()),
            _ => return Err(VerificationFailure::Unconfirmed.into()),
        }

        let transfer = select_payment(
            &receipt.logs,
            destination,
            token_contract,
            minimum_amount,
            self.token_decimals,
        )?;

        debug!(%tx_hash, from = %transfer.from, amount = %transfer.amount, "Payment verified");

        Ok(VerifiedPayment {
            tx_hash: tx_hash.clone(),
            from: Some(transfer.from),
            to: destination.clone(),
            amount: transfer.amount,
        })
    }
}
