//! Explorer API wire types.
//!
//! The proxy module mirrors JSON-RPC (`{"jsonrpc":"2.0","id":1,"result":{...}}`),
//! the transaction module uses the explorer envelope
//! (`{"status":"1","message":"OK","result":{...}}`). Both put an error
//! string in `result` when the call itself is refused.

use serde::Deserialize;
use serde_json::Value;

/// Envelope shared by both modules. `result` is parsed later because its
/// shape depends on success.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<RpcError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// `eth_getTransactionReceipt` result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    /// `0x1` success, `0x0` reverted.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub logs: Vec<ReceiptLog>,
}

/// One event log in a receipt.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptLog {
    /// Emitting contract.
    pub address: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub data: String,
}

/// `eth_getTransactionByHash` result, used to tell pending from unknown.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxSummary {
    #[serde(default)]
    pub hash: Option<String>,
    /// `None` until the transaction is mined.
    #[serde(default)]
    pub block_number: Option<String>,
}

/// `gettxreceiptstatus` result.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptStatus {
    /// `"1"` success, `"0"` failed, empty while pending.
    #[serde(default)]
    pub status: String,
}
