//! Boost API wire types.
//!
//! Example status body:
//! ```json
//! {"id": 42, "status": "pre", "start_time": 1700000000, "pair_symbol": "CAKE/USDT", "pair": "0x0eD7..."}
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{
    boost::{BoostEvent, BoostStatus},
    id::BoostId,
};

const UNKNOWN: &str = "Unknown";

/// Campaign id as sent upstream: a JSON number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl WireId {
    fn normalize(self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// Epoch seconds, integer or fractional.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum WireTimestamp {
    Int(i64),
    Float(f64),
}

impl WireTimestamp {
    #[allow(clippy::cast_possible_truncation)]
    fn seconds(self) -> i64 {
        match self {
            Self::Int(n) => n,
            Self::Float(n) => n.trunc() as i64,
        }
    }
}

/// `GET /api/status` response.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub id: WireId,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub start_time: Option<WireTimestamp>,
    #[serde(default)]
    pub pair_symbol: Option<String>,
    /// Pair contract address.
    #[serde(default)]
    pub pair: Option<String>,
}

impl StatusResponse {
    #[must_use]
    pub fn into_event(self) -> BoostEvent {
        BoostEvent {
            id: BoostId::new(self.id.normalize()),
            status: BoostStatus::from_wire(&self.status),
            start_time: self.start_time.map_or(0, WireTimestamp::seconds),
            pair_symbol: self.pair_symbol.unwrap_or_else(|| UNKNOWN.to_string()),
            contract_address: self.pair.unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

/// `GET /api/whitelist` response.
#[derive(Debug, Clone, Deserialize)]
pub struct WhitelistResponse {
    #[serde(default)]
    pub whitelist: Vec<String>,
}

/// Admin action on the whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    AddWhitelist,
    RemoveWhitelist,
}

/// `POST /api/admin` body.
#[derive(Debug, Serialize)]
pub struct AdminRequest<'a> {
    pub action: AdminAction,
    pub wallet_address: &'a str,
}
