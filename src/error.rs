//! Crate-level errors.
//!
//! Network failures never surface here: adapters report them as
//! [`TransportError`](crate::port::outbound::TransportError) and the
//! application decides what they mean.

use thiserror::Error;

use crate::domain::error::ValidationError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The payment proof was consumed by another subscriber.
    #[error("payment proof already consumed")]
    ProofConsumed,

    /// Another subscriber's record holds the wallet.
    #[error("wallet held by another subscriber")]
    WalletInUse,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    /// A stored value no longer parses.
    #[error("corrupt record: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
