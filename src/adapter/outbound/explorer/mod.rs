//! BscScan-style block explorer: payment verification by transaction hash.

pub mod client;
pub mod dto;
pub mod settings;
pub mod transfer;

pub use client::BscScanVerifier;
pub use settings::ExplorerConfig;
