//! Upstream boost API: campaign status and the VIP whitelist.

pub mod client;
pub mod dto;
pub mod settings;

pub use client::BoostApiClient;
pub use settings::UpstreamConfig;
