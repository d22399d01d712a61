//! Boostwatch - boost alerts and paid VIP subscriptions over Telegram.
//!
//! The bot polls an upstream API for the current boost campaign and sends
//! two alerts per campaign: a VIP pre-alert shortly before start and a
//! public alert once the campaign is live. Users buy VIP access by paying
//! USDT to a configured wallet and registering the transaction hash; the
//! payment is verified on-chain, the wallet is whitelisted upstream and the
//! subscription expires after a fixed duration.
//!
//! # Architecture
//!
//! - [`domain`] - Boost campaigns, subscriptions, payments and destinations
//! - [`port`] - Trait seams between the core and the outside world
//! - [`application`] - Boost monitor, subscription lifecycle, announcements
//! - [`adapter`] - Upstream API, block explorer, SQLite, Telegram and the CLI
//! - [`infrastructure`] - Configuration, factories and the runtime
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `telegram` (default) - Telegram transport and command listener
//! - `testkit` - Fakes and builders for integration tests
//!
//! # Example
//!
//! ```no_run
//! use boostwatch::infrastructure::config::settings::Config;
//! use boostwatch::infrastructure::orchestration::runtime;
//!
//! # async fn example() -> boostwatch::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! config.init_logging();
//! runtime::run(config).await
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
