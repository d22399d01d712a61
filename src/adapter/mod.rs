//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`]: driving side, the command-line interface
//! - [`outbound`]: driven side, HTTP clients, SQLite and Telegram

pub mod inbound;
pub mod outbound;
