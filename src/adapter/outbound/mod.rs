//! Outbound adapters (driven side).

pub mod boost_api;
pub mod explorer;
pub mod notifier;
pub mod sqlite;
