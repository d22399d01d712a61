//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`] - [`ScriptedStatusSource`](source::ScriptedStatusSource), a
//!   queue-backed boost status source.
//! - [`notifier`] - [`RecordingNotifier`](notifier::RecordingNotifier) with
//!   per-destination failure injection.
//! - [`fakes`] - in-memory store, whitelist registry and payment verifier.
//! - [`domain`] - Builders for domain primitives: events, wallets, hashes.
//! - [`config`] - Canonical settings for the monitor and lifecycle manager.

pub mod config;
pub mod domain;
pub mod fakes;
pub mod notifier;
pub mod source;
