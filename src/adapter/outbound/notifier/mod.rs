//! Notification adapters.
//!
//! Implements the `port::outbound::notifier::Notifier` trait for Telegram.
//! Dry runs use the port's `LogNotifier` instead.

#[cfg(feature = "telegram")]
pub mod telegram;
