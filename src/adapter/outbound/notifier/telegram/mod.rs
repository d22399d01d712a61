//! Telegram delivery and the bot command surface.
//!
//! [`TelegramNotifier`] delivers alerts to the configured chats;
//! [`run_command_listener`] answers user commands through
//! [`TelegramControl`].

mod auth;
mod command;
mod format;

pub mod control;
pub mod notifier;

pub use control::{PaymentInfo, TelegramControl};
pub use notifier::{run_command_listener, TelegramConfig, TelegramDestinations, TelegramNotifier};
