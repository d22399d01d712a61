//! Application services (use cases).
//!
//! These services hold the alert and subscription rules and drive the
//! outbound ports; they know nothing about HTTP, SQL or Telegram.

pub mod announce;
pub mod message;
pub mod monitor;
pub mod subscription;
