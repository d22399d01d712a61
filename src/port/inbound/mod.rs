//! Inbound (driving) ports consumed by inbound adapters.
//!
//! - [`subscription`]: subscriber-facing registration, status and
//!   unregistration, driven by the Telegram command surface

pub mod subscription;
