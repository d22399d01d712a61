//! Infrastructure configuration modules.

pub mod logging;
pub mod monitor;
pub mod settings;
pub mod subscription;
pub mod telegram;
