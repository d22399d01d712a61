//! Component factory functions.
//!
//! Each factory turns a slice of [`Config`](crate::infrastructure::config::settings::Config)
//! into a ready adapter behind its port.

pub mod notifier;
pub mod persistence;
pub mod upstream;
