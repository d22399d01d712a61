//! Runtime orchestration.
//!
//! Wires adapters to the application services and runs the background
//! loops until shutdown.

pub mod components;
pub mod runtime;
