//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic: configuration, adapter construction and the runtime that
//! runs the background loops.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`factory`] - Component factory functions
//! - [`orchestration`] - Runtime wiring and lifecycle

pub mod config;
pub mod factory;
pub mod orchestration;
