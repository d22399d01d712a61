//! SQLite persistence adapter.
//!
//! Provides the SQLite-backed subscription store using Diesel ORM with
//! embedded migrations.

pub mod database;
pub mod store;

pub use store::SqliteSubscriptionStore;
