//! Transport-agnostic domain types.
//!
//! - [`boost`] - boost campaigns and the alert bookkeeping state
//! - [`subscription`] - paid subscriptions and status views
//! - [`payment`] - payment verification outcomes
//! - [`address`] - validated wallet addresses and transaction hashes
//! - [`notification`] - logical destinations and outbound messages

pub mod address;
pub mod boost;
pub mod error;
pub mod id;
pub mod notification;
pub mod payment;
pub mod subscription;
