//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod boost;
pub mod notifier;
pub mod payment;
pub mod registry;
pub mod store;
pub mod transport;

pub use transport::TransportError;
