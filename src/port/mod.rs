//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the seams between the core (boost monitor and subscription
//! lifecycle) and the outside world.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  monitor · subscription │
//!                    └─────────────────────────┘
//!          │              │             │              │
//!          ▼              ▼             ▼              ▼
//!   ┌────────────┐ ┌────────────┐ ┌───────────┐ ┌───────────┐
//!   │ BoostStatus│ │ Whitelist  │ │  Payment  │ │ Notifier  │
//!   │   Source   │ │  Registry  │ │ Verifier  │ │           │
//!   └────────────┘ └────────────┘ └───────────┘ └───────────┘
//! ```
//!
//! - [`outbound`]: driven side, implemented by adapters
//! - [`inbound`]: driving side, consumed by the Telegram command surface

pub mod inbound;
pub mod outbound;
