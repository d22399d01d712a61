//! Assembly of the long-lived application services.

use std::sync::Arc;

use crate::adapter::outbound::boost_api::BoostApiClient;
use crate::application::monitor::BoostMonitor;
use crate::application::subscription::SubscriptionManager;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::{
    notifier::{build_notifier, NotifierBundle},
    persistence::build_store,
    upstream::{build_upstream, build_verifier},
};

/// Everything the runtime and the operator commands need.
pub struct Components {
    pub upstream: Arc<BoostApiClient>,
    pub subscriptions: Arc<SubscriptionManager>,
    pub notifiers: NotifierBundle,
}

impl Components {
    /// Build every adapter from `config` and wire the subscription manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or a required
    /// secret is missing.
    pub fn assemble(config: &Config) -> Result<Self> {
        let store = build_store(config)?;
        let upstream = build_upstream(config)?;
        let verifier = build_verifier(config);
        let notifiers = build_notifier(config)?;

        let subscriptions = Arc::new(SubscriptionManager::new(
            store,
            verifier,
            upstream.clone(),
            Arc::clone(&notifiers.notifier),
            config.subscription.to_settings()?,
        ));

        Ok(Self {
            upstream,
            subscriptions,
            notifiers,
        })
    }

    /// A monitor polling the upstream API with the configured cadence.
    #[must_use]
    pub fn monitor(&self, config: &Config) -> BoostMonitor {
        BoostMonitor::new(
            self.upstream.clone(),
            Arc::clone(&self.notifiers.notifier),
            config.monitor.to_settings(),
        )
    }
}
