//! Boost monitor: polls the status source and fans out alerts.
//!
//! Each tick runs, in order: fetch, new-campaign reset, VIP pre-alert,
//! public live alert, closed reset. Flags are set only after the transport
//! confirms the send, so a failed alert is retried on the next qualifying
//! tick. Ticks never overlap: the run loop awaits each one before waiting
//! for the next interval.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::message;
use crate::domain::{
    boost::{BoostEvent, BoostStatus, MonitorState},
    notification::{Destination, Media, OutboundMessage},
};
use crate::port::outbound::{boost::BoostStatusSource, notifier::Notifier};

/// Monitor tuning and alert presentation.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Time between ticks.
    pub poll_interval: StdDuration,
    /// How long before start the VIP alert may fire.
    pub vip_lead: Duration,
    /// Site linked from every alert.
    pub site_url: String,
    pub vip_media: Option<Media>,
    pub public_media: Option<Media>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval: StdDuration::from_secs(30),
            vip_lead: Duration::minutes(5),
            site_url: "https://myboostiq.app".into(),
            vip_media: None,
            public_media: None,
        }
    }
}

/// What a single tick did. Used for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The status fetch succeeded and the decision steps ran.
    pub evaluated: bool,
    pub new_campaign: bool,
    pub vip_alert_sent: bool,
    pub public_alert_sent: bool,
    pub flags_reset: bool,
}

/// Watches boost campaigns and emits VIP and public alerts once each.
pub struct BoostMonitor {
    source: Arc<dyn BoostStatusSource>,
    notifier: Arc<dyn Notifier>,
    settings: MonitorSettings,
    state: MonitorState,
}

impl BoostMonitor {
    #[must_use]
    pub fn new(
        source: Arc<dyn BoostStatusSource>,
        notifier: Arc<dyn Notifier>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            source,
            notifier,
            settings,
            state: MonitorState::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Run one tick against the current time.
    pub async fn poll(&mut self) -> TickOutcome {
        self.poll_at(Utc::now()).await
    }

    /// Run one tick as if the current time were `now`.
    pub async fn poll_at(&mut self, now: DateTime<Utc>) -> TickOutcome {
        match self.source.fetch_status().await {
            Ok(event) => self.evaluate(&event, now).await,
            Err(e) => {
                warn!(error = %e, "Boost status fetch failed, skipping tick");
                TickOutcome::default()
            }
        }
    }

    /// Apply the decision steps to an already fetched event.
    pub async fn evaluate(&mut self, event: &BoostEvent, now: DateTime<Utc>) -> TickOutcome {
        let mut outcome = TickOutcome {
            evaluated: true,
            ..TickOutcome::default()
        };

        debug!(boost_id = %event.id, status = %event.status, "Status check");

        if self.state.observe(&event.id) {
            info!(boost_id = %event.id, "New boost detected");
            outcome.new_campaign = true;
        }

        if event.status == BoostStatus::Pre
            && !self.state.vip_alert_sent()
            && event.in_vip_window(now, self.settings.vip_lead)
        {
            outcome.vip_alert_sent = self.send_vip_alert(event, now).await;
        }

        if event.status.is_active() && !self.state.public_alert_sent() {
            outcome.public_alert_sent = self.send_public_alert(event).await;
        }

        if event.status == BoostStatus::Closed && self.state.reset_on_closed() {
            info!(boost_id = %event.id, "Boost closed, resetting alert flags");
            outcome.flags_reset = true;
        }

        outcome
    }

    async fn send_vip_alert(&mut self, event: &BoostEvent, now: DateTime<Utc>) -> bool {
        let message = OutboundMessage::text(message::vip_alert(event, now, &self.settings.site_url))
            .with_media(self.settings.vip_media.clone());

        match self.notifier.deliver(Destination::VipGroup, &message).await {
            Ok(()) => {
                self.state.mark_vip_sent();
                info!(boost_id = %event.id, "VIP alert sent");
                true
            }
            Err(e) => {
                error!(boost_id = %event.id, error = %e, "Failed to send VIP alert");
                false
            }
        }
    }

    async fn send_public_alert(&mut self, event: &BoostEvent) -> bool {
        let message = OutboundMessage::text(message::public_alert(event, &self.settings.site_url))
            .with_media(self.settings.public_media.clone());

        let mut all_delivered = true;
        for destination in Destination::PUBLIC {
            if !self.state.public_pending(destination) {
                continue;
            }
            match self.notifier.deliver(destination, &message).await {
                Ok(()) => self.state.mark_public_delivered(destination),
                Err(e) => {
                    all_delivered = false;
                    error!(
                        boost_id = %event.id,
                        %destination,
                        error = %e,
                        "Failed to send public alert"
                    );
                }
            }
        }

        if all_delivered {
            self.state.mark_public_sent();
            info!(boost_id = %event.id, "Public alert sent");
        }
        all_delivered
    }

    /// Poll forever on the configured interval until `shutdown` fires.
    ///
    /// An in-flight tick always completes before the loop exits.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_secs = self.settings.poll_interval.as_secs(),
            "Boost monitor started"
        );

        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.poll().await;
                }
            }
        }

        info!("Boost monitor stopped");
    }
}
