//! Boost monitor configuration.

use std::time::Duration as StdDuration;

use chrono::Duration;
use serde::Deserialize;

use crate::application::monitor::MonitorSettings;
use crate::domain::notification::Media;

/// Poll cadence and alert presentation.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between status polls (default: 30).
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Minutes before start at which the VIP alert may fire (default: 5).
    #[serde(default = "default_vip_lead_minutes")]
    pub vip_lead_minutes: i64,
    /// Site linked from alerts and bot replies.
    #[serde(default = "default_site_url")]
    pub site_url: String,
    /// Media attached to the VIP alert.
    #[serde(default)]
    pub vip_media: Option<Media>,
    /// Media attached to the public alert.
    #[serde(default)]
    pub public_media: Option<Media>,
}

const fn default_poll_interval_secs() -> u64 {
    30
}

const fn default_vip_lead_minutes() -> i64 {
    5
}

fn default_site_url() -> String {
    "https://myboostiq.app".to_string()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            vip_lead_minutes: default_vip_lead_minutes(),
            site_url: default_site_url(),
            vip_media: None,
            public_media: None,
        }
    }
}

impl MonitorConfig {
    #[must_use]
    pub fn to_settings(&self) -> MonitorSettings {
        MonitorSettings {
            poll_interval: StdDuration::from_secs(self.poll_interval_secs),
            vip_lead: Duration::minutes(self.vip_lead_minutes),
            site_url: self.site_url.clone(),
            vip_media: self.vip_media.clone(),
            public_media: self.public_media.clone(),
        }
    }
}
