//! Boost campaigns and the monitor's alert bookkeeping.
//!
//! A boost moves through `pre`, `buy`/`sell` and `closed` phases. Upstream
//! gives no ordering guarantee, so [`MonitorState`] tolerates repeated and
//! out-of-order statuses for the same campaign id.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Duration, Utc};

use super::id::BoostId;
use super::notification::Destination;

/// Phase of a boost campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostStatus {
    /// Announced, not yet started.
    Pre,
    /// Active buy phase.
    Buy,
    /// Active sell phase.
    Sell,
    /// Finished.
    Closed,
    /// Anything else upstream sends; ignored for alerting.
    Unknown,
}

impl BoostStatus {
    /// Parse the wire representation. Unrecognised values map to `Unknown`.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            "pre" => Self::Pre,
            "buy" => Self::Buy,
            "sell" => Self::Sell,
            "closed" => Self::Closed,
            _ => Self::Unknown,
        }
    }

    /// True for the live phases that trigger the public alert.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Buy | Self::Sell)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pre => "pre",
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Closed => "closed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BoostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the current boost as reported by the status source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoostEvent {
    pub id: BoostId,
    pub status: BoostStatus,
    /// Planned start of the active phase, epoch seconds.
    pub start_time: i64,
    pub pair_symbol: String,
    pub contract_address: String,
}

impl BoostEvent {
    /// Milliseconds from `now` until the planned start. Negative once started.
    #[must_use]
    pub fn millis_until_start(&self, now: DateTime<Utc>) -> i64 {
        self.start_time
            .saturating_mul(1000)
            .saturating_sub(now.timestamp_millis())
    }

    /// Whole minutes until start, clamped at zero. Display only.
    #[must_use]
    pub fn minutes_until_start(&self, now: DateTime<Utc>) -> i64 {
        (self.millis_until_start(now) / 60_000).max(0)
    }

    /// Whether `now` lies in the half-open VIP window `(start - lead, start]`
    /// measured as time remaining: `0 < remaining <= lead`.
    #[must_use]
    pub fn in_vip_window(&self, now: DateTime<Utc>, lead: Duration) -> bool {
        let remaining = self.millis_until_start(now);
        remaining > 0 && remaining <= lead.num_milliseconds()
    }
}

/// Alert bookkeeping for the campaign currently being watched.
///
/// Owned by the boost monitor and never shared.
#[derive(Debug, Default, Clone)]
pub struct MonitorState {
    last_boost_id: Option<BoostId>,
    vip_alert_sent: bool,
    public_alert_sent: bool,
    /// Public destinations that already received the current public alert.
    public_delivered: HashSet<Destination>,
}

impl MonitorState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the observed campaign id. Returns `true` and clears all alert
    /// flags when the id differs from the last one seen.
    pub fn observe(&mut self, id: &BoostId) -> bool {
        if self.last_boost_id.as_ref() == Some(id) {
            return false;
        }
        self.last_boost_id = Some(id.clone());
        self.clear_flags();
        true
    }

    /// Clear flags after a `closed` observation. Returns `true` if anything
    /// was set.
    pub fn reset_on_closed(&mut self) -> bool {
        if !self.vip_alert_sent && !self.public_alert_sent && self.public_delivered.is_empty() {
            return false;
        }
        self.clear_flags();
        true
    }

    fn clear_flags(&mut self) {
        self.vip_alert_sent = false;
        self.public_alert_sent = false;
        self.public_delivered.clear();
    }

    #[must_use]
    pub fn last_boost_id(&self) -> Option<&BoostId> {
        self.last_boost_id.as_ref()
    }

    #[must_use]
    pub const fn vip_alert_sent(&self) -> bool {
        self.vip_alert_sent
    }

    #[must_use]
    pub const fn public_alert_sent(&self) -> bool {
        self.public_alert_sent
    }

    pub fn mark_vip_sent(&mut self) {
        self.vip_alert_sent = true;
    }

    /// Whether `destination` still needs the current public alert.
    #[must_use]
    pub fn public_pending(&self, destination: Destination) -> bool {
        !self.public_delivered.contains(&destination)
    }

    pub fn mark_public_delivered(&mut self, destination: Destination) {
        self.public_delivered.insert(destination);
    }

    pub fn mark_public_sent(&mut self) {
        self.public_alert_sent = true;
    }
}
