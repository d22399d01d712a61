//! Recording [`Notifier`] with failure injection.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{
    id::SubscriberId,
    notification::{Destination, Media},
};
use crate::port::outbound::{notifier::Notifier, TransportError};

/// A message the notifier accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub destination: Destination,
    pub text: String,
    pub media: Option<Media>,
}

/// Thread-safe message collector for notification assertions in tests.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    removed: Arc<Mutex<Vec<(Destination, SubscriberId)>>>,
    failing: Arc<Mutex<HashSet<Destination>>>,
    fail_removals: Arc<Mutex<bool>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send to `destination` fail until [`Self::recover`].
    pub fn fail_destination(&self, destination: Destination) {
        self.failing.lock().insert(destination);
    }

    pub fn recover(&self, destination: Destination) {
        self.failing.lock().remove(&destination);
    }

    /// Make every `remove_member` call fail.
    pub fn fail_removals(&self) {
        *self.fail_removals.lock() = true;
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    /// Number of accepted messages for `destination`.
    pub fn sent_to(&self, destination: Destination) -> usize {
        self.sent
            .lock()
            .iter()
            .filter(|m| m.destination == destination)
            .count()
    }

    pub fn removed(&self) -> Vec<(Destination, SubscriberId)> {
        self.removed.lock().clone()
    }

    fn record(
        &self,
        destination: Destination,
        text: &str,
        media: Option<&Media>,
    ) -> Result<(), TransportError> {
        if self.failing.lock().contains(&destination) {
            return Err(TransportError::Unavailable {
                service: "recording",
                reason: format!("{destination} is failing"),
            });
        }
        self.sent.lock().push(SentMessage {
            destination,
            text: text.to_string(),
            media: media.cloned(),
        });
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_text(&self, destination: Destination, text: &str) -> Result<(), TransportError> {
        self.record(destination, text, None)
    }

    async fn send_photo(
        &self,
        destination: Destination,
        photo: &Media,
        caption: &str,
    ) -> Result<(), TransportError> {
        self.record(destination, caption, Some(photo))
    }

    async fn send_video(
        &self,
        destination: Destination,
        video: &Media,
        caption: &str,
    ) -> Result<(), TransportError> {
        self.record(destination, caption, Some(video))
    }

    async fn remove_member(
        &self,
        group: Destination,
        member: SubscriberId,
    ) -> Result<(), TransportError> {
        if *self.fail_removals.lock() {
            return Err(TransportError::Unavailable {
                service: "recording",
                reason: "removals failing".to_string(),
            });
        }
        self.removed.lock().push((group, member));
        Ok(())
    }
}
