//! Notifier port for alerts, notices and group membership.
//!
//! Unlike fire-and-forget event sinks, every operation reports whether the
//! transport accepted it: the boost monitor marks an alert as sent only
//! after a confirmed send.

use async_trait::async_trait;
use tracing::info;

use super::TransportError;
use crate::domain::{
    id::SubscriberId,
    notification::{Destination, Media, MediaKind, OutboundMessage},
};

/// Delivers messages to logical destinations.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - Delivery is at-least-once; callers tolerate occasional duplicates
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a plain text message.
    async fn send_text(&self, destination: Destination, text: &str) -> Result<(), TransportError>;

    /// Send a photo with a caption.
    async fn send_photo(
        &self,
        destination: Destination,
        photo: &Media,
        caption: &str,
    ) -> Result<(), TransportError>;

    /// Send a video with a caption.
    async fn send_video(
        &self,
        destination: Destination,
        video: &Media,
        caption: &str,
    ) -> Result<(), TransportError>;

    /// Remove a member from a group destination.
    async fn remove_member(
        &self,
        group: Destination,
        member: SubscriberId,
    ) -> Result<(), TransportError>;

    /// Deliver a message, as media with caption when it carries media.
    async fn deliver(
        &self,
        destination: Destination,
        message: &OutboundMessage,
    ) -> Result<(), TransportError> {
        match &message.media {
            None => self.send_text(destination, &message.text).await,
            Some(media) => match media.kind {
                MediaKind::Photo => self.send_photo(destination, media, &message.text).await,
                MediaKind::Video => self.send_video(destination, media, &message.text).await,
            },
        }
    }
}

/// A logging notifier for dry runs or when Telegram is disabled.
///
/// Every operation succeeds.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_text(&self, destination: Destination, text: &str) -> Result<(), TransportError> {
        info!(%destination, text, "Message (dry run)");
        Ok(())
    }

    async fn send_photo(
        &self,
        destination: Destination,
        photo: &Media,
        caption: &str,
    ) -> Result<(), TransportError> {
        info!(%destination, url = %photo.url, caption, "Photo (dry run)");
        Ok(())
    }

    async fn send_video(
        &self,
        destination: Destination,
        video: &Media,
        caption: &str,
    ) -> Result<(), TransportError> {
        info!(%destination, url = %video.url, caption, "Video (dry run)");
        Ok(())
    }

    async fn remove_member(
        &self,
        group: Destination,
        member: SubscriberId,
    ) -> Result<(), TransportError> {
        info!(%group, %member, "Remove member (dry run)");
        Ok(())
    }
}
