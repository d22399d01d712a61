//! Logical notification destinations and outbound message payloads.

use std::fmt;

use serde::Deserialize;

use super::id::SubscriberId;

/// Where a message goes, independent of the messaging transport.
///
/// Transport adapters map the group/channel variants to concrete chat ids
/// from configuration; `Subscriber` is a direct message to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// The public announcement channel.
    PublicChannel,
    /// The public alerts group.
    AlertsGroup,
    /// The VIP-only group for paid subscribers.
    VipGroup,
    /// A direct message to a single subscriber.
    Subscriber(SubscriberId),
}

impl Destination {
    /// Destinations that receive public alerts and announcements, in order.
    pub const PUBLIC: [Destination; 2] = [Destination::PublicChannel, Destination::AlertsGroup];
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PublicChannel => f.write_str("public_channel"),
            Self::AlertsGroup => f.write_str("alerts_group"),
            Self::VipGroup => f.write_str("vip_group"),
            Self::Subscriber(id) => write!(f, "subscriber:{id}"),
        }
    }
}

/// Kind of media attached to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

/// A photo or video referenced by URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Media {
    pub kind: MediaKind,
    pub url: String,
}

impl Media {
    #[must_use]
    pub fn photo(url: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Photo,
            url: url.into(),
        }
    }

    #[must_use]
    pub fn video(url: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Video,
            url: url.into(),
        }
    }
}

/// A message ready to be delivered: text, optionally as a media caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub media: Option<Media>,
}

impl OutboundMessage {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            media: None,
        }
    }

    #[must_use]
    pub fn with_media(mut self, media: Option<Media>) -> Self {
        self.media = media;
        self
    }
}
