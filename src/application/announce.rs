//! Owner announcements: a short conversation that schedules a public post.
//!
//! The conversation walks `AwaitingDate -> AwaitingTime -> AwaitingContent
//! -> AwaitingConfirm` and ends `Scheduled` or `Cancelled`. A session
//! idle for longer than the timeout is discarded on the next input.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use url::Url;

use crate::domain::{
    id::SubscriberId,
    notification::{Destination, Media, OutboundMessage},
};
use crate::port::outbound::notifier::Notifier;

/// Idle time after which a session is discarded.
pub const SESSION_TIMEOUT_MINUTES: i64 = 10;

const VIDEO_EXTENSIONS: [&str; 3] = [".mp4", ".mov", ".webm"];

/// A confirmed or draft announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// Delivery time, UTC.
    pub at: DateTime<Utc>,
    pub message: OutboundMessage,
}

/// Where a conversation currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnouncementStep {
    AwaitingDate,
    AwaitingTime { date: NaiveDate },
    AwaitingContent { at: DateTime<Utc> },
    AwaitingConfirm { draft: Announcement },
    Scheduled(Announcement),
    Cancelled,
}

/// Successful transition, reported back to the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    AskTime { date: NaiveDate },
    AskContent { at: DateTime<Utc> },
    AskConfirm(Announcement),
    Scheduled(Announcement),
    Cancelled,
}

/// Rejected input. The session stays where it was unless it expired.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnounceError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("date is in the past")]
    DateInPast,

    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("time is in the past")]
    TimeInPast,

    #[error("announcement content is empty")]
    EmptyContent,

    #[error("answer yes or no")]
    InvalidConfirmation,

    #[error("announcement session timed out")]
    Expired,

    #[error("announcement session already finished")]
    Finished,
}

/// One owner's announcement conversation.
#[derive(Debug, Clone)]
pub struct AnnouncementSession {
    step: AnnouncementStep,
    last_input: DateTime<Utc>,
    timeout: Duration,
}

impl AnnouncementSession {
    #[must_use]
    pub fn start(now: DateTime<Utc>) -> Self {
        Self {
            step: AnnouncementStep::AwaitingDate,
            last_input: now,
            timeout: Duration::minutes(SESSION_TIMEOUT_MINUTES),
        }
    }

    #[must_use]
    pub fn step(&self) -> &AnnouncementStep {
        &self.step
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.last_input > self.timeout
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(
            self.step,
            AnnouncementStep::Scheduled(_) | AnnouncementStep::Cancelled
        )
    }

    pub fn cancel(&mut self) {
        self.step = AnnouncementStep::Cancelled;
    }

    /// Feed one line of owner input.
    ///
    /// # Errors
    ///
    /// Returns [`AnnounceError`] when the input does not fit the current
    /// step; the step is unchanged except on [`AnnounceError::Expired`].
    pub fn advance(&mut self, input: &str, now: DateTime<Utc>) -> Result<Advance, AnnounceError> {
        if self.is_finished() {
            return Err(AnnounceError::Finished);
        }
        if self.is_expired(now) {
            self.step = AnnouncementStep::Cancelled;
            return Err(AnnounceError::Expired);
        }
        self.last_input = now;

        let input = input.trim();
        let (next, advance) = match &self.step {
            AnnouncementStep::AwaitingDate => {
                let date = parse_date(input, now)?;
                (
                    AnnouncementStep::AwaitingTime { date },
                    Advance::AskTime { date },
                )
            }
            AnnouncementStep::AwaitingTime { date } => {
                let at = parse_time(*date, input, now)?;
                (
                    AnnouncementStep::AwaitingContent { at },
                    Advance::AskContent { at },
                )
            }
            AnnouncementStep::AwaitingContent { at } => {
                let draft = Announcement {
                    at: *at,
                    message: parse_content(input)?,
                };
                (
                    AnnouncementStep::AwaitingConfirm {
                        draft: draft.clone(),
                    },
                    Advance::AskConfirm(draft),
                )
            }
            AnnouncementStep::AwaitingConfirm { draft } => {
                match input.to_ascii_lowercase().as_str() {
                    "yes" | "y" => (
                        AnnouncementStep::Scheduled(draft.clone()),
                        Advance::Scheduled(draft.clone()),
                    ),
                    "no" | "n" => (AnnouncementStep::Cancelled, Advance::Cancelled),
                    _ => return Err(AnnounceError::InvalidConfirmation),
                }
            }
            AnnouncementStep::Scheduled(_) | AnnouncementStep::Cancelled => {
                return Err(AnnounceError::Finished)
            }
        };

        self.step = next;
        Ok(advance)
    }
}

fn parse_date(input: &str, now: DateTime<Utc>) -> Result<NaiveDate, AnnounceError> {
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| AnnounceError::InvalidDate(input.to_string()))?;
    if date < now.date_naive() {
        return Err(AnnounceError::DateInPast);
    }
    Ok(date)
}

fn parse_time(
    date: NaiveDate,
    input: &str,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, AnnounceError> {
    let time = NaiveTime::parse_from_str(input, "%H:%M")
        .map_err(|_| AnnounceError::InvalidTime(input.to_string()))?;
    let at = date.and_time(time).and_utc();
    if at <= now {
        return Err(AnnounceError::TimeInPast);
    }
    Ok(at)
}

/// Split content into optional leading media URL and caption text.
fn parse_content(input: &str) -> Result<OutboundMessage, AnnounceError> {
    if input.is_empty() {
        return Err(AnnounceError::EmptyContent);
    }

    let (first, rest) = input
        .split_once(char::is_whitespace)
        .map_or((input, ""), |(first, rest)| (first, rest.trim()));

    let media = Url::parse(first)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(|url| {
            let path = url.path().to_ascii_lowercase();
            if VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
                Media::video(first)
            } else {
                Media::photo(first)
            }
        });

    Ok(match media {
        Some(media) => OutboundMessage::text(rest).with_media(Some(media)),
        None => OutboundMessage::text(input),
    })
}

/// Active announcement conversations, keyed by owner.
#[derive(Debug, Default)]
pub struct AnnouncementSessions {
    sessions: Mutex<HashMap<SubscriberId, AnnouncementSession>>,
}

impl AnnouncementSessions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a conversation for `owner`.
    pub fn begin(&self, owner: SubscriberId, now: DateTime<Utc>) {
        self.sessions
            .lock()
            .insert(owner, AnnouncementSession::start(now));
    }

    /// Whether `owner` has a live conversation at `now`.
    #[must_use]
    pub fn is_active(&self, owner: SubscriberId, now: DateTime<Utc>) -> bool {
        self.sessions
            .lock()
            .get(&owner)
            .is_some_and(|s| !s.is_expired(now))
    }

    /// Feed input to `owner`'s conversation. `None` when there is none.
    ///
    /// Finished and expired sessions are dropped.
    pub fn advance(
        &self,
        owner: SubscriberId,
        input: &str,
        now: DateTime<Utc>,
    ) -> Option<Result<Advance, AnnounceError>> {
        let mut sessions = self.sessions.lock();
        let session = sessions.get_mut(&owner)?;
        let result = session.advance(input, now);
        if session.is_finished() {
            sessions.remove(&owner);
        }
        Some(result)
    }

    /// Cancel `owner`'s conversation. Returns `false` if there was none.
    pub fn cancel(&self, owner: SubscriberId) -> bool {
        self.sessions.lock().remove(&owner).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}

/// Deliver `message` to every public destination. Returns how many
/// destinations accepted it.
pub async fn publish(notifier: &dyn Notifier, message: &OutboundMessage) -> usize {
    let mut delivered = 0;
    for destination in Destination::PUBLIC {
        match notifier.deliver(destination, message).await {
            Ok(()) => delivered += 1,
            Err(e) => warn!(%destination, error = %e, "Failed to deliver announcement"),
        }
    }
    delivered
}

/// Publish `announcement` at its scheduled time.
///
/// A past time publishes immediately. Shutdown before the time drops it.
pub fn schedule(
    notifier: Arc<dyn Notifier>,
    announcement: Announcement,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let delay = (announcement.at - Utc::now()).to_std().unwrap_or_default();
        info!(at = %announcement.at, delay_secs = delay.as_secs(), "Announcement scheduled");

        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                () = &mut sleep => {
                    let delivered = publish(notifier.as_ref(), &announcement.message).await;
                    info!(at = %announcement.at, delivered, "Announcement published");
                    break;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        warn!(at = %announcement.at, "Shutdown before announcement time, dropping it");
                        break;
                    }
                }
            }
        }
    })
}
