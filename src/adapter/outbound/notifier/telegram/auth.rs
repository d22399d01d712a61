//! Authorization for Telegram command handling.

use chrono::Utc;
use tracing::warn;

use super::command::{command_help, parse_command, CommandParseError};
use super::control::TelegramControl;
use super::format;
use crate::domain::id::SubscriberId;

/// Process a message and return a response if one is due.
///
/// Returns `None` for:
/// - Messages without a sender (channel posts)
/// - Plain text, unless it comes from the owner during an announcement
///
/// Returns `Some(response)` for:
/// - Valid commands (owner-only ones are refused for everyone else)
/// - Invalid commands (with error message and help)
pub async fn command_response_for_message(
    text: &str,
    sender: Option<SubscriberId>,
    control: &TelegramControl,
) -> Option<String> {
    let sender = sender?;

    match parse_command(text) {
        Ok(command) if command.owner_only() && !is_authorized_sender(sender, control) => {
            Some(format::announce_refused().to_string())
        }
        Ok(command) => Some(control.execute(sender, command).await),
        Err(CommandParseError::NotACommand) => {
            if control.is_owner(sender) {
                control.continue_announcement(sender, text, Utc::now())
            } else {
                None
            }
        }
        Err(err) => Some(format!("Invalid command: {err}\n\n{}", command_help())),
    }
}

/// Check if a sender may run owner-only commands.
fn is_authorized_sender(sender: SubscriberId, control: &TelegramControl) -> bool {
    if control.is_owner(sender) {
        return true;
    }

    warn!(
        subscriber = sender.get(),
        "Refusing owner-only Telegram command"
    );
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rust_decimal_macros::dec;
    use tokio::sync::watch;

    use super::super::control::PaymentInfo;
    use crate::application::subscription::SubscriptionManager;
    use crate::testkit::{
        config,
        fakes::{FakeRegistry, FakeVerifier, InMemoryStore},
        notifier::RecordingNotifier,
        source::ScriptedStatusSource,
    };

    const OWNER: SubscriberId = SubscriberId::new(10);
    const STRANGER: SubscriberId = SubscriberId::new(20);

    fn control() -> TelegramControl {
        let notifier = Arc::new(RecordingNotifier::new());
        let manager = Arc::new(SubscriptionManager::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(FakeVerifier::accepting()),
            Arc::new(FakeRegistry::new()),
            notifier.clone(),
            config::subscription(),
        ));
        let (_tx, rx) = watch::channel(false);
        TelegramControl::new(
            manager,
            Arc::new(ScriptedStatusSource::new()),
            notifier,
            PaymentInfo {
                wallet: "0xbad5eebd86acebf1a9457ef881b0e22a1fb5b56d".into(),
                price: dec!(50),
                duration_days: 7,
                vip_lead_minutes: 5,
                site_url: "https://boost.example".into(),
                explorer_url: "https://bscscan.com".into(),
            },
            Some(OWNER),
            rx,
        )
    }

    #[tokio::test]
    async fn anonymous_messages_are_ignored() {
        let control = control();
        assert!(command_response_for_message("/start", None, &control)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn commands_are_answered_for_everyone() {
        let control = control();
        let reply = command_response_for_message("/help", Some(STRANGER), &control).await;
        assert!(reply.unwrap().contains("/register"));
    }

    #[tokio::test]
    async fn owner_only_command_is_refused_for_others() {
        let control = control();
        let reply = command_response_for_message("/announce", Some(STRANGER), &control)
            .await
            .unwrap();
        assert!(reply.contains("Only the bot owner"));
        assert!(control.sessions().is_empty());
    }

    #[tokio::test]
    async fn plain_text_feeds_owner_conversation_only() {
        let control = control();
        assert!(command_response_for_message("hello", Some(OWNER), &control)
            .await
            .is_none());

        command_response_for_message("/announce", Some(OWNER), &control).await;
        assert!(command_response_for_message("2099-01-01", Some(STRANGER), &control)
            .await
            .is_none());

        let reply = command_response_for_message("2099-01-01", Some(OWNER), &control)
            .await
            .unwrap();
        assert!(reply.contains("HH:MM"));
    }

    #[tokio::test]
    async fn invalid_command_includes_help() {
        let control = control();
        let reply = command_response_for_message("/register", Some(STRANGER), &control)
            .await
            .unwrap();
        assert!(reply.starts_with("Invalid command: missing argument `wallet`"));
        assert!(reply.contains("/subscribe"));
    }
}
