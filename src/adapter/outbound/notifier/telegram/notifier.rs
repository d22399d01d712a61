//! Telegram delivery and command handling.
//!
//! Provides the [`TelegramNotifier`] for alerts, notices and group
//! membership, and the command listener that answers users.
//!
//! Requires the `telegram` feature to be enabled.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, InputFile, Recipient};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::domain::{
    id::SubscriberId,
    notification::{Destination, Media},
};
use crate::infrastructure::config::telegram::{ChatTarget, TelegramAppConfig};
use crate::port::outbound::{notifier::Notifier, TransportError};

use super::auth::command_response_for_message;
use super::command::bot_commands;
use super::control::TelegramControl;

const SERVICE: &str = "telegram";

/// Concrete chats behind the logical destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramDestinations {
    pub public_channel: ChatTarget,
    pub alerts_group: ChatTarget,
    pub vip_group: ChatTarget,
}

impl TelegramDestinations {
    /// The Telegram recipient for a logical destination.
    #[must_use]
    pub fn recipient(&self, destination: Destination) -> Recipient {
        match destination {
            Destination::PublicChannel => to_recipient(&self.public_channel),
            Destination::AlertsGroup => to_recipient(&self.alerts_group),
            Destination::VipGroup => to_recipient(&self.vip_group),
            Destination::Subscriber(id) => Recipient::Id(ChatId(id.get())),
        }
    }
}

impl TelegramDestinations {
    /// Resolve the configured chats. Returns `None` if any is unset.
    #[must_use]
    pub fn from_config(config: &TelegramAppConfig) -> Option<Self> {
        Some(Self {
            public_channel: config.public_channel.clone()?,
            alerts_group: config.alerts_group.clone()?,
            vip_group: config.vip_group.clone()?,
        })
    }
}

fn to_recipient(target: &ChatTarget) -> Recipient {
    match target {
        ChatTarget::Id(id) => Recipient::Id(ChatId(*id)),
        ChatTarget::Username(name) => Recipient::ChannelUsername(name.clone()),
    }
}

/// Configuration for the Telegram notifier.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token obtained from BotFather, read from `TELEGRAM_BOT_TOKEN`.
    pub bot_token: String,
    pub destinations: TelegramDestinations,
}

/// Telegram notifier that delivers to the configured chats.
///
/// Every call awaits the Bot API response, so callers learn whether the
/// message was accepted.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
    destinations: TelegramDestinations,
}

impl TelegramNotifier {
    #[must_use]
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            bot: Bot::new(config.bot_token),
            destinations: config.destinations,
        }
    }

    /// Handle to the underlying bot, shared with the command listener.
    #[must_use]
    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }
}

fn transport(err: teloxide::RequestError) -> TransportError {
    TransportError::Unavailable {
        service: SERVICE,
        reason: err.to_string(),
    }
}

fn media_url(media: &Media) -> Result<Url, TransportError> {
    Url::parse(&media.url).map_err(|e| TransportError::Unavailable {
        service: SERVICE,
        reason: format!("invalid media url '{}': {e}", media.url),
    })
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_text(&self, destination: Destination, text: &str) -> Result<(), TransportError> {
        self.bot
            .send_message(self.destinations.recipient(destination), text)
            .await
            .map_err(transport)?;
        debug!(%destination, "Telegram message sent");
        Ok(())
    }

    async fn send_photo(
        &self,
        destination: Destination,
        photo: &Media,
        caption: &str,
    ) -> Result<(), TransportError> {
        let mut request = self.bot.send_photo(
            self.destinations.recipient(destination),
            InputFile::url(media_url(photo)?),
        );
        if !caption.is_empty() {
            request = request.caption(caption);
        }
        request.await.map_err(transport)?;
        debug!(%destination, "Telegram photo sent");
        Ok(())
    }

    async fn send_video(
        &self,
        destination: Destination,
        video: &Media,
        caption: &str,
    ) -> Result<(), TransportError> {
        let mut request = self.bot.send_video(
            self.destinations.recipient(destination),
            InputFile::url(media_url(video)?),
        );
        if !caption.is_empty() {
            request = request.caption(caption);
        }
        request.await.map_err(transport)?;
        debug!(%destination, "Telegram video sent");
        Ok(())
    }

    /// Kick `member`: ban, then lift the ban so a renewed subscriber can
    /// rejoin.
    async fn remove_member(
        &self,
        group: Destination,
        member: SubscriberId,
    ) -> Result<(), TransportError> {
        if matches!(group, Destination::Subscriber(_)) {
            return Err(TransportError::Unavailable {
                service: SERVICE,
                reason: format!("{group} is not a group"),
            });
        }
        let user = u64::try_from(member.get())
            .map(UserId)
            .map_err(|_| TransportError::Unavailable {
                service: SERVICE,
                reason: format!("invalid user id {member}"),
            })?;
        let chat = self.destinations.recipient(group);

        self.bot
            .ban_chat_member(chat.clone(), user)
            .await
            .map_err(transport)?;
        self.bot
            .unban_chat_member(chat, user)
            .only_if_banned(true)
            .await
            .map_err(transport)?;

        info!(%group, %member, "Removed member from group");
        Ok(())
    }
}

/// Answer user commands until `shutdown` fires.
pub async fn run_command_listener(
    bot: Bot,
    control: TelegramControl,
    register_commands: bool,
    mut shutdown: watch::Receiver<bool>,
) {
    // Register commands with Telegram so they appear in the "/" menu
    if register_commands {
        if let Err(e) = register_bot_commands(&bot).await {
            warn!(error = %e, "Failed to register bot commands with Telegram");
        }
    }

    info!("Telegram command listener started");

    let listener = teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let control = control.clone();
        async move {
            let Some(text) = msg.text() else {
                return respond(());
            };
            let sender = msg
                .from
                .as_ref()
                .and_then(|user| i64::try_from(user.id.0).ok())
                .map(SubscriberId::new);

            if let Some(response) = command_response_for_message(text, sender, &control).await {
                if let Err(e) = bot.send_message(msg.chat.id, response).await {
                    error!(error = %e, "Failed to send Telegram command response");
                }
            }

            respond(())
        }
    });

    let stop = async move {
        while shutdown.changed().await.is_ok() {
            if *shutdown.borrow() {
                break;
            }
        }
    };

    tokio::select! {
        () = listener => warn!("Telegram command listener exited"),
        () = stop => info!("Telegram command listener stopped"),
    }
}

/// Register bot commands with Telegram for the "/" menu.
async fn register_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<BotCommand> = bot_commands()
        .into_iter()
        .map(|(cmd, desc)| BotCommand::new(cmd, desc))
        .collect();

    bot.set_my_commands(commands).await?;
    info!("Registered bot commands with Telegram");
    Ok(())
}
