//! Telegram command execution.
//!
//! Maps each parsed command onto a subscription use case, a status lookup
//! or a step of the owner's announcement conversation, and renders the
//! reply. Nothing here depends on teloxide, so the whole command surface is
//! testable without a bot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{info, warn};

use super::command::TelegramCommand;
use super::format;
use crate::application::announce::{self, Advance, AnnouncementSessions};
use crate::domain::id::SubscriberId;
use crate::port::inbound::subscription::SubscriptionService;
use crate::port::outbound::{boost::BoostStatusSource, notifier::Notifier};

/// Subscription terms and links shown to users.
#[derive(Debug, Clone)]
pub struct PaymentInfo {
    /// Payment destination wallet.
    pub wallet: String,
    pub price: Decimal,
    pub duration_days: i64,
    pub vip_lead_minutes: i64,
    pub site_url: String,
    /// Human-facing block explorer, e.g. `https://bscscan.com`.
    pub explorer_url: String,
}

impl PaymentInfo {
    #[must_use]
    pub fn wallet_url(&self) -> String {
        format!(
            "{}/address/{}",
            self.explorer_url.trim_end_matches('/'),
            self.wallet
        )
    }

    #[must_use]
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{tx_hash}", self.explorer_url.trim_end_matches('/'))
    }
}

/// Executes Telegram commands against the application services.
#[derive(Clone)]
pub struct TelegramControl {
    subscriptions: Arc<dyn SubscriptionService>,
    status: Arc<dyn BoostStatusSource>,
    notifier: Arc<dyn Notifier>,
    sessions: Arc<AnnouncementSessions>,
    info: Arc<PaymentInfo>,
    owner: Option<SubscriberId>,
    shutdown: watch::Receiver<bool>,
}

impl TelegramControl {
    #[must_use]
    pub fn new(
        subscriptions: Arc<dyn SubscriptionService>,
        status: Arc<dyn BoostStatusSource>,
        notifier: Arc<dyn Notifier>,
        info: PaymentInfo,
        owner: Option<SubscriberId>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            subscriptions,
            status,
            notifier,
            sessions: Arc::new(AnnouncementSessions::new()),
            info: Arc::new(info),
            owner,
            shutdown,
        }
    }

    /// Whether `sender` is the configured bot owner.
    #[must_use]
    pub fn is_owner(&self, sender: SubscriberId) -> bool {
        self.owner == Some(sender)
    }

    #[must_use]
    pub fn sessions(&self) -> &AnnouncementSessions {
        &self.sessions
    }

    /// Execute one command from `sender` and return the reply text.
    pub async fn execute(&self, sender: SubscriberId, command: TelegramCommand) -> String {
        match command {
            TelegramCommand::Start | TelegramCommand::Menu => format::welcome(&self.info),
            TelegramCommand::Help => format::help(&self.info),
            TelegramCommand::Subscribe => format::subscribe_instructions(&self.info),
            TelegramCommand::Register { wallet, tx_hash } => {
                self.register(sender, &wallet, &tx_hash).await
            }
            TelegramCommand::Check => match self.subscriptions.check_status(sender).await {
                Ok(status) => format::subscription_status(&status),
                Err(e) => {
                    warn!(subscriber = sender.get(), error = %e, "Status check failed");
                    "⚠️ Could not check your status right now. Please try again later."
                        .to_string()
                }
            },
            TelegramCommand::Unregister => match self.subscriptions.unregister(sender).await {
                Ok(subscription) => {
                    info!(subscriber = sender.get(), wallet = %subscription.wallet, "Unregistered");
                    format::unregistered(&subscription)
                }
                Err(e) => format::unregister_failed(&e),
            },
            TelegramCommand::Status => match self.status.fetch_status().await {
                Ok(event) => format::boost_status(&event, Utc::now()),
                Err(e) => {
                    warn!(error = %e, "Boost status lookup failed");
                    format::boost_status_unavailable().to_string()
                }
            },
            TelegramCommand::Announce => {
                if !self.is_owner(sender) {
                    return format::announce_refused().to_string();
                }
                self.sessions.begin(sender, Utc::now());
                info!(owner = sender.get(), "Announcement conversation started");
                format::announce_started().to_string()
            }
            TelegramCommand::Cancel => {
                if self.sessions.cancel(sender) {
                    format::announce_step(&Advance::Cancelled)
                } else {
                    format::nothing_to_cancel().to_string()
                }
            }
        }
    }

    async fn register(&self, sender: SubscriberId, wallet: &str, tx_hash: &str) -> String {
        match self.subscriptions.register(sender, wallet, tx_hash).await {
            Ok(confirmation) => format::registration_confirmed(&confirmation, &self.info),
            Err(e) => {
                warn!(subscriber = sender.get(), error = %e, "Registration refused");
                format::registration_failed(&e, &self.info)
            }
        }
    }

    /// Feed plain text to `sender`'s announcement conversation.
    ///
    /// `None` when there is no live conversation for `sender`.
    pub fn continue_announcement(
        &self,
        sender: SubscriberId,
        text: &str,
        now: DateTime<Utc>,
    ) -> Option<String> {
        let result = self.sessions.advance(sender, text, now)?;
        Some(match result {
            Ok(Advance::Scheduled(announcement)) => {
                info!(owner = sender.get(), at = %announcement.at, "Announcement confirmed");
                let reply = format::announce_step(&Advance::Scheduled(announcement.clone()));
                let _ = announce::schedule(
                    Arc::clone(&self.notifier),
                    announcement,
                    self.shutdown.clone(),
                );
                reply
            }
            Ok(advance) => format::announce_step(&advance),
            Err(e) => format::announce_error(&e),
        })
    }
}
