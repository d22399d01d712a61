//! Notifier factory.
//!
//! Chooses the transport for alerts and notices: Telegram when it is enabled
//! and compiled in, otherwise the logging notifier.

use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::notifier::{LogNotifier, Notifier};

#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::telegram::{
    TelegramConfig, TelegramDestinations, TelegramNotifier,
};
#[cfg(feature = "telegram")]
use crate::error::ConfigError;

/// The notifier used by every component, plus the Telegram handle when the
/// command listener should run.
pub struct NotifierBundle {
    pub notifier: Arc<dyn Notifier>,
    #[cfg(feature = "telegram")]
    pub telegram: Option<TelegramNotifier>,
}

impl NotifierBundle {
    fn logging() -> Self {
        Self {
            notifier: Arc::new(LogNotifier),
            #[cfg(feature = "telegram")]
            telegram: None,
        }
    }
}

/// Build the notifier from configuration.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] when Telegram is enabled outside
/// dry-run mode without `TELEGRAM_BOT_TOKEN` or a destination chat.
#[cfg(feature = "telegram")]
pub fn build_notifier(config: &Config) -> Result<NotifierBundle> {
    if !config.telegram.enabled {
        info!("Telegram disabled, messages will be logged");
        return Ok(NotifierBundle::logging());
    }
    if config.dry_run {
        info!("Dry-run mode, messages will be logged instead of sent");
        return Ok(NotifierBundle::logging());
    }

    let bot_token = config
        .secrets
        .telegram_bot_token
        .clone()
        .ok_or(ConfigError::MissingField {
            field: "TELEGRAM_BOT_TOKEN",
        })?;
    let destinations =
        TelegramDestinations::from_config(&config.telegram).ok_or(ConfigError::MissingField {
            field: "telegram destinations",
        })?;

    let telegram = TelegramNotifier::new(TelegramConfig {
        bot_token,
        destinations,
    });
    info!("Telegram notifier enabled");

    Ok(NotifierBundle {
        notifier: Arc::new(telegram.clone()),
        telegram: Some(telegram),
    })
}

/// Build the notifier from configuration (non-Telegram variant).
///
/// Always returns the logging notifier.
#[cfg(not(feature = "telegram"))]
pub fn build_notifier(config: &Config) -> Result<NotifierBundle> {
    if config.telegram.enabled && !config.dry_run {
        tracing::warn!("Telegram enabled in config but support is not compiled in");
    }
    info!("Messages will be logged");
    Ok(NotifierBundle::logging())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::telegram::ChatTarget;

    fn telegram_config() -> Config {
        let mut config = Config::default();
        config.telegram.enabled = true;
        config.telegram.public_channel = Some(ChatTarget::Username("@news".into()));
        config.telegram.alerts_group = Some(ChatTarget::Id(-1));
        config.telegram.vip_group = Some(ChatTarget::Id(-2));
        config
    }

    #[test]
    fn disabled_telegram_logs() {
        let bundle = build_notifier(&Config::default()).unwrap();
        #[cfg(feature = "telegram")]
        assert!(bundle.telegram.is_none());
        drop(bundle);
    }

    #[test]
    fn dry_run_never_sends() {
        let mut config = telegram_config();
        config.dry_run = true;
        let bundle = build_notifier(&config).unwrap();
        #[cfg(feature = "telegram")]
        assert!(bundle.telegram.is_none());
        drop(bundle);
    }

    #[cfg(feature = "telegram")]
    #[test]
    fn live_telegram_requires_token() {
        let config = telegram_config();
        let err = build_notifier(&config).err().unwrap();
        assert!(err.to_string().contains("TELEGRAM_BOT_TOKEN"));
    }

    #[cfg(feature = "telegram")]
    #[test]
    fn live_telegram_with_token() {
        let mut config = telegram_config();
        config.secrets.telegram_bot_token = Some("123:abc".into());
        let bundle = build_notifier(&config).unwrap();
        assert!(bundle.telegram.is_some());
    }
}
