//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; secrets (`TELEGRAM_BOT_TOKEN`,
//! `BOOST_ADMIN_TOKEN`, `BSC_API_KEY`) come only from the environment.
//!
//! # Example
//!
//! ```no_run
//! use boostwatch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use url::Url;

use super::logging::LoggingConfig;
use super::monitor::MonitorConfig;
use super::subscription::SubscriptionConfig;
use super::telegram::TelegramAppConfig;
use crate::adapter::outbound::boost_api::UpstreamConfig;
use crate::adapter::outbound::explorer::ExplorerConfig;
use crate::domain::notification::Media;
use crate::error::{ConfigError, Result};

/// Longest allowed HTTP request timeout, in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 15;

/// Secrets read from the environment, never from the config file.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub telegram_bot_token: Option<String>,
    pub admin_token: Option<String>,
    pub bsc_api_key: Option<String>,
}

impl Secrets {
    /// Read `TELEGRAM_BOT_TOKEN`, `BOOST_ADMIN_TOKEN` and `BSC_API_KEY`.
    /// Blank values count as missing.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            telegram_bot_token: env_secret("TELEGRAM_BOT_TOKEN"),
            admin_token: env_secret("BOOST_ADMIN_TOKEN"),
            bsc_api_key: env_secret("BSC_API_KEY"),
        }
    }
}

fn env_secret(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Upstream boost API (status and whitelist).
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Poll cadence and alert presentation.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Pricing, payment wallet and expiry sweeps.
    #[serde(default)]
    pub subscription: SubscriptionConfig,

    /// Block explorer used to verify payments.
    #[serde(default)]
    pub explorer: ExplorerConfig,

    /// Telegram bot and destination chats.
    #[serde(default)]
    pub telegram: TelegramAppConfig,

    /// Enable dry-run mode.
    ///
    /// When true, messages are logged instead of sent, even with Telegram
    /// enabled. Defaults to false.
    #[serde(default)]
    pub dry_run: bool,

    /// Path to SQLite database file.
    ///
    /// Defaults to "boostwatch.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Secrets loaded from the environment by [`Config::parse_toml`].
    #[serde(skip)]
    pub secrets: Secrets,
}

fn default_database_path() -> String {
    "boostwatch.db".to_string()
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Loads secrets from the environment after parsing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., an invalid payment wallet)
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.secrets = Secrets::from_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges. Secrets are not checked here: `check` reports
    /// them and `run` requires the ones it needs.
    fn validate(&self) -> Result<()> {
        if !self.logging.is_known_format() {
            return Err(invalid("logging.format", "must be 'pretty' or 'json'"));
        }

        require_url("upstream.base_url", &self.upstream.base_url)?;
        require_url("explorer.api_url", &self.explorer.api_url)?;
        require_url("explorer.explorer_url", &self.explorer.explorer_url)?;
        require_url("monitor.site_url", &self.monitor.site_url)?;
        check_timeout("upstream.timeout_secs", self.upstream.timeout_secs)?;
        check_timeout("explorer.timeout_secs", self.explorer.timeout_secs)?;

        if self.monitor.poll_interval_secs == 0 {
            return Err(invalid("monitor.poll_interval_secs", "must be greater than 0"));
        }
        if self.monitor.vip_lead_minutes <= 0 {
            return Err(invalid("monitor.vip_lead_minutes", "must be greater than 0"));
        }
        check_media("monitor.vip_media", self.monitor.vip_media.as_ref())?;
        check_media("monitor.public_media", self.monitor.public_media.as_ref())?;

        if self.subscription.wallet.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "subscription.wallet",
            }
            .into());
        }
        self.subscription.to_settings()?;
        if self.subscription.price <= Decimal::ZERO {
            return Err(invalid("subscription.price", "must be greater than 0"));
        }
        if self.subscription.duration_days <= 0 {
            return Err(invalid("subscription.duration_days", "must be greater than 0"));
        }
        if self.subscription.sweep_interval_secs == 0 {
            return Err(invalid(
                "subscription.sweep_interval_secs",
                "must be greater than 0",
            ));
        }
        if self.subscription.token_decimals > 28 {
            return Err(invalid("subscription.token_decimals", "must be 28 or less"));
        }

        if self.telegram.enabled {
            if self.telegram.public_channel.is_none() {
                return Err(ConfigError::MissingField {
                    field: "telegram.public_channel",
                }
                .into());
            }
            if self.telegram.alerts_group.is_none() {
                return Err(ConfigError::MissingField {
                    field: "telegram.alerts_group",
                }
                .into());
            }
            if self.telegram.vip_group.is_none() {
                return Err(ConfigError::MissingField {
                    field: "telegram.vip_group",
                }
                .into());
            }
        }

        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }

        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

fn require_url(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField { field }.into());
    }
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        Ok(_) => Err(invalid(field, "must be an http(s) URL")),
        Err(e) => Err(invalid(field, &e.to_string())),
    }
}

fn check_timeout(field: &'static str, secs: u64) -> Result<()> {
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(invalid(field, "must be between 1 and 15 seconds"));
    }
    Ok(())
}

fn check_media(field: &'static str, media: Option<&Media>) -> Result<()> {
    match media {
        Some(media) => require_url(field, &media.url),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize tests that modify environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const MINIMAL: &str = r#"
        [upstream]
        base_url = "https://api.boost.example"

        [subscription]
        wallet = "0xbad5eebd86acebf1a9457ef881b0e22a1fb5b56d"
    "#;

    fn with(extra: &str) -> String {
        format!("{MINIMAL}\n{extra}")
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::parse_toml(MINIMAL).unwrap();
        assert_eq!(config.monitor.poll_interval_secs, 30);
        assert_eq!(config.monitor.vip_lead_minutes, 5);
        assert_eq!(config.subscription.price, Decimal::from(50));
        assert_eq!(config.subscription.duration_days, 7);
        assert_eq!(config.subscription.sweep_interval_secs, 3600);
        assert_eq!(config.upstream.timeout_secs, 10);
        assert_eq!(config.database, "boostwatch.db");
        assert!(!config.telegram.enabled);
        assert!(!config.dry_run);
    }

    #[test]
    fn missing_wallet_is_rejected() {
        let toml = "[upstream]\nbase_url = \"https://api.boost.example\"";
        let err = Config::parse_toml(toml).unwrap_err();
        assert!(err.to_string().contains("subscription.wallet"));
    }

    #[test]
    fn malformed_wallet_is_rejected() {
        let toml = r#"
            [upstream]
            base_url = "https://api.boost.example"
            [subscription]
            wallet = "0X1234567890123456789012345678901234567890"
        "#;
        let err = Config::parse_toml(toml).unwrap_err();
        assert!(err.to_string().contains("subscription.wallet"));
    }

    #[test]
    fn empty_upstream_url_is_rejected() {
        let toml = r#"
            [subscription]
            wallet = "0xbad5eebd86acebf1a9457ef881b0e22a1fb5b56d"
        "#;
        let err = Config::parse_toml(toml).unwrap_err();
        assert!(err.to_string().contains("upstream.base_url"));
    }

    #[test]
    fn timeout_is_bounded() {
        let toml = with("[explorer]\ntimeout_secs = 30");
        let err = Config::parse_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("explorer.timeout_secs"));
    }

    #[test]
    fn zero_intervals_are_rejected() {
        let toml = MINIMAL.replace("[upstream]", "[monitor]\npoll_interval_secs = 0\n[upstream]");
        assert!(Config::parse_toml(&toml).is_err());
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let toml = MINIMAL.replace(
            "wallet = ",
            "price = 0\nwallet = ",
        );
        let err = Config::parse_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("subscription.price"));
    }

    #[test]
    fn telegram_requires_destinations() {
        let toml = with("[telegram]\nenabled = true\npublic_channel = \"@news\"");
        let err = Config::parse_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("telegram.alerts_group"));

        let toml = with(
            "[telegram]\nenabled = true\npublic_channel = \"@news\"\nalerts_group = -1001\nvip_group = -1002\nowner_id = 99",
        );
        let config = Config::parse_toml(&toml).unwrap();
        assert_eq!(config.telegram.owner_id, Some(99));
    }

    #[test]
    fn media_urls_are_checked() {
        let toml = with("[monitor]\nvip_media = { kind = \"video\", url = \"ftp://x/y.mp4\" }");
        assert!(Config::parse_toml(&toml).is_err());

        let toml = with("[monitor]\nvip_media = { kind = \"video\", url = \"https://x/y.mp4\" }");
        let config = Config::parse_toml(&toml).unwrap();
        assert_eq!(config.monitor.vip_media, Some(Media::video("https://x/y.mp4")));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let toml = with("[logging]\nformat = \"xml\"");
        assert!(Config::parse_toml(&toml).is_err());
    }

    #[test]
    fn secrets_come_from_environment() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("BOOST_ADMIN_TOKEN", "admin-secret");
        std::env::set_var("BSC_API_KEY", "   ");
        std::env::remove_var("TELEGRAM_BOT_TOKEN");

        let config = Config::parse_toml(MINIMAL).unwrap();
        assert_eq!(config.secrets.admin_token.as_deref(), Some("admin-secret"));
        assert_eq!(config.secrets.bsc_api_key, None);
        assert_eq!(config.secrets.telegram_bot_token, None);

        std::env::remove_var("BOOST_ADMIN_TOKEN");
        std::env::remove_var("BSC_API_KEY");
    }
}
