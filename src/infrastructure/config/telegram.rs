//! Telegram configuration.

use std::fmt;

use serde::Deserialize;

/// A chat addressed either by numeric id or by public `@username`.
///
/// Accepts a TOML integer, a numeric string or a username with or without
/// the leading `@`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawChatTarget")]
pub enum ChatTarget {
    Id(i64),
    /// Always stored with the leading `@`.
    Username(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawChatTarget {
    Id(i64),
    Text(String),
}

impl TryFrom<RawChatTarget> for ChatTarget {
    type Error = String;

    fn try_from(raw: RawChatTarget) -> Result<Self, Self::Error> {
        match raw {
            RawChatTarget::Id(id) => Ok(Self::Id(id)),
            RawChatTarget::Text(text) => Self::parse(&text),
        }
    }
}

impl ChatTarget {
    /// Parse a chat id or username.
    ///
    /// # Errors
    /// Returns a description of the problem for empty or malformed input.
    pub fn parse(value: &str) -> Result<Self, String> {
        let value = value.trim();
        if let Ok(id) = value.parse::<i64>() {
            return Ok(Self::Id(id));
        }

        let name = value.strip_prefix('@').unwrap_or(value);
        if name.is_empty() {
            return Err("chat target is empty".to_string());
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(format!("invalid chat username '{value}'"));
        }
        Ok(Self::Username(format!("@{name}")))
    }
}

impl fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Username(name) => f.write_str(name),
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Telegram bot configuration.
///
/// The bot token is read from `TELEGRAM_BOT_TOKEN`, never from the file.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramAppConfig {
    /// Enable the Telegram transport and command listener.
    #[serde(default)]
    pub enabled: bool,
    /// User id allowed to run owner-only commands such as `/announce`.
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub public_channel: Option<ChatTarget>,
    #[serde(default)]
    pub alerts_group: Option<ChatTarget>,
    #[serde(default)]
    pub vip_group: Option<ChatTarget>,
    /// Publish the command menu with `set_my_commands` at startup.
    #[serde(default = "default_true")]
    pub register_commands: bool,
}

impl Default for TelegramAppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            owner_id: None,
            public_channel: None,
            alerts_group: None,
            vip_group: None,
            register_commands: default_true(),
        }
    }
}
