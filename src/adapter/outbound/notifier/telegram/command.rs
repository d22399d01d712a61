//! Telegram command parsing.

/// Supported Telegram commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelegramCommand {
    Start,
    Menu,
    Help,
    Subscribe,
    Register { wallet: String, tx_hash: String },
    Check,
    Unregister,
    Status,
    Announce,
    Cancel,
}

impl TelegramCommand {
    /// Commands only the bot owner may run.
    #[must_use]
    pub const fn owner_only(&self) -> bool {
        matches!(self, Self::Announce)
    }
}

/// Parse error for Telegram command messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    NotACommand,
    UnknownCommand(String),
    MissingArgument(&'static str),
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotACommand => write!(f, "message is not a command"),
            Self::UnknownCommand(cmd) => write!(f, "unknown command `{cmd}`"),
            Self::MissingArgument(name) => write!(f, "missing argument `{name}`"),
        }
    }
}

impl std::error::Error for CommandParseError {}

/// Parse a Telegram message into a bot command.
pub fn parse_command(text: &str) -> Result<TelegramCommand, CommandParseError> {
    let mut parts = text.split_whitespace();
    let Some(raw_command) = parts.next() else {
        return Err(CommandParseError::NotACommand);
    };
    if !raw_command.starts_with('/') {
        return Err(CommandParseError::NotACommand);
    }

    let command = raw_command
        .split_once('@')
        .map_or(raw_command, |(head, _)| head);

    match command {
        "/start" => Ok(TelegramCommand::Start),
        "/menu" => Ok(TelegramCommand::Menu),
        "/help" => Ok(TelegramCommand::Help),
        "/subscribe" => Ok(TelegramCommand::Subscribe),
        "/register" => {
            let wallet = parts
                .next()
                .ok_or(CommandParseError::MissingArgument("wallet"))?;
            let tx_hash = parts
                .next()
                .ok_or(CommandParseError::MissingArgument("tx_hash"))?;

            Ok(TelegramCommand::Register {
                wallet: wallet.to_string(),
                tx_hash: tx_hash.to_string(),
            })
        }
        "/check" => Ok(TelegramCommand::Check),
        "/unregister" => Ok(TelegramCommand::Unregister),
        "/status" => Ok(TelegramCommand::Status),
        "/announce" => Ok(TelegramCommand::Announce),
        "/cancel" => Ok(TelegramCommand::Cancel),
        other => Err(CommandParseError::UnknownCommand(other.to_string())),
    }
}

/// Help text returned by `/help` and appended to parse errors.
#[must_use]
pub const fn command_help() -> &'static str {
    "📚 Commands\n\n\
    Subscription:\n\
    /subscribe - 💰 Payment instructions\n\
    /register <wallet> <tx_hash> - 💎 Register as VIP after paying\n\
    /check - 🔍 Your VIP status\n\
    /unregister - ❌ Cancel your VIP subscription\n\n\
    Information:\n\
    /status - 📊 Current boost status\n\
    /start - 🚀 Welcome message\n\
    /help - 📚 This help"
}

/// Bot commands for Telegram menu registration.
///
/// Returns tuples of (command, description) for `set_my_commands`.
/// Owner-only commands are left out of the public menu.
#[must_use]
pub fn bot_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("start", "Welcome message"),
        ("subscribe", "Payment instructions"),
        ("register", "Register as VIP: /register <wallet> <tx_hash>"),
        ("check", "Check your VIP status"),
        ("unregister", "Cancel your VIP subscription"),
        ("status", "Current boost status"),
        ("help", "Show all commands"),
    ]
}
