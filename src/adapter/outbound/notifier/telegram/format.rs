//! Reply formatting for Telegram commands.
//!
//! Replies are plain text; the bot never sets a parse mode, so user input
//! echoed back (wallets, captions) needs no escaping.

use chrono::{DateTime, Duration, Utc};

use super::command::command_help;
use super::control::PaymentInfo;
use crate::application::announce::{Advance, AnnounceError, Announcement};
use crate::domain::{
    boost::{BoostEvent, BoostStatus},
    payment::VerificationFailure,
    subscription::{Confirmation, Subscription, SubscriptionStatus, SubscriptionView},
};
use crate::port::inbound::subscription::{RegistrationError, UnregisterError};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Reply to `/start` and `/menu`.
pub fn welcome(info: &PaymentInfo) -> String {
    format!(
        "🚀 Welcome to the Boost VIP Bot!\n\
        \n\
        Get boost alerts before everyone else.\n\
        \n\
        💎 VIP benefits:\n\
        • Alerts {lead} minutes BEFORE the boost starts\n\
        • Exclusive VIP group access\n\
        \n\
        💰 Subscription: {price} USDT for {days} days (BEP-20, BSC)\n\
        \n\
        To subscribe:\n\
        1️⃣ /subscribe to see payment instructions\n\
        2️⃣ Send {price} USDT to our wallet\n\
        3️⃣ /register <your_wallet> <tx_hash>\n\
        \n\
        /help lists every command.\n\
        \n\
        🌐 {site}",
        lead = info.vip_lead_minutes,
        price = info.price,
        days = info.duration_days,
        site = info.site_url,
    )
}

/// Reply to `/help`.
pub fn help(info: &PaymentInfo) -> String {
    format!("{}\n\n🌐 {}", command_help(), info.site_url)
}

/// Reply to `/subscribe`.
pub fn subscribe_instructions(info: &PaymentInfo) -> String {
    format!(
        "💎 VIP SUBSCRIPTION\n\
        \n\
        Amount: {price} USDT\n\
        Period: {days} days from verification\n\
        Network: BEP-20 (Binance Smart Chain)\n\
        \n\
        📍 Send payment to:\n\
        {wallet}\n\
        \n\
        ⚠️ Use the BEP-20 network only and send at least {price} USDT.\n\
        \n\
        ✅ After payment:\n\
        /register <your_wallet> <tx_hash>\n\
        \n\
        🔍 Payment wallet on the explorer:\n\
        {wallet_url}\n\
        \n\
        🌐 {site}",
        price = info.price,
        days = info.duration_days,
        wallet = info.wallet,
        wallet_url = info.wallet_url(),
        site = info.site_url,
    )
}

/// Reply to a successful `/register`.
pub fn registration_confirmed(confirmation: &Confirmation, info: &PaymentInfo) -> String {
    format!(
        "✅ Successfully registered as VIP!\n\
        \n\
        Wallet: {wallet}\n\
        Paid: {amount} USDT\n\
        Transaction: {tx_url}\n\
        \n\
        📅 Access until: {expires}\n\
        \n\
        🔔 You will now receive early boost alerts!",
        wallet = confirmation.wallet,
        amount = confirmation.amount,
        tx_url = info.tx_url(confirmation.tx_hash.as_str()),
        expires = confirmation.expires_at.format(TIME_FORMAT),
    )
}

/// Reply to a failed `/register`.
pub fn registration_failed(error: &RegistrationError, info: &PaymentInfo) -> String {
    match error {
        RegistrationError::Validation(e) => format!(
            "❌ {e}\n\
            \n\
            Wallets are 0x followed by 40 hex characters, transaction hashes \
            0x followed by 64.\n\
            \n\
            Usage: /register <your_wallet> <tx_hash>"
        ),
        RegistrationError::ProofAlreadyUsed => {
            "❌ This transaction was already used for a subscription.\n\
            \n\
            Each payment buys one subscription period. Send a new payment to renew."
                .to_string()
        }
        RegistrationError::WalletInUse => {
            "❌ This wallet is already registered by another Telegram account.\n\
            \n\
            Register with a wallet you control, or contact the owner if this is your wallet."
                .to_string()
        }
        RegistrationError::Verification(failure) => verification_failed(failure, info),
        RegistrationError::VerifierUnavailable(_) => {
            "⏳ The block explorer is not reachable right now.\n\
            \n\
            Your payment was not rejected. Please retry the same /register command in a few \
            minutes."
                .to_string()
        }
        RegistrationError::Registry(_) => {
            "⚠️ Your payment is valid but the VIP list could not be updated.\n\
            \n\
            Nothing was charged twice. Please retry the same /register command later."
                .to_string()
        }
        RegistrationError::Store(_) => {
            "⚠️ Registration could not be saved. Please retry the same /register command later."
                .to_string()
        }
    }
}

fn verification_failed(failure: &VerificationFailure, info: &PaymentInfo) -> String {
    match failure {
        VerificationFailure::NotFound => format!(
            "❌ No USDT transfer found in this transaction.\n\
            \n\
            Check the hash and make sure you sent USDT (BEP-20) to:\n\
            {}",
            info.wallet
        ),
        VerificationFailure::WrongDestination { expected, actual } => format!(
            "❌ This payment went to {actual}.\n\
            \n\
            Subscriptions must be paid to:\n\
            {expected}"
        ),
        VerificationFailure::InsufficientAmount { required, received } => format!(
            "❌ Payment too small: received {received} USDT, the subscription costs \
            {required} USDT."
        ),
        VerificationFailure::Unconfirmed => "⏳ This transaction is not confirmed yet.\n\
            \n\
            Wait a minute and retry the same /register command."
            .to_string(),
        VerificationFailure::Reverted => {
            "❌ This transaction failed on-chain. No payment was made.".to_string()
        }
    }
}

/// Reply to `/check`.
pub fn subscription_status(status: &SubscriptionStatus) -> String {
    match status {
        SubscriptionStatus::Active(view) => format!(
            "✅ VIP STATUS: ACTIVE\n\
            \n\
            {}\n\
            Time left: {}",
            view_lines(view),
            remaining(view.remaining),
        ),
        SubscriptionStatus::Expired(view) => format!(
            "⌛ VIP STATUS: EXPIRED\n\
            \n\
            {}\n\
            \n\
            Renew with /subscribe.",
            view_lines(view),
        ),
        SubscriptionStatus::NotSubscribed => "❌ Not registered as VIP.\n\
            \n\
            Use /subscribe to see how to join."
            .to_string(),
    }
}

fn view_lines(view: &SubscriptionView) -> String {
    format!(
        "Wallet: {}\nExpires: {}",
        view.wallet,
        view.expires_at.format(TIME_FORMAT)
    )
}

/// `2d 4h`, `3h 12m` or `45m`.
fn remaining(left: Duration) -> String {
    let days = left.num_days();
    let hours = left.num_hours() % 24;
    let minutes = left.num_minutes() % 60;
    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Reply to a successful `/unregister`.
pub fn unregistered(subscription: &Subscription) -> String {
    format!(
        "✅ VIP status removed.\n\
        \n\
        Wallet {} is no longer VIP.\n\
        You can register again anytime with /register.",
        subscription.wallet
    )
}

/// Reply to a failed `/unregister`.
pub fn unregister_failed(error: &UnregisterError) -> String {
    match error {
        UnregisterError::NotFound => "❌ You don't have a subscription.".to_string(),
        UnregisterError::Registry(_) | UnregisterError::Store(_) => {
            "⚠️ Could not remove your VIP status right now. Please try again later.".to_string()
        }
    }
}

/// Reply to `/status`.
pub fn boost_status(event: &BoostEvent, now: DateTime<Utc>) -> String {
    let phase = match event.status {
        BoostStatus::Pre => format!(
            "⏳ Starting in {} minutes",
            event.minutes_until_start(now)
        ),
        BoostStatus::Buy => "🟢 BUY phase live".to_string(),
        BoostStatus::Sell => "🔴 SELL phase live".to_string(),
        BoostStatus::Closed => "⏹️ Closed".to_string(),
        BoostStatus::Unknown => "❔ Unknown".to_string(),
    };

    format!(
        "📊 Boost #{id}\n\
        \n\
        Pair: {pair}\n\
        Status: {phase}",
        id = event.id,
        pair = event.pair_symbol,
    )
}

pub const fn boost_status_unavailable() -> &'static str {
    "⚠️ Boost status is not available right now. Please try again shortly."
}

pub const fn announce_started() -> &'static str {
    "📣 New announcement\n\
    \n\
    Send the publication date (UTC) as YYYY-MM-DD.\n\
    /cancel to stop."
}

pub const fn announce_refused() -> &'static str {
    "⛔ Only the bot owner can make announcements."
}

/// Reply to one step of the announcement conversation.
pub fn announce_step(advance: &Advance) -> String {
    match advance {
        Advance::AskTime { date } => format!(
            "📅 Date: {date}\n\
            \n\
            Now send the time (UTC) as HH:MM."
        ),
        Advance::AskContent { at } => format!(
            "⏰ Scheduled for {}\n\
            \n\
            Now send the message. Start it with a photo or video URL to attach media.",
            at.format(TIME_FORMAT)
        ),
        Advance::AskConfirm(draft) => format!(
            "{}\n\
            \n\
            Publish this? (yes/no)",
            preview(draft)
        ),
        Advance::Scheduled(announcement) => format!(
            "✅ Announcement scheduled for {}.",
            announcement.at.format(TIME_FORMAT)
        ),
        Advance::Cancelled => "🚫 Announcement cancelled.".to_string(),
    }
}

fn preview(draft: &Announcement) -> String {
    let media = draft
        .message
        .media
        .as_ref()
        .map(|m| format!("Media: {}\n", m.url))
        .unwrap_or_default();
    format!(
        "📝 Preview ({at})\n\
        {media}\n\
        {text}",
        at = draft.at.format(TIME_FORMAT),
        text = draft.message.text,
    )
}

/// Reply to invalid announcement input.
pub fn announce_error(error: &AnnounceError) -> String {
    match error {
        AnnounceError::Expired | AnnounceError::Finished => {
            format!("⌛ {error}. Start again with /announce.")
        }
        other => format!("❌ {other}. Try again or /cancel."),
    }
}

pub const fn nothing_to_cancel() -> &'static str {
    "Nothing to cancel."
}
