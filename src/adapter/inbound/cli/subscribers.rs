//! Handler for the `subscribers` command.

use chrono::Utc;

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::persistence::build_store;
use crate::port::outbound::store::SubscriptionStore;

/// List every stored subscription, soonest expiry first.
pub async fn execute(args: &ConfigPathArg) -> Result<()> {
    let config = Config::load(&args.config)?;
    let store = build_store(&config)?;
    let now = Utc::now();

    let mut subscriptions = store.list().await?;
    subscriptions.sort_by_key(|s| s.expires_at);

    output::section("Subscribers");
    if subscriptions.is_empty() {
        output::note("No subscriptions stored");
        return Ok(());
    }

    for subscription in &subscriptions {
        output::subscriber(
            subscription.subscriber.get(),
            subscription.wallet.as_str(),
            &subscription.expires_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            !subscription.is_expired(now),
        );
    }

    let active = subscriptions.iter().filter(|s| !s.is_expired(now)).count();
    output::field("Active", active);
    output::field("Expired", subscriptions.len() - active);
    Ok(())
}
