//! Handler for the `check` command.

use crate::adapter::inbound::cli::command::CheckArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::boost_api::BoostApiClient;
use std::path::Path;

use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::persistence::build_store;
use crate::port::outbound::boost::BoostStatusSource;
use crate::port::outbound::registry::WhitelistRegistry;
use crate::port::outbound::store::SubscriptionStore;

/// Validate configuration without starting the bot.
pub async fn execute(args: &CheckArgs) -> Result<()> {
    let config = Config::load(&args.config)?;

    output::section("Configuration Check");
    output::field("Config", args.config.display());
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Upstream", &config.upstream.base_url);
    output::field("Wallet", &config.subscription.wallet);
    output::field(
        "Price",
        format!(
            "{} USDT / {} days",
            config.subscription.price, config.subscription.duration_days
        ),
    );
    output::field("VIP lead", format!("{} min", config.monitor.vip_lead_minutes));
    output::field("Database", &config.database);
    output::field("Dry run", config.dry_run);

    report_secrets(&config);

    if args.live {
        check_upstream(&config).await;
    }

    output::success("Configuration check complete");
    Ok(())
}

fn report_secrets(config: &Config) {
    output::section("Secrets");

    if config.secrets.admin_token.is_some() {
        output::success("BOOST_ADMIN_TOKEN set");
    } else {
        output::warning("BOOST_ADMIN_TOKEN not set (required by run and sweep)");
    }

    if config.secrets.bsc_api_key.is_some() {
        output::success("BSC_API_KEY set");
    } else {
        output::note("BSC_API_KEY not set, explorer calls are rate limited");
    }

    if !config.telegram.enabled {
        output::field("Telegram", "disabled");
    } else if config.secrets.telegram_bot_token.is_some() {
        output::success("Telegram integration configured");
    } else if config.dry_run {
        output::note("TELEGRAM_BOT_TOKEN not set, fine for dry runs");
    } else {
        output::warning("Telegram enabled but TELEGRAM_BOT_TOKEN is not set");
    }
}

async fn check_upstream(config: &Config) {
    output::section("Upstream");

    let token = config.secrets.admin_token.clone().unwrap_or_default();
    let client = BoostApiClient::from_config(&config.upstream, token);

    match client.fetch_status().await {
        Ok(event) => {
            output::success("Boost status reachable");
            output::field("Boost", format!("#{}", event.id));
            output::field("Status", event.status);
            output::field("Pair", &event.pair_symbol);
        }
        Err(e) => output::warning(&format!("Boost status unavailable: {e}")),
    }

    match client.list().await {
        Ok(wallets) => {
            output::success("Whitelist reachable");
            output::field("Whitelisted", wallets.len());
            cross_check(config, &wallets).await;
        }
        Err(e) => output::warning(&format!("Whitelist unavailable: {e}")),
    }
}

/// Compare stored subscriptions with the live whitelist. Skipped when no
/// database exists yet, so `check` never creates one.
async fn cross_check(config: &Config, wallets: &[String]) {
    if !Path::new(&config.database).exists() {
        output::note("No database yet, whitelist cross-check skipped");
        return;
    }

    let stored = match build_store(config) {
        Ok(store) => store.list().await,
        Err(e) => Err(e),
    };
    match stored {
        Ok(subscriptions) => {
            let missing = subscriptions
                .iter()
                .filter(|s| !wallets.iter().any(|w| s.wallet.matches(w)))
                .count();
            if missing == 0 {
                output::success("Every stored subscription is whitelisted");
            } else {
                output::warning(&format!(
                    "{missing} stored subscription(s) missing from the whitelist"
                ));
            }
        }
        Err(e) => output::warning(&format!("Subscription store unavailable: {e}")),
    }
}
