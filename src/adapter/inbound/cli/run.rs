//! Handler for the `run` command.

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::orchestration::runtime;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    if args.dry_run {
        config.dry_run = true;
    }
    if output::is_json() {
        config.logging.format = "json".to_string();
    }
    config.init_logging();

    print_startup(&config, args);
    runtime::run(config).await
}

fn print_startup(config: &Config, args: &RunArgs) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Config", args.config.display());
    output::field("Upstream", &config.upstream.base_url);
    output::field(
        "Poll every",
        format!("{}s", config.monitor.poll_interval_secs),
    );
    output::field(
        "Price",
        format!(
            "{} USDT / {} days",
            config.subscription.price, config.subscription.duration_days
        ),
    );
    output::field("Database", &config.database);
    output::field(
        "Telegram",
        if config.telegram.enabled {
            "enabled"
        } else {
            "disabled"
        },
    );

    if config.dry_run {
        output::warning("Dry-run mode enabled - messages will be logged, not sent");
    }
}
