//! Handler for the `sweep` command.

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::orchestration::components::Components;

/// Run one expiry sweep with the configured transport and exit.
pub async fn execute(args: &ConfigPathArg) -> Result<()> {
    let config = Config::load(&args.config)?;
    config.init_logging();

    let components = Components::assemble(&config)?;
    let report = components.subscriptions.sweep_expired().await?;

    output::section("Expiry Sweep");
    output::field("Expired", report.expired);
    output::field("Removed", report.removed);
    if report.failed > 0 {
        output::warning(&format!(
            "{} subscription(s) kept after a whitelist or store failure",
            report.failed
        ));
    }
    if report.notify_failed > 0 {
        output::warning(&format!(
            "{} expiry notice(s) could not be delivered",
            report.notify_failed
        ));
    }
    output::success("Sweep complete");
    Ok(())
}
