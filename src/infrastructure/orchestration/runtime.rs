//! Runtime lifecycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::components::Components;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::telegram::{
    run_command_listener, PaymentInfo, TelegramControl,
};
#[cfg(feature = "telegram")]
use crate::domain::id::SubscriberId;

/// How long stopped loops get to finish their in-flight tick.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(15);

/// Run until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for Ctrl-C");
                // Keep the sender alive so the runtime is not stopped.
                std::future::pending::<()>().await;
            }
        }
    });

    run_with_shutdown(config, shutdown_rx).await
}

/// Run with an externally controlled shutdown signal.
///
/// Spawns the boost monitor, the expiry sweeper and, with Telegram enabled,
/// the command listener. Returns once `shutdown` fires and the tasks have
/// stopped or [`SHUTDOWN_GRACE`] has passed.
pub async fn run_with_shutdown(config: Config, mut shutdown: watch::Receiver<bool>) -> Result<()> {
    info!(
        dry_run = config.dry_run,
        telegram = config.telegram.enabled,
        "Starting boostwatch"
    );

    let components = Components::assemble(&config)?;
    let mut tasks: Vec<JoinHandle<()>> = Vec::new();

    let monitor = components.monitor(&config);
    tasks.push(tokio::spawn(monitor.run(shutdown.clone())));

    tasks.push(tokio::spawn(Arc::clone(&components.subscriptions).run_sweeper(
        config.subscription.sweep_interval(),
        shutdown.clone(),
    )));

    #[cfg(feature = "telegram")]
    if let Some(telegram) = &components.notifiers.telegram {
        let control = TelegramControl::new(
            components.subscriptions.clone(),
            components.upstream.clone(),
            Arc::clone(&components.notifiers.notifier),
            payment_info(&config),
            config.telegram.owner_id.map(SubscriberId::new),
            shutdown.clone(),
        );
        tasks.push(tokio::spawn(run_command_listener(
            telegram.bot(),
            control,
            config.telegram.register_commands,
            shutdown.clone(),
        )));
    }

    info!(tasks = tasks.len(), "boostwatch running");

    while !*shutdown.borrow() {
        if shutdown.changed().await.is_err() {
            info!("Shutdown channel closed");
            break;
        }
    }

    drain(tasks).await;
    info!("boostwatch stopped");
    Ok(())
}

async fn drain(tasks: Vec<JoinHandle<()>>) {
    let deadline = tokio::time::Instant::now() + SHUTDOWN_GRACE;
    for task in tasks {
        match tokio::time::timeout_at(deadline, task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "Background task failed"),
            Err(_) => {
                warn!(
                    grace_secs = SHUTDOWN_GRACE.as_secs(),
                    "Background tasks did not stop in time"
                );
                return;
            }
        }
    }
}

/// Payment terms shown by the Telegram commands.
#[cfg(feature = "telegram")]
#[must_use]
pub fn payment_info(config: &Config) -> PaymentInfo {
    PaymentInfo {
        wallet: config.subscription.wallet.clone(),
        price: config.subscription.price,
        duration_days: config.subscription.duration_days,
        vip_lead_minutes: config.monitor.vip_lead_minutes,
        site_url: config.monitor.site_url.clone(),
        explorer_url: config.explorer.explorer_url.clone(),
    }
}
