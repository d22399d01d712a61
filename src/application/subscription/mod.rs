//! Subscription lifecycle: register, check, unregister and the expiry sweep.
//!
//! The store holds a subscription iff its wallet is on the upstream
//! whitelist. Every mutation touches the registry first and the store
//! second, so a registry failure never leaves a local record behind.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::message;
use crate::domain::{
    address::{TxHash, WalletAddress},
    id::SubscriberId,
    notification::Destination,
    subscription::{Confirmation, Subscription, SubscriptionStatus, SubscriptionView},
};
use crate::error::{Error, Result};
use crate::port::outbound::{
    notifier::Notifier,
    payment::{PaymentVerifier, VerifyError},
    registry::WhitelistRegistry,
    store::SubscriptionStore,
};

pub use crate::port::inbound::subscription::{
    RegistrationError, SubscriptionService, UnregisterError,
};

/// Payment terms for a subscription.
#[derive(Debug, Clone)]
pub struct SubscriptionSettings {
    /// Wallet that must receive the payment.
    pub destination: WalletAddress,
    /// Token contract the payment must be made in.
    pub token_contract: WalletAddress,
    /// Minimum decimal-adjusted amount.
    pub price: Decimal,
    /// Access granted per payment.
    pub duration: Duration,
}

/// Counts from one expiry sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Records past expiry at sweep time.
    pub expired: usize,
    /// Removed from registry and store.
    pub removed: usize,
    /// Kept for the next sweep after a registry or store failure.
    pub failed: usize,
    /// Removed, but the expiry notice could not be delivered.
    pub notify_failed: usize,
}

/// Owns every subscription state transition.
pub struct SubscriptionManager {
    store: Arc<dyn SubscriptionStore>,
    verifier: Arc<dyn PaymentVerifier>,
    registry: Arc<dyn WhitelistRegistry>,
    notifier: Arc<dyn Notifier>,
    settings: SubscriptionSettings,
}

impl SubscriptionManager {
    #[must_use]
    pub fn new(
        store: Arc<dyn SubscriptionStore>,
        verifier: Arc<dyn PaymentVerifier>,
        registry: Arc<dyn WhitelistRegistry>,
        notifier: Arc<dyn Notifier>,
        settings: SubscriptionSettings,
    ) -> Self {
        Self {
            store,
            verifier,
            registry,
            notifier,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &SubscriptionSettings {
        &self.settings
    }

    /// Register as if verification completed at `now`.
    ///
    /// A proof buys exactly one period. Repeating the subscriber's current
    /// registration returns it unchanged; any other reuse is refused, also
    /// after the subscription expired.
    pub async fn register_at(
        &self,
        subscriber: SubscriberId,
        wallet: &str,
        tx_hash: &str,
        now: DateTime<Utc>,
    ) -> std::result::Result<Confirmation, RegistrationError> {
        let wallet = WalletAddress::parse(wallet)?;
        let proof = TxHash::parse(tx_hash)?;

        if let Some(owner) = self
            .store
            .find_by_proof(&proof)
            .await
            .map_err(RegistrationError::Store)?
        {
            if owner == subscriber {
                let current = self
                    .store
                    .get(subscriber)
                    .await
                    .map_err(RegistrationError::Store)?;
                if let Some(current) = current.filter(|s| s.proof == proof) {
                    info!(%subscriber, tx_hash = %proof, "Payment already registered");
                    return Ok(Confirmation::of(&current));
                }
            }
            warn!(%subscriber, %owner, tx_hash = %proof, "Payment proof reused");
            return Err(RegistrationError::ProofAlreadyUsed);
        }

        if let Some(holder) = self
            .store
            .find_by_wallet(&wallet)
            .await
            .map_err(RegistrationError::Store)?
            .filter(|s| s.subscriber != subscriber)
        {
            warn!(%subscriber, holder = %holder.subscriber, %wallet, "Wallet held by another subscriber");
            return Err(RegistrationError::WalletInUse);
        }

        let payment = self
            .verifier
            .verify(
                &proof,
                &self.settings.destination,
                &self.settings.token_contract,
                self.settings.price,
            )
            .await
            .map_err(|e| match e {
                VerifyError::Rejected(reason) => {
                    info!(%subscriber, tx_hash = %proof, %reason, "Payment rejected");
                    RegistrationError::Verification(reason)
                }
                VerifyError::Unavailable(e) => {
                    warn!(%subscriber, tx_hash = %proof, error = %e, "Payment verifier unavailable");
                    RegistrationError::VerifierUnavailable(e)
                }
            })?;

        if let Err(e) = self.registry.add(&wallet).await {
            error!(%subscriber, %wallet, error = %e, "Whitelist add failed");
            return Err(RegistrationError::Registry(e));
        }

        let previous = match self.store.get(subscriber).await {
            Ok(previous) => previous,
            Err(e) => {
                self.rollback_add(&wallet).await;
                return Err(RegistrationError::Store(e));
            }
        };

        let subscription = Subscription::new(
            subscriber,
            wallet.clone(),
            proof.clone(),
            payment.amount,
            now,
            self.settings.duration,
        );

        if let Err(e) = self.store.upsert(&subscription).await {
            // Another subscriber won a race for the wallet; it stays whitelisted for them.
            if matches!(e, Error::WalletInUse) {
                warn!(%subscriber, %wallet, "Wallet taken during registration");
                return Err(RegistrationError::WalletInUse);
            }
            let already_whitelisted = previous.as_ref().is_some_and(|p| p.wallet.matches(wallet.as_str()));
            if !already_whitelisted {
                self.rollback_add(&wallet).await;
            }
            if matches!(e, Error::ProofConsumed) {
                warn!(%subscriber, tx_hash = %proof, "Payment proof consumed during registration");
                return Err(RegistrationError::ProofAlreadyUsed);
            }
            error!(%subscriber, error = %e, "Failed to persist subscription");
            return Err(RegistrationError::Store(e));
        }

        if let Some(old) = previous.filter(|p| !p.wallet.matches(wallet.as_str())) {
            if let Err(e) = self.registry.remove(&old.wallet).await {
                warn!(%subscriber, wallet = %old.wallet, error = %e, "Failed to remove replaced wallet");
            }
        }

        info!(
            %subscriber,
            %wallet,
            amount = %payment.amount,
            expires_at = %subscription.expires_at,
            "Subscription registered"
        );

        Ok(Confirmation::of(&subscription))
    }

    async fn rollback_add(&self, wallet: &WalletAddress) {
        if let Err(e) = self.registry.remove(wallet).await {
            error!(%wallet, error = %e, "Failed to roll back whitelist add");
        }
    }

    /// Status as seen at `now`.
    pub async fn check_status_at(
        &self,
        subscriber: SubscriberId,
        now: DateTime<Utc>,
    ) -> Result<SubscriptionStatus> {
        let status = match self.store.get(subscriber).await? {
            None => SubscriptionStatus::NotSubscribed,
            Some(s) if s.is_expired(now) => SubscriptionStatus::Expired(SubscriptionView::of(&s, now)),
            Some(s) => SubscriptionStatus::Active(SubscriptionView::of(&s, now)),
        };
        Ok(status)
    }

    /// Remove every subscription that expired before now.
    pub async fn sweep_expired(&self) -> Result<SweepReport> {
        self.sweep_expired_at(Utc::now()).await
    }

    /// Remove every subscription with `expires_at < now`.
    ///
    /// A record whose registry removal or delete fails is kept for the next
    /// sweep and its member is left alone until then. Kicking the member and
    /// notifying them are best effort.
    pub async fn sweep_expired_at(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let expired: Vec<_> = self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|s| s.is_expired(now))
            .collect();

        let mut report = SweepReport {
            expired: expired.len(),
            ..SweepReport::default()
        };

        for subscription in &expired {
            let subscriber = subscription.subscriber;

            if let Err(e) = self.registry.remove(&subscription.wallet).await {
                error!(%subscriber, wallet = %subscription.wallet, error = %e, "Whitelist removal failed, keeping record");
                report.failed += 1;
                continue;
            }

            // Notify only once the record is gone.
            if let Err(e) = self.store.delete(subscriber).await {
                error!(%subscriber, error = %e, "Failed to delete expired subscription");
                report.failed += 1;
                continue;
            }
            info!(%subscriber, wallet = %subscription.wallet, "Subscription expired and removed");
            report.removed += 1;

            if let Err(e) = self
                .notifier
                .remove_member(Destination::VipGroup, subscriber)
                .await
            {
                warn!(%subscriber, error = %e, "Failed to remove member from VIP group");
            }

            let notice = message::expiry_notice(subscription);
            if let Err(e) = self
                .notifier
                .send_text(Destination::Subscriber(subscriber), &notice)
                .await
            {
                warn!(%subscriber, error = %e, "Failed to deliver expiry notice");
                report.notify_failed += 1;
            }
        }

        if report.expired > 0 {
            info!(
                expired = report.expired,
                removed = report.removed,
                failed = report.failed,
                notify_failed = report.notify_failed,
                "Expiry sweep finished"
            );
        } else {
            debug!("Expiry sweep found nothing to remove");
        }

        Ok(report)
    }

    /// Sweep on `interval` until `shutdown` fires.
    pub async fn run_sweeper(
        self: Arc<Self>,
        interval: StdDuration,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_secs = interval.as_secs(), "Expiry sweeper started");

        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep_expired().await {
                        error!(error = %e, "Expiry sweep failed");
                    }
                }
            }
        }

        info!("Expiry sweeper stopped");
    }
}

#[async_trait]
impl SubscriptionService for SubscriptionManager {
    async fn register(
        &self,
        subscriber: SubscriberId,
        wallet: &str,
        tx_hash: &str,
    ) -> std::result::Result<Confirmation, RegistrationError> {
        self.register_at(subscriber, wallet, tx_hash, Utc::now()).await
    }

    async fn check_status(&self, subscriber: SubscriberId) -> Result<SubscriptionStatus> {
        self.check_status_at(subscriber, Utc::now()).await
    }

    async fn unregister(
        &self,
        subscriber: SubscriberId,
    ) -> std::result::Result<Subscription, UnregisterError> {
        let subscription = self
            .store
            .get(subscriber)
            .await
            .map_err(UnregisterError::Store)?
            .ok_or(UnregisterError::NotFound)?;

        if let Err(e) = self.registry.remove(&subscription.wallet).await {
            error!(%subscriber, wallet = %subscription.wallet, error = %e, "Whitelist removal failed");
            return Err(UnregisterError::Registry(e));
        }

        self.store
            .delete(subscriber)
            .await
            .map_err(UnregisterError::Store)?;

        info!(%subscriber, wallet = %subscription.wallet, "Subscription cancelled");
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests;
