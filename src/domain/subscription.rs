//! Paid VIP subscriptions.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use super::address::{TxHash, WalletAddress};
use super::id::SubscriberId;

/// A time-bounded grant of VIP access backed by a verified payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub subscriber: SubscriberId,
    pub wallet: WalletAddress,
    pub expires_at: DateTime<Utc>,
    /// Hash of the verified payment transaction.
    pub proof: TxHash,
    pub registered_at: DateTime<Utc>,
    /// Verified, decimal-adjusted payment amount.
    pub amount: Decimal,
}

impl Subscription {
    /// Create a subscription verified at `verified_at`, lasting `duration`.
    #[must_use]
    pub fn new(
        subscriber: SubscriberId,
        wallet: WalletAddress,
        proof: TxHash,
        amount: Decimal,
        verified_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        Self {
            subscriber,
            wallet,
            expires_at: verified_at + duration,
            proof,
            registered_at: verified_at,
            amount,
        }
    }

    /// Expired strictly after `expires_at`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Time left until expiry, zero once expired.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}

/// Read-only view of a subscription for status queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionView {
    pub wallet: WalletAddress,
    pub expires_at: DateTime<Utc>,
    pub proof: TxHash,
    pub remaining: Duration,
}

impl SubscriptionView {
    #[must_use]
    pub fn of(subscription: &Subscription, now: DateTime<Utc>) -> Self {
        Self {
            wallet: subscription.wallet.clone(),
            expires_at: subscription.expires_at,
            proof: subscription.proof.clone(),
            remaining: subscription.remaining(now),
        }
    }
}

/// Result of a status lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Active(SubscriptionView),
    /// Past expiry but not yet removed by the sweep.
    Expired(SubscriptionView),
    NotSubscribed,
}

impl SubscriptionStatus {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}

/// Successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub wallet: WalletAddress,
    pub tx_hash: TxHash,
    pub expires_at: DateTime<Utc>,
    pub amount: Decimal,
}

impl Confirmation {
    #[must_use]
    pub fn of(subscription: &Subscription) -> Self {
        Self {
            wallet: subscription.wallet.clone(),
            tx_hash: subscription.proof.clone(),
            expires_at: subscription.expires_at,
            amount: subscription.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(now: DateTime<Utc>) -> Subscription {
        Subscription::new(
            SubscriberId::new(1),
            WalletAddress::parse("0x1234567890123456789012345678901234567890").unwrap(),
            TxHash::parse(&format!("0x{}", "ab".repeat(32))).unwrap(),
            dec!(50),
            now,
            Duration::days(7),
        )
    }

    #[test]
    fn expiry_is_verification_time_plus_duration() {
        let now = Utc::now();
        let sub = sample(now);
        assert_eq!(sub.expires_at, now + Duration::days(7));
        assert_eq!(sub.registered_at, now);
    }

    #[test]
    fn expiry_is_strict() {
        let now = Utc::now();
        let sub = sample(now);
        assert!(!sub.is_expired(sub.expires_at));
        assert!(sub.is_expired(sub.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn remaining_never_negative() {
        let now = Utc::now();
        let sub = sample(now);
        assert_eq!(sub.remaining(now + Duration::days(30)), Duration::zero());
        assert_eq!(sub.remaining(now), Duration::days(7));
    }
}
