//! Persistence port for subscriptions.

use async_trait::async_trait;

use crate::domain::{
    address::{TxHash, WalletAddress},
    id::SubscriberId,
    subscription::Subscription,
};
use crate::error::Result;

/// Durable storage for subscriptions, keyed by subscriber.
///
/// A proof is consumed by the first upsert that carries it and stays
/// consumed after the subscription is deleted. A wallet belongs to at most
/// one subscriber at a time.
///
/// Implementations serialize all mutations; reads may observe a snapshot.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Insert or fully replace the subscriber's subscription and consume its
    /// proof, atomically.
    ///
    /// # Errors
    ///
    /// [`Error::ProofConsumed`](crate::error::Error::ProofConsumed) when
    /// another subscriber consumed the proof and
    /// [`Error::WalletInUse`](crate::error::Error::WalletInUse) when another
    /// subscriber holds the wallet. Nothing is written in either case.
    async fn upsert(&self, subscription: &Subscription) -> Result<()>;

    /// Get the subscription for a subscriber.
    async fn get(&self, subscriber: SubscriberId) -> Result<Option<Subscription>>;

    /// Delete a subscriber's subscription. Returns whether a row was removed.
    /// The proof stays consumed.
    async fn delete(&self, subscriber: SubscriberId) -> Result<bool>;

    /// All stored subscriptions, ordered by expiry.
    async fn list(&self) -> Result<Vec<Subscription>>;

    /// The subscriber that consumed `proof`, even if their subscription is
    /// gone.
    async fn find_by_proof(&self, proof: &TxHash) -> Result<Option<SubscriberId>>;

    /// The subscription holding `wallet`, compared case-insensitively.
    async fn find_by_wallet(&self, wallet: &WalletAddress) -> Result<Option<Subscription>>;
}
