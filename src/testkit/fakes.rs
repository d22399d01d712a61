//! In-memory stand-ins for the store, registry and payment verifier.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::{
    address::{TxHash, WalletAddress},
    id::SubscriberId,
    payment::{VerificationFailure, VerifiedPayment},
    subscription::Subscription,
};
use crate::error::{Error, Result};
use crate::port::outbound::{
    payment::{PaymentVerifier, VerifyError},
    registry::WhitelistRegistry,
    store::SubscriptionStore,
    TransportError,
};

// ---------------------------------------------------------------------------
// InMemoryStore
// ---------------------------------------------------------------------------

/// A [`SubscriptionStore`] backed by maps, with optional write failures.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    rows: Arc<Mutex<BTreeMap<SubscriberId, Subscription>>>,
    proofs: Arc<Mutex<HashMap<TxHash, SubscriberId>>>,
    fail_writes: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `subscriptions`, their proofs consumed.
    pub fn with(subscriptions: Vec<Subscription>) -> Self {
        let store = Self::new();
        {
            let mut rows = store.rows.lock();
            let mut proofs = store.proofs.lock();
            for s in subscriptions {
                proofs.insert(s.proof.clone(), s.subscriber);
                rows.insert(s.subscriber, s);
            }
        }
        store
    }

    /// Fail every upsert and delete.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Fail deletes only.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Database("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriptionStore for InMemoryStore {
    async fn upsert(&self, subscription: &Subscription) -> Result<()> {
        self.check_writable()?;
        let mut rows = self.rows.lock();
        let mut proofs = self.proofs.lock();

        let subscriber = subscription.subscriber;
        if proofs
            .get(&subscription.proof)
            .is_some_and(|owner| *owner != subscriber)
        {
            return Err(Error::ProofConsumed);
        }
        if rows
            .values()
            .any(|s| s.subscriber != subscriber && s.wallet.matches(subscription.wallet.as_str()))
        {
            return Err(Error::WalletInUse);
        }

        proofs.insert(subscription.proof.clone(), subscriber);
        rows.insert(subscriber, subscription.clone());
        Ok(())
    }

    async fn get(&self, subscriber: SubscriberId) -> Result<Option<Subscription>> {
        Ok(self.rows.lock().get(&subscriber).cloned())
    }

    async fn delete(&self, subscriber: SubscriberId) -> Result<bool> {
        self.check_writable()?;
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Error::Database("deletes disabled".to_string()));
        }
        Ok(self.rows.lock().remove(&subscriber).is_some())
    }

    async fn list(&self) -> Result<Vec<Subscription>> {
        let mut all: Vec<_> = self.rows.lock().values().cloned().collect();
        all.sort_by_key(|s| s.expires_at);
        Ok(all)
    }

    async fn find_by_proof(&self, proof: &TxHash) -> Result<Option<SubscriberId>> {
        Ok(self.proofs.lock().get(proof).copied())
    }

    async fn find_by_wallet(&self, wallet: &WalletAddress) -> Result<Option<Subscription>> {
        Ok(self
            .rows
            .lock()
            .values()
            .find(|s| s.wallet.matches(wallet.as_str()))
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// FakeRegistry
// ---------------------------------------------------------------------------

/// A [`WhitelistRegistry`] keeping lowercase wallets in a set.
#[derive(Clone, Default)]
pub struct FakeRegistry {
    wallets: Arc<Mutex<HashSet<String>>>,
    adds: Arc<AtomicU32>,
    removals: Arc<Mutex<Vec<String>>>,
    fail_adds: Arc<AtomicBool>,
    fail_removes: Arc<AtomicBool>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_adds(&self, fail: bool) {
        self.fail_adds.store(fail, Ordering::SeqCst);
    }

    pub fn fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, wallet: &WalletAddress) -> bool {
        self.wallets.lock().contains(&wallet.to_lowercase())
    }

    pub fn add_count(&self) -> u32 {
        self.adds.load(Ordering::SeqCst)
    }

    /// Lowercase wallets passed to successful `remove` calls, in order.
    pub fn removals(&self) -> Vec<String> {
        self.removals.lock().clone()
    }

    fn refused() -> TransportError {
        TransportError::Status {
            service: "fake_registry",
            status: 500,
        }
    }
}

#[async_trait]
impl WhitelistRegistry for FakeRegistry {
    async fn add(&self, wallet: &WalletAddress) -> std::result::Result<(), TransportError> {
        if self.fail_adds.load(Ordering::SeqCst) {
            return Err(Self::refused());
        }
        self.adds.fetch_add(1, Ordering::SeqCst);
        self.wallets.lock().insert(wallet.to_lowercase());
        Ok(())
    }

    async fn remove(&self, wallet: &WalletAddress) -> std::result::Result<(), TransportError> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(Self::refused());
        }
        self.removals.lock().push(wallet.to_lowercase());
        self.wallets.lock().remove(&wallet.to_lowercase());
        Ok(())
    }

    async fn list(&self) -> std::result::Result<Vec<String>, TransportError> {
        let mut all: Vec<_> = self.wallets.lock().iter().cloned().collect();
        all.sort();
        Ok(all)
    }
}

// ---------------------------------------------------------------------------
// FakeVerifier
// ---------------------------------------------------------------------------

/// A [`PaymentVerifier`] that returns a scripted outcome.
///
/// Defaults to accepting every payment with the required amount.
#[derive(Clone, Default)]
pub struct FakeVerifier {
    outcome: Arc<Mutex<Option<VerifyError>>>,
    amount: Arc<Mutex<Option<Decimal>>>,
    calls: Arc<AtomicU32>,
}

impl FakeVerifier {
    pub fn accepting() -> Self {
        Self::default()
    }

    pub fn rejecting(failure: VerificationFailure) -> Self {
        let verifier = Self::default();
        verifier.set_outcome(Some(VerifyError::Rejected(failure)));
        verifier
    }

    pub fn unavailable() -> Self {
        let verifier = Self::default();
        verifier.set_outcome(Some(VerifyError::Unavailable(TransportError::Unavailable {
            service: "fake_explorer",
            reason: "down".to_string(),
        })));
        verifier
    }

    /// Set the error to return, or `None` to accept.
    pub fn set_outcome(&self, outcome: Option<VerifyError>) {
        *self.outcome.lock() = outcome;
    }

    /// Report this amount on acceptance instead of the minimum.
    pub fn set_amount(&self, amount: Decimal) {
        *self.amount.lock() = Some(amount);
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentVerifier for FakeVerifier {
    async fn verify(
        &self,
        tx_hash: &TxHash,
        destination: &WalletAddress,
        _token_contract: &WalletAddress,
        minimum_amount: Decimal,
    ) -> std::result::Result<VerifiedPayment, VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.outcome.lock().clone() {
            return Err(err);
        }
        Ok(VerifiedPayment {
            tx_hash: tx_hash.clone(),
            from: None,
            to: destination.clone(),
            amount: (*self.amount.lock()).unwrap_or(minimum_amount),
        })
    }
}
