use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use tokio::sync::watch;

use super::*;
use crate::domain::error::ValidationError;
use crate::domain::payment::VerificationFailure;
use crate::testkit;
use crate::testkit::domain::{subscription, tx_hash_str, wallet, wallet_str, PAYMENT_WALLET};
use crate::testkit::fakes::{FakeRegistry, FakeVerifier, InMemoryStore};
use crate::testkit::notifier::RecordingNotifier;

struct Fixture {
    manager: Arc<SubscriptionManager>,
    store: InMemoryStore,
    verifier: FakeVerifier,
    registry: FakeRegistry,
    notifier: RecordingNotifier,
}

fn fixture_with(store: InMemoryStore, verifier: FakeVerifier) -> Fixture {
    let registry = FakeRegistry::new();
    let notifier = RecordingNotifier::new();
    let manager = Arc::new(SubscriptionManager::new(
        Arc::new(store.clone()),
        Arc::new(verifier.clone()),
        Arc::new(registry.clone()),
        Arc::new(notifier.clone()),
        testkit::config::subscription(),
    ));
    Fixture {
        manager,
        store,
        verifier,
        registry,
        notifier,
    }
}

fn fixture() -> Fixture {
    fixture_with(InMemoryStore::new(), FakeVerifier::accepting())
}

const ALICE: SubscriberId = SubscriberId::new(100);
const BOB: SubscriberId = SubscriberId::new(200);

// -------------------------------------------------------------------------
// register
// -------------------------------------------------------------------------

#[tokio::test]
async fn register_then_check_is_active_for_duration() {
    let f = fixture();
    let before = Utc::now();

    let confirmation = f
        .manager
        .register(ALICE, &wallet_str(1), &tx_hash_str(1))
        .await
        .unwrap();

    let expected = before + Duration::days(7);
    assert!((confirmation.expires_at - expected).num_seconds().abs() <= 1);
    assert_eq!(confirmation.amount, dec!(50));

    match f.manager.check_status(ALICE).await.unwrap() {
        SubscriptionStatus::Active(view) => {
            assert_eq!(view.expires_at, confirmation.expires_at);
            assert_eq!(view.wallet, wallet(1));
        }
        other => panic!("expected active, got {other:?}"),
    }
    assert!(f.registry.contains(&wallet(1)));
}

#[tokio::test]
async fn invalid_wallet_makes_no_calls() {
    let f = fixture();

    let err = f
        .manager
        .register(ALICE, "0x123", &tx_hash_str(1))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RegistrationError::Validation(ValidationError::InvalidWallet(_))
    ));
    assert_eq!(f.verifier.call_count(), 0);
    assert_eq!(f.registry.add_count(), 0);
}

#[tokio::test]
async fn invalid_tx_hash_is_rejected() {
    let f = fixture();

    let err = f
        .manager
        .register(ALICE, &wallet_str(1), "0xabc")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RegistrationError::Validation(ValidationError::InvalidTxHash(_))
    ));
    assert_eq!(f.verifier.call_count(), 0);
}

#[tokio::test]
async fn wrong_destination_creates_nothing() {
    let failure = VerificationFailure::WrongDestination {
        expected: PAYMENT_WALLET.to_string(),
        actual: wallet_str(9),
    };
    let f = fixture_with(InMemoryStore::new(), FakeVerifier::rejecting(failure.clone()));

    let err = f
        .manager
        .register(ALICE, &wallet_str(1), &tx_hash_str(1))
        .await
        .unwrap_err();

    match err {
        RegistrationError::Verification(reason) => assert_eq!(reason, failure),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(f.store.is_empty());
    assert_eq!(f.registry.add_count(), 0);
    assert_eq!(
        f.manager.check_status(ALICE).await.unwrap(),
        SubscriptionStatus::NotSubscribed
    );
}

#[tokio::test]
async fn verifier_outage_is_distinct_from_rejection() {
    let f = fixture_with(InMemoryStore::new(), FakeVerifier::unavailable());

    let err = f
        .manager
        .register(ALICE, &wallet_str(1), &tx_hash_str(1))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistrationError::VerifierUnavailable(_)));
    assert!(f.store.is_empty());
}

#[tokio::test]
async fn registry_failure_commits_nothing_and_retry_succeeds() {
    let f = fixture();
    f.registry.fail_adds(true);

    let err = f
        .manager
        .register(ALICE, &wallet_str(1), &tx_hash_str(1))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistrationError::Registry(_)));
    assert!(f.store.is_empty());

    f.registry.fail_adds(false);
    f.manager
        .register(ALICE, &wallet_str(1), &tx_hash_str(1))
        .await
        .unwrap();
    assert_eq!(f.store.len(), 1);
}

#[tokio::test]
async fn store_failure_rolls_back_new_wallet() {
    let f = fixture();
    f.store.fail_writes(true);

    let err = f
        .manager
        .register(ALICE, &wallet_str(1), &tx_hash_str(1))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistrationError::Store(_)));
    assert!(!f.registry.contains(&wallet(1)));
    assert_eq!(f.registry.removals(), vec![wallet(1).to_lowercase()]);
}

#[tokio::test]
async fn proof_reuse_by_another_subscriber_is_rejected() {
    let f = fixture();
    f.manager
        .register(ALICE, &wallet_str(1), &tx_hash_str(1))
        .await
        .unwrap();

    let err = f
        .manager
        .register(BOB, &wallet_str(2), &tx_hash_str(1))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistrationError::ProofAlreadyUsed));
    assert_eq!(f.verifier.call_count(), 1);
    assert_eq!(f.store.len(), 1);
}

#[tokio::test]
async fn repeating_current_registration_returns_it_unchanged() {
    let f = fixture();
    let t0 = Utc::now();

    let first = f
        .manager
        .register_at(ALICE, &wallet_str(1), &tx_hash_str(1), t0)
        .await
        .unwrap();
    let again = f
        .manager
        .register_at(ALICE, &wallet_str(1), &tx_hash_str(1), t0 + Duration::days(6))
        .await
        .unwrap();

    assert_eq!(again, first);
    assert_eq!(f.verifier.call_count(), 1);
    assert_eq!(f.registry.add_count(), 1);
}

#[tokio::test]
async fn replaced_proof_cannot_be_registered_again() {
    let f = fixture();
    f.manager
        .register(ALICE, &wallet_str(1), &tx_hash_str(1))
        .await
        .unwrap();
    f.manager
        .register(ALICE, &wallet_str(1), &tx_hash_str(2))
        .await
        .unwrap();

    let err = f
        .manager
        .register(ALICE, &wallet_str(1), &tx_hash_str(1))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistrationError::ProofAlreadyUsed));
    assert_eq!(f.verifier.call_count(), 2);
}

#[tokio::test]
async fn proof_stays_spent_after_sweep() {
    let f = fixture();
    let t0 = Utc::now();
    let first = f
        .manager
        .register_at(ALICE, &wallet_str(1), &tx_hash_str(1), t0)
        .await
        .unwrap();
    f.manager
        .sweep_expired_at(first.expires_at + Duration::seconds(1))
        .await
        .unwrap();
    assert!(f.store.is_empty());

    let later = first.expires_at + Duration::days(1);
    for (who, wallet_n) in [(ALICE, 1), (BOB, 2)] {
        let err = f
            .manager
            .register_at(who, &wallet_str(wallet_n), &tx_hash_str(1), later)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::ProofAlreadyUsed));
    }
    assert!(f.store.is_empty());
    assert_eq!(f.verifier.call_count(), 1);
}

#[tokio::test]
async fn wallet_held_by_another_subscriber_is_rejected() {
    let f = fixture();
    f.manager
        .register(ALICE, &wallet_str(0xabc), &tx_hash_str(1))
        .await
        .unwrap();
    let mixed_case = format!("0x{}", wallet_str(0xabc)[2..].to_uppercase());

    let err = f
        .manager
        .register(BOB, &mixed_case, &tx_hash_str(2))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistrationError::WalletInUse));
    assert_eq!(f.verifier.call_count(), 1);
    assert_eq!(f.registry.add_count(), 1);
    assert!(matches!(
        f.manager.unregister(BOB).await.unwrap_err(),
        UnregisterError::NotFound
    ));
    assert!(f.manager.check_status(ALICE).await.unwrap().is_active());
    assert!(f.registry.contains(&wallet(0xabc)));
}

#[tokio::test]
async fn wallet_freed_by_unregister_can_be_taken() {
    let f = fixture();
    f.manager
        .register(ALICE, &wallet_str(1), &tx_hash_str(1))
        .await
        .unwrap();
    f.manager.unregister(ALICE).await.unwrap();

    f.manager
        .register(BOB, &wallet_str(1), &tx_hash_str(2))
        .await
        .unwrap();

    assert!(f.registry.contains(&wallet(1)));
    assert!(f.manager.check_status(BOB).await.unwrap().is_active());
}

#[tokio::test]
async fn reregistration_replaces_record_and_drops_old_wallet() {
    let f = fixture();
    f.manager
        .register(ALICE, &wallet_str(1), &tx_hash_str(1))
        .await
        .unwrap();
    f.verifier.set_amount(dec!(75));

    let confirmation = f
        .manager
        .register(ALICE, &wallet_str(2), &tx_hash_str(2))
        .await
        .unwrap();

    assert_eq!(confirmation.amount, dec!(75));
    assert_eq!(f.store.len(), 1);
    assert!(f.registry.contains(&wallet(2)));
    assert!(!f.registry.contains(&wallet(1)));
}

#[tokio::test]
async fn same_wallet_reregistration_keeps_whitelist_entry() {
    let f = fixture();
    let mixed_case = format!("0x{}", wallet_str(0xabcdef)[2..].to_uppercase());
    f.manager
        .register(ALICE, &wallet_str(0xabcdef), &tx_hash_str(1))
        .await
        .unwrap();
    f.manager
        .register(ALICE, &mixed_case, &tx_hash_str(2))
        .await
        .unwrap();

    assert!(f.registry.contains(&wallet(0xabcdef)));
    assert!(f.registry.removals().is_empty());
}

// -------------------------------------------------------------------------
// check_status / unregister
// -------------------------------------------------------------------------

#[tokio::test]
async fn unswept_record_reports_expired() {
    let now = Utc::now();
    let store = InMemoryStore::with(vec![subscription(1, now - Duration::hours(1))]);
    let f = fixture_with(store, FakeVerifier::accepting());

    let status = f
        .manager
        .check_status_at(SubscriberId::new(1), now)
        .await
        .unwrap();

    match status {
        SubscriptionStatus::Expired(view) => assert_eq!(view.remaining, Duration::zero()),
        other => panic!("expected expired, got {other:?}"),
    }
}

#[tokio::test]
async fn unregister_removes_registry_then_store() {
    let f = fixture();
    f.manager
        .register(ALICE, &wallet_str(1), &tx_hash_str(1))
        .await
        .unwrap();

    let removed = f.manager.unregister(ALICE).await.unwrap();

    assert_eq!(removed.wallet, wallet(1));
    assert!(f.store.is_empty());
    assert!(!f.registry.contains(&wallet(1)));
}

#[tokio::test]
async fn unregister_without_subscription_is_not_found() {
    let f = fixture();
    let err = f.manager.unregister(ALICE).await.unwrap_err();
    assert!(matches!(err, UnregisterError::NotFound));
}

#[tokio::test]
async fn unregister_registry_failure_keeps_record() {
    let f = fixture();
    f.manager
        .register(ALICE, &wallet_str(1), &tx_hash_str(1))
        .await
        .unwrap();
    f.registry.fail_removes(true);

    let err = f.manager.unregister(ALICE).await.unwrap_err();

    assert!(matches!(err, UnregisterError::Registry(_)));
    assert_eq!(f.store.len(), 1);
}

// -------------------------------------------------------------------------
// sweep
// -------------------------------------------------------------------------

#[tokio::test]
async fn sweep_removes_only_expired_and_is_idempotent() {
    let now = Utc::now();
    let store = InMemoryStore::with(vec![
        subscription(1, now - Duration::seconds(1)),
        subscription(2, now + Duration::days(1)),
        subscription(3, now),
    ]);
    let f = fixture_with(store, FakeVerifier::accepting());

    let first = f.manager.sweep_expired_at(now).await.unwrap();
    let second = f.manager.sweep_expired_at(now).await.unwrap();

    assert_eq!(first.expired, 1);
    assert_eq!(first.removed, 1);
    assert_eq!(second, SweepReport::default());
    assert_eq!(f.registry.removals(), vec![wallet(1).to_lowercase()]);
    assert_eq!(f.store.len(), 2);
}

#[tokio::test]
async fn sweep_kicks_and_notifies_expired_member() {
    let now = Utc::now();
    let store = InMemoryStore::with(vec![subscription(1, now - Duration::minutes(1))]);
    let f = fixture_with(store, FakeVerifier::accepting());

    f.manager.sweep_expired_at(now).await.unwrap();

    let member = SubscriberId::new(1);
    assert_eq!(f.notifier.removed(), vec![(Destination::VipGroup, member)]);
    assert_eq!(f.notifier.sent_to(Destination::Subscriber(member)), 1);
}

#[tokio::test]
async fn notify_failure_does_not_block_removal() {
    let now = Utc::now();
    let member = SubscriberId::new(1);
    let store = InMemoryStore::with(vec![subscription(1, now - Duration::minutes(1))]);
    let f = fixture_with(store, FakeVerifier::accepting());
    f.notifier.fail_destination(Destination::Subscriber(member));
    f.notifier.fail_removals();

    let report = f.manager.sweep_expired_at(now).await.unwrap();

    assert_eq!(report.removed, 1);
    assert_eq!(report.notify_failed, 1);
    assert!(f.store.is_empty());
}

#[tokio::test]
async fn registry_failure_keeps_record_for_next_sweep() {
    let now = Utc::now();
    let store = InMemoryStore::with(vec![subscription(1, now - Duration::minutes(1))]);
    let f = fixture_with(store, FakeVerifier::accepting());
    f.registry.fail_removes(true);

    let report = f.manager.sweep_expired_at(now).await.unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(f.store.len(), 1);
    assert!(f.notifier.sent().is_empty());

    f.registry.fail_removes(false);
    let report = f.manager.sweep_expired_at(now).await.unwrap();
    assert_eq!(report.removed, 1);
    assert!(f.store.is_empty());
}

#[tokio::test]
async fn failed_delete_defers_kick_and_notice() {
    let now = Utc::now();
    let member = SubscriberId::new(1);
    let store = InMemoryStore::with(vec![subscription(1, now - Duration::minutes(1))]);
    let f = fixture_with(store, FakeVerifier::accepting());
    f.store.fail_deletes(true);

    let report = f.manager.sweep_expired_at(now).await.unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.removed, 0);
    assert_eq!(f.store.len(), 1);
    assert!(f.notifier.sent().is_empty());
    assert!(f.notifier.removed().is_empty());

    f.store.fail_deletes(false);
    let report = f.manager.sweep_expired_at(now).await.unwrap();
    assert_eq!(report.removed, 1);
    assert_eq!(f.notifier.sent_to(Destination::Subscriber(member)), 1);
    assert_eq!(f.notifier.removed(), vec![(Destination::VipGroup, member)]);
}

#[tokio::test]
async fn sweeper_runs_and_stops_on_shutdown() {
    let expired = subscription(1, Utc::now() - Duration::minutes(1));
    let f = fixture_with(InMemoryStore::with(vec![expired]), FakeVerifier::accepting());
    let (tx, rx) = watch::channel(false);

    let handle = tokio::spawn(
        f.manager
            .clone()
            .run_sweeper(std::time::Duration::from_millis(10), rx),
    );

    tokio::time::timeout(std::time::Duration::from_secs(5), async {
        while !f.store.is_empty() {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("expired record swept");

    tx.send(true).unwrap();
    tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .expect("sweeper stops")
        .unwrap();
}
