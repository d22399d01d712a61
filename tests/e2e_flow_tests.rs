//! Boost status over HTTP through the monitor to the notifier.

mod harness;

use std::sync::Arc;
use std::time::Duration;

use boostwatch::adapter::outbound::boost_api::BoostApiClient;
use boostwatch::application::monitor::BoostMonitor;
use boostwatch::domain::boost::BoostStatus;
use boostwatch::domain::notification::{Destination, Media};
use boostwatch::testkit::{
    config, domain::boost, notifier::RecordingNotifier, source::ScriptedStatusSource,
};
use chrono::Utc;
use tokio::sync::watch;

use harness::http::{CannedServer, Route};

fn status_json(status: &str, start_time: i64) -> String {
    serde_json::json!({
        "id": "77",
        "status": status,
        "start_time": start_time,
        "pair_symbol": "CAKE/USDT",
        "pair": "0x0eD7e52944161450477ee417DE9Cd3a859b14fD0",
    })
    .to_string()
}

fn client(server: &CannedServer) -> Arc<BoostApiClient> {
    Arc::new(BoostApiClient::new(
        server.url(),
        "admin",
        Duration::from_secs(2),
    ))
}

#[tokio::test]
async fn upcoming_boost_alerts_vip_group_once() {
    let start = Utc::now().timestamp() + 180;
    let server =
        CannedServer::start(vec![Route::ok("GET /api/status", status_json("pre", start))]).await;
    let notifier = Arc::new(RecordingNotifier::new());
    let mut settings = config::monitor();
    settings.vip_media = Some(Media::video("https://cdn.example/vip.mp4"));
    let mut monitor = BoostMonitor::new(client(&server), notifier.clone(), settings);

    let first = monitor.poll().await;
    let second = monitor.poll().await;

    assert!(first.new_campaign);
    assert!(first.vip_alert_sent);
    assert!(!second.vip_alert_sent);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].destination, Destination::VipGroup);
    assert!(sent[0].text.contains("CAKE/USDT"));
    assert_eq!(sent[0].media, Some(Media::video("https://cdn.example/vip.mp4")));
    assert_eq!(server.count("GET /api/status"), 2);
}

#[tokio::test]
async fn boost_outside_lead_window_stays_quiet() {
    let start = Utc::now().timestamp() + 3600;
    let server =
        CannedServer::start(vec![Route::ok("GET /api/status", status_json("pre", start))]).await;
    let notifier = Arc::new(RecordingNotifier::new());
    let mut monitor = BoostMonitor::new(client(&server), notifier.clone(), config::monitor());

    let outcome = monitor.poll().await;
    assert!(outcome.evaluated);
    assert!(!outcome.vip_alert_sent);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn live_boost_reaches_every_public_destination() {
    let server = CannedServer::start(vec![Route::ok(
        "GET /api/status",
        status_json("buy", Utc::now().timestamp() - 60),
    )])
    .await;
    let notifier = Arc::new(RecordingNotifier::new());
    let mut monitor = BoostMonitor::new(client(&server), notifier.clone(), config::monitor());

    assert!(monitor.poll().await.public_alert_sent);
    assert!(!monitor.poll().await.public_alert_sent);

    assert_eq!(notifier.sent_to(Destination::PublicChannel), 1);
    assert_eq!(notifier.sent_to(Destination::AlertsGroup), 1);
    assert_eq!(notifier.sent_to(Destination::VipGroup), 0);
}

#[tokio::test]
async fn upstream_outage_skips_ticks_without_alerting() {
    let server = CannedServer::start(vec![Route::status("GET /api/status", 500)]).await;
    let notifier = Arc::new(RecordingNotifier::new());
    let mut monitor = BoostMonitor::new(client(&server), notifier.clone(), config::monitor());

    let outcome = monitor.poll().await;
    assert!(!outcome.evaluated);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn run_loop_alerts_and_stops_on_shutdown() {
    let source = ScriptedStatusSource::new();
    source.push(boost("9", BoostStatus::Buy, 0));
    let notifier = Arc::new(RecordingNotifier::new());
    let monitor = BoostMonitor::new(
        Arc::new(source.clone()),
        notifier.clone(),
        config::monitor(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(monitor.run(shutdown_rx));

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("monitor stops after shutdown")
        .unwrap();

    assert!(source.fetch_count() > 1);
    assert_eq!(notifier.sent_to(Destination::PublicChannel), 1);
    assert_eq!(notifier.sent_to(Destination::AlertsGroup), 1);
}
