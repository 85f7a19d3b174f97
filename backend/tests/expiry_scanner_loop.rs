//! The expiry scanner loop over in-memory stores.

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use rstest::rstest;

use medcycle::domain::ports::MedicineRepository;
use medcycle::domain::{
    ExpiryScanner, ExpiryScannerConfig, ExpiryScannerPorts, ScanSkipReason, TokioSleeper,
};
use medcycle::test_support::{
    InMemoryUserRepository, RecordingSender, StopAfterSleeper, fixtures,
};

mod support;

use support::{World, now};

async fn stocked_world() -> World {
    let world = World::new(
        InMemoryUserRepository::with_users([
            fixtures::user("asha@example.com", Some("+919800000001"), None),
            fixtures::user("ravi@example.com", None, None),
        ]),
        RecordingSender::default(),
    );
    let medicines = [
        fixtures::medicine("asha@example.com", "Paracetamol", "Tablet", now() + TimeDelta::days(2)),
        fixtures::medicine("asha@example.com", "Cetirizine", "Tablet", now() + TimeDelta::days(40)),
        fixtures::medicine("ravi@example.com", "Cough syrup", "Syrup", now() + TimeDelta::days(1)),
    ];
    for medicine in &medicines {
        world.medicines.insert(medicine).await.expect("stored");
    }
    world.medicines.push_undecodable("legacy-1", "missing expiry date");
    world
}

fn scanner(world: &World, interval: Duration) -> Arc<ExpiryScanner> {
    Arc::new(ExpiryScanner::new(
        ExpiryScannerPorts::new(world.medicines.clone(), world.users.clone()),
        world.dispatcher.clone(),
        world.clock.clone(),
        ExpiryScannerConfig {
            interval,
            ..ExpiryScannerConfig::default()
        },
    ))
}

#[rstest]
#[tokio::test]
async fn each_pass_alerts_due_owners_and_reports_skips() {
    let world = stocked_world().await;

    let report = scanner(&world, Duration::from_secs(60)).scan_once().await;

    assert_eq!(report.examined, 4);
    assert_eq!(report.due, 2);
    assert_eq!(report.dispatch.delivered(), 1);
    let reasons: Vec<&ScanSkipReason> = report.skipped.iter().map(|skip| &skip.reason).collect();
    assert!(matches!(reasons.as_slice(), [
        ScanSkipReason::UndecodableRecord(_),
        ScanSkipReason::OwnerWithoutPhone
    ] | [
        ScanSkipReason::OwnerWithoutPhone,
        ScanSkipReason::UndecodableRecord(_)
    ]));
    let delivered = world.sender.delivered();
    assert_eq!(delivered.len(), 1);
    assert!(delivered[0].body.contains("'Paracetamol' is expiring in 2 days"));
}

#[rstest]
#[tokio::test]
async fn loop_sleeps_the_configured_interval_between_passes() {
    let world = stocked_world().await;
    let (sleeper, stop) = StopAfterSleeper::new(3);

    let cycles = scanner(&world, Duration::from_secs(3_600))
        .run(&sleeper, stop)
        .await;

    assert_eq!(cycles, 3);
    assert_eq!(sleeper.intervals(), vec![Duration::from_secs(3_600); 3]);
    assert_eq!(world.sender.delivered().len(), 3);
}

#[rstest]
#[tokio::test]
async fn spawned_scanner_stops_on_request() {
    let world = stocked_world().await;
    let handle = scanner(&world, Duration::from_secs(3_600)).spawn(Arc::new(TokioSleeper));

    for _ in 0..200 {
        if !world.sender.delivered().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let cycles = handle.stop().await.expect("scanner task joins");

    assert_eq!(cycles, 1);
    assert_eq!(world.sender.delivered().len(), 1);
}
