//! Rate-limit adherence tests
//!
//! Run under tokio's paused clock: sleeps complete instantly but advance the
//! clock by exactly their duration, so total forced sleep time can be
//! asserted precisely. Store calls are in-memory and take zero clock time,
//! which makes elapsed time equal to cooldown time.

mod helpers;

use helpers::{fast_config, subject, MemoryObjectStore, MemoryRecordStore};
use media_reconciler::models::Category;
use media_reconciler::services::scheduler::{RunMode, Scheduler};
use serde_json::json;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn full_scan_sleeps_match_the_budget() {
    // 12 subjects with no media: every scan probes all 5 categories and
    // pauses after each miss. Batch size 5 -> 3 batches -> 2 batch pauses.
    let objects = MemoryObjectStore::new();
    let subjects = (0..12)
        .map(|i| subject(&format!("p{i}"), json!({"academy_id": "a1"})))
        .collect();
    let records = MemoryRecordStore::new(subjects);

    let mut config = fast_config();
    config.batch_size = 5;
    config.request_delay_ms = 500;
    config.batch_delay_ms = 2000;

    let start = tokio::time::Instant::now();
    let report = Scheduler::new(&records, &objects, &config)
        .run(RunMode::Check)
        .await
        .unwrap();

    assert_eq!(report.check.overall().absent, 12);

    // K * C * request_delay + (B - 1) * batch_delay
    let expected = Duration::from_millis(12 * 5 * 500 + 2 * 2000);
    assert_eq!(start.elapsed(), expected);
}

#[tokio::test(start_paused = true)]
async fn canonical_first_hit_skips_all_request_pauses() {
    // Every subject's object is in its canonical bucket, found on the very
    // first probe: no inter-request pauses at all, and a single batch means
    // no batch pause either.
    let objects = MemoryObjectStore::new();
    let subjects: Vec<_> = (0..3)
        .map(|i| subject(&format!("p{i}"), json!({"club_id": "c1"})))
        .collect();
    for s in &subjects {
        objects.put(Category::Club, &format!("{}.jpg", s.id), b"img");
    }
    let records = MemoryRecordStore::new(subjects);

    let mut config = fast_config();
    config.request_delay_ms = 500;
    config.batch_delay_ms = 2000;

    let start = tokio::time::Instant::now();
    let report = Scheduler::new(&records, &objects, &config)
        .run(RunMode::Check)
        .await
        .unwrap();

    assert_eq!(report.check.overall().correct, 3);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn last_batch_has_no_trailing_pause() {
    // 4 subjects found immediately, batch size 2 -> exactly one inter-batch
    // pause (between the two batches), none after the last.
    let objects = MemoryObjectStore::new();
    let subjects: Vec<_> = (0..4)
        .map(|i| subject(&format!("p{i}"), json!({})))
        .collect();
    for s in &subjects {
        objects.put(Category::Avatars, &format!("{}.jpg", s.id), b"img");
    }
    let records = MemoryRecordStore::new(subjects);

    let mut config = fast_config();
    config.batch_size = 2;
    config.batch_delay_ms = 2000;

    let start = tokio::time::Instant::now();
    Scheduler::new(&records, &objects, &config)
        .run(RunMode::Check)
        .await
        .unwrap();

    assert_eq!(start.elapsed(), Duration::from_millis(2000));
}
