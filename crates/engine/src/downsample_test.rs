//! Tests for the downsampling engine

use chrono::{DateTime, TimeDelta, Utc};

use crate::downsample::{Downsampler, downsample};
use crate::snapshot::Snapshot;

const HOUR_MS: i64 = 3_600_000;

fn at_hours(hours: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(hours * HOUR_MS).unwrap()
}

fn snap(entity: &str, hours: i64, downloads: u64) -> Snapshot {
    Snapshot {
        source: "modrinth".into(),
        entity: entity.into(),
        timestamp: at_hours(hours),
        downloads,
        followers: Some(downloads / 10),
        versions: 3,
    }
}

// =============================================================================
// Degenerate inputs
// =============================================================================

#[test]
fn test_empty_input_no_buckets() {
    let buckets = downsample(&[], TimeDelta::hours(24), false);
    assert!(buckets.is_empty());

    let buckets = downsample(&[], TimeDelta::hours(24), true);
    assert!(buckets.is_empty());
}

#[test]
fn test_single_snapshot_no_buckets() {
    let snapshots = vec![snap("a", 0, 10)];
    let buckets = downsample(&snapshots, TimeDelta::hours(24), false);
    assert!(buckets.is_empty());
}

#[test]
fn test_single_snapshot_trailing_partial() {
    let snapshots = vec![snap("a", 5, 10)];
    let buckets = downsample(&snapshots, TimeDelta::hours(24), true);

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].bucket_start, at_hours(5));
    assert_eq!(buckets[0].downloads, 10);
    assert_eq!(buckets[0].downloads_diff, 0);
}

#[test]
fn test_two_snapshots_within_one_interval() {
    let snapshots = vec![snap("a", 0, 10), snap("a", 12, 20)];
    let buckets = downsample(&snapshots, TimeDelta::hours(24), false);
    assert!(buckets.is_empty());
}

// =============================================================================
// Spec scenarios
// =============================================================================

#[test]
fn test_scenario_without_falloff() {
    let snapshots = vec![snap("a", 0, 10), snap("a", 25, 40), snap("a", 50, 90)];
    let buckets = downsample(&snapshots, TimeDelta::hours(24), false);

    assert_eq!(buckets.len(), 2);

    assert_eq!(buckets[0].bucket_start, at_hours(24));
    assert_eq!(buckets[0].downloads, 40);
    assert_eq!(buckets[0].downloads_diff, 30);

    assert_eq!(buckets[1].bucket_start, at_hours(48));
    assert_eq!(buckets[1].downloads, 90);
    assert_eq!(buckets[1].downloads_diff, 50);
}

#[test]
fn test_scenario_with_falloff() {
    let snapshots = vec![snap("a", 0, 10), snap("a", 25, 40), snap("a", 50, 90)];
    let buckets = downsample(&snapshots, TimeDelta::hours(24), true);

    assert_eq!(buckets.len(), 3);
    assert_eq!(buckets[0].bucket_start, at_hours(24));
    assert_eq!(buckets[1].bucket_start, at_hours(48));

    // The t=48h emission reopened the window at the t=50h snapshot, so the
    // trailing bucket has nothing to diff against but itself.
    assert_eq!(buckets[2].bucket_start, at_hours(50));
    assert_eq!(buckets[2].downloads, 90);
    assert_eq!(buckets[2].downloads_diff, 0);
}

// =============================================================================
// Alignment and gaps
// =============================================================================

#[test]
fn test_bucket_alignment() {
    let snapshots = vec![
        snap("a", 7, 10),
        snap("a", 33, 20),
        snap("a", 90, 35),
        snap("a", 91, 36),
        snap("a", 140, 50),
    ];
    let interval = TimeDelta::hours(24);
    let first = snapshots[0].timestamp;

    for bucket in downsample(&snapshots, interval, false) {
        let offset = bucket.bucket_start - first;
        assert!(offset >= TimeDelta::zero());
        assert_eq!(
            offset.num_milliseconds() % interval.num_milliseconds(),
            0,
            "bucket at {} is not aligned to the first snapshot",
            bucket.bucket_start
        );
    }
}

#[test]
fn test_gap_emits_single_bucket() {
    // A 100h gap skips three whole empty 24h windows; only one bucket is
    // emitted, at the boundary the closing snapshot falls into.
    let snapshots = vec![snap("a", 0, 10), snap("a", 100, 200)];
    let buckets = downsample(&snapshots, TimeDelta::hours(24), false);

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].bucket_start, at_hours(96));
    assert_eq!(buckets[0].downloads, 200);
    assert_eq!(buckets[0].downloads_diff, 190);
}

#[test]
fn test_exact_interval_boundary_stays_open() {
    // elapsed == interval does not close the window; the next snapshot past
    // it does.
    let snapshots = vec![snap("a", 0, 10), snap("a", 24, 20), snap("a", 30, 25)];
    let buckets = downsample(&snapshots, TimeDelta::hours(24), false);

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].bucket_start, at_hours(24));
    assert_eq!(buckets[0].downloads, 25);
    assert_eq!(buckets[0].downloads_diff, 15);
}

#[test]
fn test_values_taken_verbatim_from_closing_snapshot() {
    let mut closing = snap("a", 30, 77);
    closing.followers = Some(9);
    closing.versions = 12;
    let snapshots = vec![snap("a", 0, 10), closing];

    let buckets = downsample(&snapshots, TimeDelta::hours(24), false);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].followers, Some(9));
    assert_eq!(buckets[0].versions, 12);
}

#[test]
fn test_negative_diff_passes_through() {
    // A source-side counter reset produces a lower value; the delta is
    // passed through unchanged.
    let snapshots = vec![snap("a", 0, 100), snap("a", 30, 40)];
    let buckets = downsample(&snapshots, TimeDelta::hours(24), false);

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].downloads_diff, -60);
}

// =============================================================================
// Determinism and monotonicity
// =============================================================================

#[test]
fn test_determinism() {
    let snapshots: Vec<Snapshot> = (0..40)
        .map(|i| snap("a", i * 7, (i as u64) * 13 + 5))
        .collect();

    let first = downsample(&snapshots, TimeDelta::hours(24), true);
    let second = downsample(&snapshots, TimeDelta::hours(24), true);

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_bucket_count_monotonic_in_input_length() {
    let snapshots: Vec<Snapshot> = (0..30)
        .map(|i| snap("a", i * 11, (i as u64) * 3))
        .collect();

    for falloff in [false, true] {
        let mut previous = 0;
        for prefix in 0..=snapshots.len() {
            let count = downsample(&snapshots[..prefix], TimeDelta::hours(24), falloff).len();
            assert!(
                count >= previous,
                "bucket count shrank from {previous} to {count} at prefix {prefix}"
            );
            previous = count;
        }
    }
}

// =============================================================================
// Multi-entity driver
// =============================================================================

#[test]
fn test_downsampler_entities_are_independent() {
    // Interleaved stream: per-entity results must match running each entity
    // alone.
    let stream = vec![
        snap("a", 0, 10),
        snap("b", 0, 100),
        snap("a", 25, 40),
        snap("b", 25, 150),
        snap("a", 50, 90),
    ];
    let interval = TimeDelta::hours(24);

    let combined = Downsampler::run(&stream, interval, false);

    let only_a: Vec<Snapshot> = stream.iter().filter(|s| s.entity == "a").cloned().collect();
    let only_b: Vec<Snapshot> = stream.iter().filter(|s| s.entity == "b").cloned().collect();

    let from_a: Vec<_> = combined.iter().filter(|b| b.entity == "a").cloned().collect();
    let from_b: Vec<_> = combined.iter().filter(|b| b.entity == "b").cloned().collect();

    assert_eq!(from_a, downsample(&only_a, interval, false));
    assert_eq!(from_b, downsample(&only_b, interval, false));
}

#[test]
fn test_downsampler_emits_in_arrival_order() {
    let stream = vec![
        snap("b", 0, 100),
        snap("a", 0, 10),
        snap("b", 25, 150),
        snap("a", 26, 40),
    ];
    let buckets = Downsampler::run(&stream, TimeDelta::hours(24), false);

    let entities: Vec<&str> = buckets.iter().map(|b| b.entity.as_str()).collect();
    assert_eq!(entities, vec!["b", "a"]);
}

#[test]
fn test_downsampler_trailing_partials_sorted_by_entity() {
    let stream = vec![snap("zebra", 0, 1), snap("apple", 1, 2)];
    let buckets = Downsampler::run(&stream, TimeDelta::hours(24), true);

    let entities: Vec<&str> = buckets.iter().map(|b| b.entity.as_str()).collect();
    assert_eq!(entities, vec!["apple", "zebra"]);
}

#[test]
fn test_downsampler_push_then_finish_matches_run() {
    let stream = vec![
        snap("a", 0, 10),
        snap("b", 2, 5),
        snap("a", 25, 40),
        snap("b", 40, 9),
        snap("a", 50, 90),
    ];
    let interval = TimeDelta::hours(24);

    let mut downsampler = Downsampler::new(interval, true);
    let mut incremental = Vec::new();
    for snapshot in &stream {
        incremental.extend(downsampler.push(snapshot));
    }
    incremental.extend(downsampler.finish());

    assert_eq!(incremental, Downsampler::run(&stream, interval, true));
}
