//! Downsampling engine
//!
//! Folds an ascending snapshot sequence into fixed-width time buckets. Each
//! bucket carries the closing snapshot's values verbatim plus the download
//! delta since the snapshot that opened the window. The fold keeps one
//! explicit [`WindowState`] per entity; there is no smoothing,
//! interpolation, or extrapolation between snapshots.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::snapshot::Snapshot;

/// One downsampled reporting window for one entity
///
/// Buckets are ephemeral: computed per query, never persisted. The wire
/// names (`project`, `timestamp`) match the query endpoint's response
/// format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// Entity this window summarizes
    #[serde(rename = "project")]
    pub entity: String,

    /// Window start, aligned to a whole number of intervals past the
    /// entity's first snapshot
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub bucket_start: DateTime<Utc>,

    /// Download counter of the snapshot that closed the window
    pub downloads: u64,

    /// Downloads at window close minus downloads at window open
    ///
    /// Negative values pass through unchanged when a source reports a
    /// lower counter than before.
    pub downloads_diff: i64,

    /// Follower count of the closing snapshot, if the source reports one
    pub followers: Option<u64>,

    /// Version count of the closing snapshot
    pub versions: u64,
}

/// Aggregation state for one entity's currently open window
#[derive(Debug, Clone)]
struct WindowState {
    /// Snapshot that opened the current window
    opened: Snapshot,
    /// Window start, aligned to interval boundaries; initialized to the
    /// timestamp of the entity's first snapshot
    window_start: DateTime<Utc>,
    /// Most recently seen snapshot
    last: Snapshot,
}

impl WindowState {
    fn open(first: &Snapshot) -> Self {
        Self {
            opened: first.clone(),
            window_start: first.timestamp,
            last: first.clone(),
        }
    }

    /// Fold in the next snapshot, emitting a bucket when it falls past the
    /// open window.
    fn step(&mut self, interval: TimeDelta, snapshot: &Snapshot) -> Option<Bucket> {
        debug_assert!(
            snapshot.timestamp >= self.last.timestamp,
            "snapshots must arrive in ascending timestamp order"
        );

        let elapsed = snapshot.timestamp - self.window_start;
        self.last = snapshot.clone();

        if elapsed <= interval {
            return None;
        }

        // Advance by the arithmetic count of whole intervals so the current
        // snapshot lands within one interval of the new window start. Gaps
        // spanning several empty intervals emit nothing for the skipped
        // windows.
        let steps = (elapsed.num_milliseconds() - 1) / interval.num_milliseconds();
        self.window_start += TimeDelta::milliseconds(steps * interval.num_milliseconds());

        let bucket = Bucket {
            entity: snapshot.entity.clone(),
            bucket_start: self.window_start,
            downloads: snapshot.downloads,
            downloads_diff: snapshot.downloads as i64 - self.opened.downloads as i64,
            followers: snapshot.followers,
            versions: snapshot.versions,
        };

        self.opened = snapshot.clone();
        Some(bucket)
    }

    /// Close the still-open window into a trailing partial bucket.
    fn into_trailing(self) -> Bucket {
        Bucket {
            entity: self.last.entity.clone(),
            bucket_start: self.last.timestamp,
            downloads: self.last.downloads,
            downloads_diff: self.last.downloads as i64 - self.opened.downloads as i64,
            followers: self.last.followers,
            versions: self.last.versions,
        }
    }
}

/// Downsample an ascending snapshot sequence for a single entity
///
/// `interval` is the bucket width and must be strictly positive (a
/// configuration error the caller validates). With
/// `include_trailing_partial` set, one extra bucket is emitted for the most
/// recent, not-yet-complete window; a single snapshot then yields exactly
/// one degenerate bucket with a zero delta.
pub fn downsample(
    snapshots: &[Snapshot],
    interval: TimeDelta,
    include_trailing_partial: bool,
) -> Vec<Bucket> {
    debug_assert!(interval > TimeDelta::zero(), "bucket interval must be positive");

    let mut state: Option<WindowState> = None;
    let mut buckets = Vec::new();

    for snapshot in snapshots {
        match state.as_mut() {
            None => state = Some(WindowState::open(snapshot)),
            Some(window) => buckets.extend(window.step(interval, snapshot)),
        }
    }

    if include_trailing_partial && let Some(window) = state {
        buckets.push(window.into_trailing());
    }

    buckets
}

/// Downsampler for a mixed multi-entity snapshot stream
///
/// Feeds a single globally-ascending sequence through one independent
/// [`WindowState`] per entity. Buckets are emitted in arrival order;
/// trailing partials are emitted per entity in sorted entity order so
/// repeated runs over the same input produce identical output.
#[derive(Debug)]
pub struct Downsampler {
    interval: TimeDelta,
    include_trailing_partial: bool,
    states: BTreeMap<String, WindowState>,
}

impl Downsampler {
    /// Create a downsampler with the given bucket width
    pub fn new(interval: TimeDelta, include_trailing_partial: bool) -> Self {
        debug_assert!(interval > TimeDelta::zero(), "bucket interval must be positive");
        Self {
            interval,
            include_trailing_partial,
            states: BTreeMap::new(),
        }
    }

    /// Feed the next snapshot, returning the bucket it closed, if any
    pub fn push(&mut self, snapshot: &Snapshot) -> Option<Bucket> {
        match self.states.get_mut(&snapshot.entity) {
            None => {
                self.states
                    .insert(snapshot.entity.clone(), WindowState::open(snapshot));
                None
            }
            Some(window) => window.step(self.interval, snapshot),
        }
    }

    /// Consume the remaining per-entity state
    ///
    /// Returns the trailing partial buckets in sorted entity order, or
    /// nothing when trailing partials were not requested.
    pub fn finish(self) -> Vec<Bucket> {
        if !self.include_trailing_partial {
            return Vec::new();
        }
        self.states
            .into_values()
            .map(WindowState::into_trailing)
            .collect()
    }

    /// Downsample a full multi-entity sequence in one call
    pub fn run(
        snapshots: &[Snapshot],
        interval: TimeDelta,
        include_trailing_partial: bool,
    ) -> Vec<Bucket> {
        let mut downsampler = Self::new(interval, include_trailing_partial);
        let mut buckets = Vec::new();
        for snapshot in snapshots {
            buckets.extend(downsampler.push(snapshot));
        }
        buckets.extend(downsampler.finish());
        buckets
    }
}
