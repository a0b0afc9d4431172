//! Ingestion scheduler with cron support
//!
//! Drives all configured adapters on a single cron cadence. One tick walks
//! every tracked entity, stamps all observations with the same tick
//! timestamp, and hands them to a writer over an mpsc channel; a run guard
//! ensures ticks never overlap. A failed fetch is logged and skipped, so
//! one entity can never abort the rest of the tick, and there are no
//! retries within a tick - the next scheduled tick is the only retry
//! mechanism.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use cron::Schedule;
use tally_engine::{RevenueObservation, Snapshot};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::Adapter;
use crate::error::ConnectorError;
use crate::plan::IngestPlan;

/// One observation produced by an ingestion tick, bound for the store
///
/// The scheduler never touches storage itself; a single consumer drains
/// the channel and appends, which serializes writes per partition by
/// construction.
#[derive(Debug, Clone)]
pub enum Observation {
    /// Counter snapshot for one entity
    Stats(Snapshot),
    /// Balance observation for one user
    Revenue(RevenueObservation),
}

/// Scheduler that runs ingestion ticks on a cron cadence
pub struct IngestScheduler {
    /// Adapters keyed by configured source name
    adapters: HashMap<String, Arc<Adapter>>,
    /// Entities to sample each tick
    plan: IngestPlan,
    /// Cron schedule
    schedule: Schedule,
    /// Next scheduled run time
    next_run: Option<DateTime<Utc>>,
    /// Whether a tick is currently running
    running: Arc<AtomicBool>,
    /// Where observations are sent
    sink: mpsc::Sender<Observation>,
    /// Check interval for scheduled runs
    check_interval: Duration,
}

impl IngestScheduler {
    /// Create a scheduler from a cron expression
    ///
    /// # Errors
    ///
    /// Returns error if the cron expression does not parse.
    pub fn new(
        cron_expr: &str,
        adapters: HashMap<String, Arc<Adapter>>,
        plan: IngestPlan,
        sink: mpsc::Sender<Observation>,
    ) -> Result<Self, ConnectorError> {
        let schedule = Schedule::from_str(cron_expr)
            .map_err(|e| ConnectorError::InvalidSchedule(format!("{}: {}", cron_expr, e)))?;
        let next_run = schedule.upcoming(Utc).next();

        Ok(Self {
            adapters,
            plan,
            schedule,
            next_run,
            running: Arc::new(AtomicBool::new(false)),
            sink,
            check_interval: Duration::from_secs(60),
        })
    }

    /// Set the check interval for scheduled runs
    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    /// Get the next scheduled run time
    pub fn next_run(&self) -> Option<DateTime<Utc>> {
        self.next_run
    }

    /// Update next run time after starting a tick
    fn advance_schedule(&mut self) {
        self.next_run = self.schedule.upcoming(Utc).next();
    }

    /// Check if a tick is due
    fn should_run(&self, now: DateTime<Utc>) -> bool {
        match self.next_run {
            Some(next) => now >= next,
            None => false,
        }
    }

    /// Try to start a tick (returns false if one is already running)
    fn try_start(&self) -> bool {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
            .is_ok()
    }

    /// Run the scheduler loop
    ///
    /// Ticks run in spawned tasks; the run guard prevents a new tick from
    /// starting while a previous one is still in progress.
    pub async fn run(mut self) {
        info!(
            entities = self.plan.entity_count(),
            sources = self.adapters.len(),
            next_run = ?self.next_run,
            "starting ingestion scheduler"
        );

        loop {
            let now = Utc::now();

            if self.should_run(now) {
                if self.running.load(Ordering::Relaxed) {
                    warn!("skipping scheduled tick - previous tick still in progress");
                    self.advance_schedule();
                } else if self.try_start() {
                    let adapters = self.adapters.clone();
                    let plan = self.plan.clone();
                    let sink = self.sink.clone();
                    let running = Arc::clone(&self.running);

                    tokio::spawn(async move {
                        run_tick(&adapters, &plan, &sink).await;
                        running.store(false, Ordering::Relaxed);
                    });

                    self.advance_schedule();
                    debug!(next_run = ?self.next_run, "next scheduled tick");
                }
            }

            tokio::time::sleep(self.check_interval).await;
        }
    }

    /// Run one tick immediately (for manual triggers)
    pub async fn run_once(&self) -> (u32, u32) {
        run_tick(&self.adapters, &self.plan, &self.sink).await
    }
}

/// Execute one ingestion tick, returning (written, failed) fetch counts
async fn run_tick(
    adapters: &HashMap<String, Arc<Adapter>>,
    plan: &IngestPlan,
    sink: &mpsc::Sender<Observation>,
) -> (u32, u32) {
    // Every observation in a tick shares one timestamp.
    let taken_at = Utc::now();
    info!(entities = plan.entity_count(), "starting ingestion tick");

    let mut written = 0u32;
    let mut failed = 0u32;

    for user in &plan.users {
        for link in &user.links {
            let Some(adapter) = adapters.get(&link.source) else {
                warn!(user = %user.id, source = %link.source, "no adapter for source");
                failed += 1;
                continue;
            };

            match adapter.user_projects(&link.remote_id).await {
                Ok(projects) => {
                    for project in projects {
                        let snapshot = Snapshot {
                            source: link.source.clone(),
                            entity: project.slug,
                            timestamp: taken_at,
                            downloads: project.stats.downloads,
                            followers: project.stats.followers,
                            versions: project.stats.versions,
                        };
                        if !send(sink, Observation::Stats(snapshot)).await {
                            return (written, failed);
                        }
                        written += 1;
                    }
                    debug!(user = %user.id, source = %link.source, "fetched user projects");
                }
                Err(e) if e.is_unsupported() => {
                    debug!(user = %user.id, source = %link.source, "source has no user projects");
                }
                Err(e) => {
                    warn!(user = %user.id, source = %link.source, error = %e, "user fetch failed");
                    failed += 1;
                }
            }

            match adapter.payout_balance(&link.remote_id).await {
                Ok(balance) => {
                    let observation = RevenueObservation {
                        source: link.source.clone(),
                        user: user.id.clone(),
                        timestamp: taken_at,
                        all_time_balance: balance.all_time,
                        balance: balance.balance,
                    };
                    if !send(sink, Observation::Revenue(observation)).await {
                        return (written, failed);
                    }
                    written += 1;
                }
                Err(e) if e.is_unsupported() => {
                    debug!(user = %user.id, source = %link.source, "source has no payouts");
                }
                Err(e) => {
                    warn!(user = %user.id, source = %link.source, error = %e, "payout fetch failed");
                    failed += 1;
                }
            }
        }
    }

    for project in &plan.projects {
        for link in &project.links {
            let Some(adapter) = adapters.get(&link.source) else {
                warn!(project = %project.id, source = %link.source, "no adapter for source");
                failed += 1;
                continue;
            };

            match adapter.project_stats(&link.remote_id).await {
                Ok(stats) => {
                    let snapshot = Snapshot {
                        source: link.source.clone(),
                        entity: project.id.clone(),
                        timestamp: taken_at,
                        downloads: stats.downloads,
                        followers: stats.followers,
                        versions: stats.versions,
                    };
                    if !send(sink, Observation::Stats(snapshot)).await {
                        return (written, failed);
                    }
                    written += 1;
                    debug!(project = %project.id, source = %link.source, "fetched project");
                }
                Err(e) => {
                    warn!(project = %project.id, source = %link.source, error = %e, "project fetch failed");
                    failed += 1;
                }
            }
        }
    }

    info!(written, failed, "ingestion tick complete");
    (written, failed)
}

/// Send one observation; false means the writer is gone and the tick should
/// stop.
async fn send(sink: &mpsc::Sender<Observation>, observation: Observation) -> bool {
    if sink.send(observation).await.is_err() {
        error!("observation channel closed, aborting tick");
        return false;
    }
    true
}
