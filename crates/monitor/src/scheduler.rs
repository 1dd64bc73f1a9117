//! Per-target job scheduling
//!
//! Each target gets an update job and, when retention is enabled, a
//! housekeeping job. Every job runs once immediately at registration and
//! then on its own recurring period, in its own task, so targets never
//! block each other and one target's failing cycle never touches the
//! others' jobs.

use crate::config::TargetSpec;
use crate::probe::Prober;
use crate::update;
use journal::{now_ms, retention, History, RetentionPolicy};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Fixed period of the retention sweep, independent of the update interval
pub const HOUSEKEEPING_PERIOD: Duration = Duration::from_secs(3600);

/// Shared state handed to every job
pub struct JobContext {
    pub history: Arc<History>,
    pub prober: Arc<dyn Prober>,
    pub interval: Duration,
    pub retention: RetentionPolicy,
}

/// Owns the per-target job handles and the shutdown signal.
///
/// There is no ambient job registry: dropping or shutting down the
/// scheduler is the only way recurring dispatch stops.
pub struct Scheduler {
    shutdown: watch::Sender<bool>,
    jobs: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Register jobs for every target and start dispatching
    pub fn start(ctx: Arc<JobContext>, targets: Vec<TargetSpec>) -> Self {
        let (shutdown, _) = watch::channel(false);
        let mut jobs = Vec::new();

        for spec in targets {
            if ctx.retention.enabled() {
                jobs.push(tokio::spawn(retention_job(
                    ctx.clone(),
                    spec.name.clone(),
                    shutdown.subscribe(),
                )));
            }
            jobs.push(tokio::spawn(update_job(
                ctx.clone(),
                spec,
                shutdown.subscribe(),
            )));
        }

        info!(jobs = jobs.len(), "scheduler started");
        Self { shutdown, jobs }
    }

    /// Stop recurring dispatch and wait for in-flight jobs to finish.
    ///
    /// No job is force-killed: at most one in-flight probe per target
    /// bounds the shutdown delay.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for job in self.jobs {
            let _ = job.await;
        }
        info!("scheduler stopped");
    }

    /// One immediate update (and retention pass, when enabled) for every
    /// target, concurrently; returns once all targets are done
    pub async fn run_once(ctx: Arc<JobContext>, targets: &[TargetSpec]) {
        let passes = targets.iter().map(|spec| {
            let ctx = ctx.clone();
            async move {
                update::update_target(&ctx.history, ctx.prober.as_ref(), spec).await;
                prune_target(&ctx, &spec.name);
            }
        });
        futures::future::join_all(passes).await;
    }
}

/// Immediate update, then one update per interval tick.
///
/// Occurrences of one job id run strictly in sequence here, and
/// [`MissedTickBehavior::Skip`] drops any tick that came due while the
/// previous occurrence was still running: skip-if-busy, never a queue.
async fn update_job(ctx: Arc<JobContext>, spec: TargetSpec, mut shutdown: watch::Receiver<bool>) {
    let mut ticks = tokio::time::interval(ctx.interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately: the registration-time run
    ticks.tick().await;

    loop {
        update::update_target(&ctx.history, ctx.prober.as_ref(), &spec).await;

        tokio::select! {
            _ = ticks.tick() => {}
            _ = shutdown.changed() => {
                debug!(target_name = %spec.name, "update job stopping");
                break;
            }
        }
    }
}

/// Immediate retention sweep, then one sweep per housekeeping period
async fn retention_job(ctx: Arc<JobContext>, name: String, mut shutdown: watch::Receiver<bool>) {
    let mut ticks = tokio::time::interval(HOUSEKEEPING_PERIOD);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticks.tick().await;

    loop {
        prune_target(&ctx, &name);

        tokio::select! {
            _ = ticks.tick() => {}
            _ = shutdown.changed() => {
                debug!(target_name = %name, "housekeeping job stopping");
                break;
            }
        }
    }
}

/// Retention errors are logged, never propagated into the job loop
fn prune_target(ctx: &JobContext, name: &str) {
    if !ctx.retention.enabled() {
        return;
    }
    if let Err(err) = retention::prune(&ctx.history, name, &ctx.retention, now_ms()) {
        error!(target_name = %name, "housekeeping failed: {err}");
    }
}
