//! Run the monitor until interrupted

use crate::util;
use anyhow::{Context, Result};
use monitor::scheduler::JobContext;
use monitor::{Scheduler, Settings, SystemTraceroute};
use std::sync::Arc;
use tracing::info;

pub async fn run(settings: &Settings) -> Result<()> {
    util::warn_if_not_root();

    let history = util::open_history_or_exit(settings);
    let targets = util::monitored_targets_or_exit(settings);

    let ctx = Arc::new(JobContext {
        history,
        prober: Arc::new(SystemTraceroute),
        interval: settings.interval,
        retention: settings.retention.clone(),
    });

    info!(
        targets = targets.len(),
        interval_secs = settings.interval.as_secs(),
        "starting monitor"
    );
    let scheduler = Scheduler::start(ctx, targets);

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for the interrupt signal")?;
    info!("interrupted, letting in-flight jobs finish");
    scheduler.shutdown().await;

    Ok(())
}
