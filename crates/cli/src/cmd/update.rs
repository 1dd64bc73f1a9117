//! One immediate update pass for every target

use crate::util;
use anyhow::Result;
use monitor::scheduler::JobContext;
use monitor::{Scheduler, Settings, SystemTraceroute};
use std::sync::Arc;

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

    Scheduler::run_once(ctx, &targets).await;
    Ok(())
}
