//! Shared utilities for CLI commands

use crate::exit_code;
use chrono::{DateTime, Utc};
use journal::History;
use monitor::{Settings, TargetSpec};
use std::sync::Arc;
use tracing::warn;

/// Open the snapshot store, or exit with the storage error code.
///
/// Startup-time fatality: the diagnostic goes to stderr and nothing is
/// left running.
pub fn open_history_or_exit(settings: &Settings) -> Arc<History> {
    match History::open(&settings.storage_path) {
        Ok(history) => Arc::new(history),
        Err(err) => {
            eprintln!(
                "cannot open snapshot store {}: {err}",
                settings.storage_path.display()
            );
            std::process::exit(exit_code::STORAGE);
        }
    }
}

/// Primary plus smokeping targets, or exit when both sources are empty
pub fn monitored_targets_or_exit(settings: &Settings) -> Vec<TargetSpec> {
    let targets = settings.merged_targets();
    if targets.is_empty() {
        eprintln!("no valid targets given");
        std::process::exit(exit_code::NO_TARGETS);
    }
    targets
}

/// Traceroute usually needs raw sockets; say so once instead of failing
/// every probe mysteriously
pub fn warn_if_not_root() {
    if !is_root::is_root() {
        warn!("not running as root; the traceroute binary may be unable to open raw sockets");
    }
}

/// Format a Unix-millisecond timestamp as "YYYY-MM-DD HH:MM:SS" UTC
pub fn format_timestamp(ts_ms: u64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ts_ms as i64)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown time".to_string())
}
