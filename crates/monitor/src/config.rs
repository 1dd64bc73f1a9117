//! Typed monitor configuration
//!
//! The TOML file is deserialized into a raw option structure, then resolved
//! once at startup into validated [`Settings`]: every recognized option has
//! an enumerated default, and out-of-range values fall back with a warning
//! instead of being probed ad hoc at use sites.

use crate::smokeping;
use anyhow::{Context, Result};
use journal::RetentionPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

const DEFAULT_INTERVAL_SECS: i64 = 3600;
const DEFAULT_MINIMUM_KEEP: i64 = 100;

/// One host to monitor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetSpec {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Validated, fully-defaulted configuration
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory of the sled snapshot store
    pub storage_path: PathBuf,
    /// Pause between route updates of one target
    pub interval: Duration,
    /// Retention policy shared by every target
    pub retention: RetentionPolicy,
    /// Daemon log file; stderr when absent
    pub log_file: Option<PathBuf>,
    /// Optional smokeping configuration to harvest extra targets from
    pub smokeping_config: Option<PathBuf>,
    /// Targets from the primary configuration file
    pub targets: Vec<TargetSpec>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    storage: RawStorage,
    #[serde(default)]
    monitor: RawMonitor,
    #[serde(default)]
    targets: Vec<TargetSpec>,
}

#[derive(Debug, Deserialize)]
struct RawStorage {
    path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct RawMonitor {
    interval: Option<i64>,
    max_age_days: Option<i64>,
    minimum_keep: Option<i64>,
    log_file: Option<PathBuf>,
    smokeping_config: Option<PathBuf>,
}

/// Load and resolve the configuration file.
///
/// An unreadable or unparsable file is an error; individually bogus values
/// resolve to their documented defaults, each reported in the returned
/// warning list (emitted by the caller once logging is up).
pub fn load(path: &Path) -> Result<(Settings, Vec<String>)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read configuration file {}", path.display()))?;
    let raw: RawConfig = toml::from_str(&text)
        .with_context(|| format!("cannot parse configuration file {}", path.display()))?;
    Ok(resolve(raw))
}

fn resolve(raw: RawConfig) -> (Settings, Vec<String>) {
    let mut warnings = Vec::new();

    let interval_secs = match raw.monitor.interval {
        None => DEFAULT_INTERVAL_SECS,
        Some(secs) if secs > 0 => secs,
        Some(bogus) => {
            warnings.push(format!(
                "bogus interval value {bogus}, using default of {DEFAULT_INTERVAL_SECS} seconds"
            ));
            DEFAULT_INTERVAL_SECS
        }
    };

    let max_age_days = match raw.monitor.max_age_days {
        None => None,
        Some(days) if days > 0 => Some(days as u64),
        Some(bogus) => {
            warnings.push(format!(
                "bogus max_age_days value {bogus}, deactivating snapshot cleanup"
            ));
            None
        }
    };

    let minimum_keep = match raw.monitor.minimum_keep {
        None => DEFAULT_MINIMUM_KEEP,
        Some(keep) if keep >= 0 => keep,
        Some(bogus) => {
            warnings.push(format!(
                "bogus minimum_keep value {bogus}, using default of {DEFAULT_MINIMUM_KEEP}"
            ));
            DEFAULT_MINIMUM_KEEP
        }
    };

    let settings = Settings {
        storage_path: raw.storage.path,
        interval: Duration::from_secs(interval_secs as u64),
        retention: RetentionPolicy {
            max_age_days,
            minimum_keep: minimum_keep as usize,
        },
        log_file: raw.monitor.log_file,
        smokeping_config: raw.monitor.smokeping_config,
        targets: raw.targets,
    };

    (settings, warnings)
}

impl Settings {
    /// Primary targets merged with the smokeping source, if configured.
    ///
    /// A malformed smokeping file is rejected wholesale: it contributes
    /// zero targets and a warning, never a partial set.
    pub fn merged_targets(&self) -> Vec<TargetSpec> {
        let mut targets = self.targets.clone();
        if let Some(path) = &self.smokeping_config {
            match smokeping::read_targets(path) {
                Ok(extra) => targets.extend(extra),
                Err(err) => warn!("ignoring smokeping target source: {err:#}"),
            }
        }
        targets
    }
}
