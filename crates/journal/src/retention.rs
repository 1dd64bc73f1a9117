//! Retention policy: age-based pruning with a minimum-survivor floor

use crate::history::History;
use crate::Result;
use tracing::info;

const MS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// Retention policy configuration
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    /// Snapshots older than this many days become eligible for deletion;
    /// `None` disables retention entirely
    pub max_age_days: Option<u64>,
    /// Number of snapshots that always survive, regardless of age
    /// (default: 100)
    pub minimum_keep: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_age_days: None,
            minimum_keep: 100,
        }
    }
}

impl RetentionPolicy {
    pub fn enabled(&self) -> bool {
        self.max_age_days.is_some()
    }
}

/// Delete aged snapshots for one target; returns how many were deleted.
///
/// Among snapshots older than the age threshold, only the oldest
/// `total - minimum_keep` are deleted, so the target never drops below
/// `minimum_keep` snapshots and nothing younger than the threshold is ever
/// deleted. The floor check runs before any age filtering. An unknown
/// target or a disabled policy is a no-op.
pub fn prune(history: &History, name: &str, policy: &RetentionPolicy, now_ms: u64) -> Result<usize> {
    let Some(max_age_days) = policy.max_age_days else {
        return Ok(0);
    };
    if history.get_target(name)?.is_none() {
        return Ok(0);
    }

    let total = history.snapshot_count(name)?;
    if total <= policy.minimum_keep {
        return Ok(0);
    }
    let excess = total - policy.minimum_keep;

    let cutoff_ms = now_ms.saturating_sub(max_age_days * MS_PER_DAY);
    let doomed: Vec<u64> = history
        .snapshots_oldest_first(name)?
        .into_iter()
        .filter(|snapshot| snapshot.created_at_ms < cutoff_ms)
        .take(excess)
        .map(|snapshot| snapshot.id)
        .collect();

    if doomed.is_empty() {
        return Ok(0);
    }

    let deleted = history.delete_snapshots(name, &doomed)?;
    info!(target_name = name, deleted, "deleted old route snapshots");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DAY_MS: u64 = MS_PER_DAY;

    fn open_history() -> (TempDir, History) {
        let dir = TempDir::new().unwrap();
        let history = History::open(dir.path()).unwrap();
        (dir, history)
    }

    /// Target with `old` snapshots aged 40 days and `fresh` snapshots aged
    /// one day, against a fixed `now` of day 1000
    fn seed(history: &History, name: &str, old: usize, fresh: usize) -> u64 {
        let now_ms = 1000 * DAY_MS;
        history.create_target(name, "192.0.2.1", &[]).unwrap();
        for _ in 0..old {
            history
                .append_snapshot_at(name, "old trace", now_ms - 40 * DAY_MS)
                .unwrap();
        }
        for _ in 0..fresh {
            history
                .append_snapshot_at(name, "fresh trace", now_ms - DAY_MS)
                .unwrap();
        }
        now_ms
    }

    fn policy(max_age_days: u64, minimum_keep: usize) -> RetentionPolicy {
        RetentionPolicy {
            max_age_days: Some(max_age_days),
            minimum_keep,
        }
    }

    #[test]
    fn test_retention_boundary() {
        let (_dir, history) = open_history();
        // 150 snapshots, 120 older than 30 days, keep at least 100:
        // exactly 150 - 100 = 50 of the oldest eligible ones go
        let now_ms = seed(&history, "router-a", 120, 30);

        let deleted = prune(&history, "router-a", &policy(30, 100), now_ms).unwrap();

        assert_eq!(deleted, 50);
        assert_eq!(history.snapshot_count("router-a").unwrap(), 100);
        // Every survivor younger than the threshold is untouched
        let fresh_left = history
            .snapshots_oldest_first("router-a")
            .unwrap()
            .iter()
            .filter(|s| s.raw == "fresh trace")
            .count();
        assert_eq!(fresh_left, 30);
    }

    #[test]
    fn test_oldest_eligible_deleted_first() {
        let (_dir, history) = open_history();
        let now_ms = seed(&history, "router-a", 10, 0);

        let deleted = prune(&history, "router-a", &policy(30, 7), now_ms).unwrap();

        assert_eq!(deleted, 3);
        let ids: Vec<u64> = history
            .snapshots_oldest_first("router-a")
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_never_deletes_young_snapshots() {
        let (_dir, history) = open_history();
        // All 20 snapshots are fresh; way over the floor of 5, but nothing
        // is old enough to be eligible
        let now_ms = seed(&history, "router-a", 0, 20);

        let deleted = prune(&history, "router-a", &policy(30, 5), now_ms).unwrap();

        assert_eq!(deleted, 0);
        assert_eq!(history.snapshot_count("router-a").unwrap(), 20);
    }

    #[test]
    fn test_fewer_eligible_than_excess() {
        let (_dir, history) = open_history();
        // Excess is 15 - 5 = 10 but only 4 snapshots are old enough
        let now_ms = seed(&history, "router-a", 4, 11);

        let deleted = prune(&history, "router-a", &policy(30, 5), now_ms).unwrap();

        assert_eq!(deleted, 4);
        assert_eq!(history.snapshot_count("router-a").unwrap(), 11);
    }

    #[test]
    fn test_floor_check_precedes_age_filtering() {
        let (_dir, history) = open_history();
        // Everything is ancient, but total == minimum_keep
        let now_ms = seed(&history, "router-a", 100, 0);

        let deleted = prune(&history, "router-a", &policy(30, 100), now_ms).unwrap();

        assert_eq!(deleted, 0);
        assert_eq!(history.snapshot_count("router-a").unwrap(), 100);
    }

    #[test]
    fn test_disabled_policy_is_a_noop() {
        let (_dir, history) = open_history();
        let now_ms = seed(&history, "router-a", 50, 0);

        let disabled = RetentionPolicy {
            max_age_days: None,
            minimum_keep: 5,
        };
        let deleted = prune(&history, "router-a", &disabled, now_ms).unwrap();

        assert_eq!(deleted, 0);
        assert_eq!(history.snapshot_count("router-a").unwrap(), 50);
    }

    #[test]
    fn test_unknown_target_is_a_noop() {
        let (_dir, history) = open_history();
        let deleted = prune(&history, "ghost", &policy(30, 5), now_ms_fixed()).unwrap();
        assert_eq!(deleted, 0);
    }

    fn now_ms_fixed() -> u64 {
        1000 * DAY_MS
    }
}
