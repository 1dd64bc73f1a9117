//! Append-only per-target snapshot log using sled

use crate::record::{Snapshot, Target};
use crate::Result;
use parking_lot::Mutex;
use sled::{Db, Tree};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Tree holding one record per target, keyed by name
const TARGETS_TREE: &str = "targets";

/// Persistent route history: target records plus one ordered snapshot log
/// per target.
///
/// Snapshot keys are big-endian sequence numbers, so sled's key order is
/// insertion order; "most recent" is the last key of a target's tree.
pub struct History {
    db: Db,
    targets: Tree,
    /// Per-target write locks; the update path holds one across its
    /// read-compare-append sequence
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl History {
    /// Open or create the history database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let db = sled::open(path)?;
        let targets = db.open_tree(TARGETS_TREE)?;

        Ok(Self {
            db,
            targets,
            write_locks: Mutex::new(HashMap::new()),
        })
    }

    /// Create a new target record
    pub fn create_target(&self, name: &str, address: &str, groups: &[String]) -> Result<Target> {
        let target = Target {
            name: name.to_string(),
            address: address.to_string(),
            groups: groups.to_vec(),
        };
        self.targets.insert(name.as_bytes(), target.encode()?)?;
        self.db.flush()?;
        Ok(target)
    }

    /// Look up a target by name; absent is a value, not an error
    pub fn get_target(&self, name: &str) -> Result<Option<Target>> {
        match self.targets.get(name.as_bytes())? {
            Some(bytes) => Ok(Some(Target::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All stored targets, in name order
    pub fn list_targets(&self) -> Result<Vec<Target>> {
        let mut targets = Vec::new();
        for item in self.targets.iter() {
            let (_, bytes) = item?;
            targets.push(Target::decode(&bytes)?);
        }
        Ok(targets)
    }

    /// Write lock for one target's snapshot log.
    ///
    /// Writers of the same target must hold this across any read-then-append
    /// sequence; writers of different targets never contend.
    pub fn write_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.write_locks.lock();
        locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Append a snapshot stamped with the current time
    pub fn append_snapshot(&self, name: &str, raw: &str) -> Result<Snapshot> {
        self.append_snapshot_at(name, raw, now_ms())
    }

    /// Append a snapshot with an explicit creation time
    pub fn append_snapshot_at(&self, name: &str, raw: &str, created_at_ms: u64) -> Result<Snapshot> {
        let tree = self.snapshot_tree(name)?;

        let id = match tree.last()? {
            Some((key, _)) => decode_seq(&key)? + 1,
            None => 1,
        };

        let snapshot = Snapshot {
            id,
            created_at_ms,
            raw: raw.to_string(),
        };
        tree.insert(id.to_be_bytes(), snapshot.encode()?)?;

        // Flush to ensure durability
        self.db.flush()?;

        Ok(snapshot)
    }

    /// Most recent snapshot for a target
    pub fn latest_snapshot(&self, name: &str) -> Result<Option<Snapshot>> {
        let tree = self.snapshot_tree(name)?;
        match tree.last()? {
            Some((_, bytes)) => Ok(Some(Snapshot::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Up to `limit` snapshots for a target, newest first; `None` fetches all
    pub fn recent_snapshots(&self, name: &str, limit: Option<usize>) -> Result<Vec<Snapshot>> {
        let tree = self.snapshot_tree(name)?;
        let mut snapshots = Vec::new();
        for item in tree.iter().rev().take(limit.unwrap_or(usize::MAX)) {
            let (_, bytes) = item?;
            snapshots.push(Snapshot::decode(&bytes)?);
        }
        Ok(snapshots)
    }

    /// All snapshots for a target, oldest first
    pub fn snapshots_oldest_first(&self, name: &str) -> Result<Vec<Snapshot>> {
        let tree = self.snapshot_tree(name)?;
        let mut snapshots = Vec::new();
        for item in tree.iter() {
            let (_, bytes) = item?;
            snapshots.push(Snapshot::decode(&bytes)?);
        }
        Ok(snapshots)
    }

    /// Number of snapshots stored for a target
    pub fn snapshot_count(&self, name: &str) -> Result<usize> {
        Ok(self.snapshot_tree(name)?.len())
    }

    /// Delete the given snapshots as one atomic batch; returns how many
    /// existed and were removed
    pub fn delete_snapshots(&self, name: &str, ids: &[u64]) -> Result<usize> {
        let tree = self.snapshot_tree(name)?;

        let mut batch = sled::Batch::default();
        let mut removed = 0;
        for &id in ids {
            if tree.contains_key(id.to_be_bytes())? {
                batch.remove(&id.to_be_bytes()[..]);
                removed += 1;
            }
        }
        tree.apply_batch(batch)?;
        self.db.flush()?;

        Ok(removed)
    }

    fn snapshot_tree(&self, name: &str) -> Result<Tree> {
        Ok(self.db.open_tree(format!("snapshots/{name}"))?)
    }
}

fn decode_seq(key: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = key.try_into().map_err(|_| crate::StoreError::Key)?;
    Ok(u64::from_be_bytes(bytes))
}

/// Current wall-clock time in Unix milliseconds
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system time before UNIX epoch")
        .as_millis() as u64
}
