//! Stored record types

use serde::{Deserialize, Serialize};

/// A monitored host, owner of an ordered snapshot sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// User-chosen unique name
    pub name: String,
    /// Hostname, IPv4 or IPv6 address to probe
    pub address: String,
    /// Informational tags; never interpreted by the core
    pub groups: Vec<String>,
}

/// One stored traceroute result for a target
///
/// Immutable once created; `id` is a per-target monotonic sequence, so id
/// order is insertion order is time order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Per-target sequence number, assigned on append
    pub id: u64,
    /// Creation time in Unix milliseconds
    pub created_at_ms: u64,
    /// Unparsed probe output
    pub raw: String,
}

impl Target {
    pub(crate) fn encode(&self) -> crate::Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub(crate) fn decode(bytes: &[u8]) -> crate::Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl Snapshot {
    pub(crate) fn encode(&self) -> crate::Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub(crate) fn decode(bytes: &[u8]) -> crate::Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
