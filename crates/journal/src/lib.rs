//! Persistent route history
//!
//! This crate provides:
//! - Target and Snapshot records (bincode-encoded)
//! - An append-only, per-target snapshot log (sled embedded DB)
//! - The retention policy that bounds stored history size

pub mod history;
pub mod record;
pub mod retention;

// Re-exports
pub use history::{now_ms, History};
pub use record::{Snapshot, Target};
pub use retention::{prune, RetentionPolicy};

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(#[from] sled::Error),
    #[error("corrupt stored record: {0}")]
    Codec(#[from] bincode::Error),
    #[error("corrupt snapshot key")]
    Key,
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;
