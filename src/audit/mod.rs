//! Audit log - append-only record of decisions
//!
//! Appends and clears take the write lock, so a clear never interleaves
//! with a partially applied append. Snapshots are copies and stay valid
//! while the log keeps growing.

use parking_lot::RwLock;
use thiserror::Error;

use crate::decision::Decision;

/// Default maximum number of retained entries
pub const DEFAULT_AUDIT_CAPACITY: usize = 100_000;

/// Audit log errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// The log holds its maximum number of entries
    #[error("Audit log full ({capacity} entries)")]
    Full { capacity: usize },
}

/// Result type for audit operations
pub type AuditResult<T> = Result<T, AuditError>;

/// In-memory, ordered, append-only decision log
#[derive(Debug)]
pub struct AuditLog {
    entries: RwLock<Vec<Decision>>,
    capacity: usize,
}

impl AuditLog {
    /// Create a log with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_AUDIT_CAPACITY)
    }

    /// Create a log that refuses appends beyond `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            capacity,
        }
    }

    /// Append a decision, returning its position in the log
    ///
    /// Fails without touching the log when it is full.
    pub fn append(&self, decision: Decision) -> AuditResult<usize> {
        let mut entries = self.entries.write();
        if entries.len() >= self.capacity {
            return Err(AuditError::Full {
                capacity: self.capacity,
            });
        }
        entries.push(decision);
        Ok(entries.len() - 1)
    }

    /// Copy of all entries in append order
    pub fn snapshot(&self) -> Vec<Decision> {
        self.entries.read().clone()
    }

    /// Drop every entry
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        *entries = Vec::new();
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}
