//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the roster and chart rules.
/// These are independent of storage concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A referenced node or parent is not present in the forest snapshot.
    /// Callers recover by re-reading the current forest.
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    #[error("cannot move {node_id} into its own subtree ({target})")]
    InvalidMove { node_id: String, target: String },

    #[error("index {index} out of range for {parent} (len {len})")]
    IndexOutOfRange {
        parent: String,
        index: usize,
        len: usize,
    },

    #[error("staff record #{index}: {field} must not be empty")]
    InvalidRecord { index: usize, field: &'static str },

    #[error("duplicate staff id: {0}")]
    DuplicateId(String),

    #[error("unknown position: {0} (expected principal, vice_principal, department_head or staff)")]
    UnknownPosition(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
