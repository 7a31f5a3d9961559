//! Domain layer: roster entities and the organization chart model
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod entities;
pub mod error;
pub mod node;
pub mod reconcile;
pub mod reorder;

pub use builder::{build, orphans, OrgTreeBuilder};
pub use entities::{Position, StaffRecord};
pub use error::{DomainError, DomainResult};
pub use node::{render_forest, Forest, ForestExt, OrganizationNode};
pub use reconcile::{reconcile, ReconcileReport, Reconciled};
pub use reorder::{move_node, Move, ParentRef, ROOT};

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
///
/// Returns the input unchanged if a variable is undefined.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
