//! Error conversion helpers for store operations
//!
//! Provides extension traits for cleaner error handling with school context.

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add school context to a store error.
    ///
    /// # Example
    /// ```ignore
    /// self.records.list_staff(school_id)
    ///     .with_school_context("list staff", school_id)?;
    /// ```
    fn with_school_context(self, action: &str, school_id: &str) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_school_context(self, action: &str, school_id: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: school {}", action, school_id),
            source: Box::new(e),
        })
    }
}
