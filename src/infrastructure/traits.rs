//! I/O boundary traits for testability
//!
//! These traits abstract persistence, allowing services to be tested
//! with in-memory implementations.

use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Forest, StaffRecord};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace file content atomically (temp file in the same directory + rename).
    fn write_atomic(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// Per-school staff roster storage.
pub trait RecordStore: Send + Sync {
    /// Roster in stored order; empty if the school has none.
    fn list_staff(&self, school_id: &str) -> io::Result<Vec<StaffRecord>>;

    /// Replace the whole roster (delete + insert semantics).
    fn replace_staff(&self, school_id: &str, records: &[StaffRecord]) -> io::Result<()>;
}

/// A manually arranged chart as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLayout {
    pub nodes: Forest,
    /// Fingerprint of the roster the layout was arranged from
    #[serde(default)]
    pub roster_fingerprint: String,
    pub updated_at: DateTime<Utc>,
}

/// Per-school chart layout storage. Last writer wins.
pub trait LayoutStore: Send + Sync {
    fn get_layout(&self, school_id: &str) -> io::Result<Option<SavedLayout>>;

    fn put_layout(&self, school_id: &str, nodes: &Forest, roster_fingerprint: &str)
        -> io::Result<()>;

    /// Returns false if there was no layout.
    fn delete_layout(&self, school_id: &str) -> io::Result<bool>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_atomic(&self, path: &Path, content: &str) -> io::Result<()> {
        use std::io::Write;

        let dir = path.parent().unwrap_or(Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}
