//! Store implementations
//!
//! `JsonFileStore` keeps one directory per school under the data dir:
//!
//! ```text
//! <data_dir>/schools/<school_id>/staff.json
//! <data_dir>/schools/<school_id>/layout.json
//! ```
//!
//! `MemoryStore` keeps everything in process and is used by tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use chrono::Utc;
use regex::Regex;
use tracing::{debug, info};

use crate::domain::{Forest, StaffRecord};
use crate::infrastructure::traits::{FileSystem, LayoutStore, RecordStore, SavedLayout};

const STAFF_FILE: &str = "staff.json";
const LAYOUT_FILE: &str = "layout.json";

static SCHOOL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("school id pattern is valid"));

/// Reject school ids that could escape the data directory.
pub fn validate_school_id(school_id: &str) -> io::Result<()> {
    if SCHOOL_ID.is_match(school_id) {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid school id: {school_id:?} (allowed: letters, digits, '_', '-')"),
        ))
    }
}

fn invalid_data(path: &Path, e: serde_json::Error) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("parse {}: {}", path.display(), e),
    )
}

/// JSON documents on disk.
pub struct JsonFileStore {
    fs: Arc<dyn FileSystem>,
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(fs: Arc<dyn FileSystem>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn school_dir(&self, school_id: &str) -> io::Result<PathBuf> {
        validate_school_id(school_id)?;
        Ok(self.data_dir.join("schools").join(school_id))
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, path: &Path) -> io::Result<Option<T>> {
        if !self.fs.exists(path) {
            return Ok(None);
        }
        let content = self.fs.read_to_string(path)?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| invalid_data(path, e))
    }

    fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> io::Result<()> {
        if let Some(dir) = path.parent() {
            self.fs.create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(value).map_err(|e| invalid_data(path, e))?;
        self.fs.write_atomic(path, &content)
    }
}

impl RecordStore for JsonFileStore {
    fn list_staff(&self, school_id: &str) -> io::Result<Vec<StaffRecord>> {
        let path = self.school_dir(school_id)?.join(STAFF_FILE);
        let records: Vec<StaffRecord> = self.read_json(&path)?.unwrap_or_default();
        debug!(school_id, count = records.len(), "loaded roster");
        Ok(records)
    }

    fn replace_staff(&self, school_id: &str, records: &[StaffRecord]) -> io::Result<()> {
        let path = self.school_dir(school_id)?.join(STAFF_FILE);
        self.write_json(&path, &records)?;
        info!(school_id, count = records.len(), "replaced roster");
        Ok(())
    }
}

impl LayoutStore for JsonFileStore {
    fn get_layout(&self, school_id: &str) -> io::Result<Option<SavedLayout>> {
        let path = self.school_dir(school_id)?.join(LAYOUT_FILE);
        self.read_json(&path)
    }

    fn put_layout(
        &self,
        school_id: &str,
        nodes: &Forest,
        roster_fingerprint: &str,
    ) -> io::Result<()> {
        let path = self.school_dir(school_id)?.join(LAYOUT_FILE);
        let layout = SavedLayout {
            nodes: nodes.clone(),
            roster_fingerprint: roster_fingerprint.to_string(),
            updated_at: Utc::now(),
        };
        self.write_json(&path, &layout)?;
        info!(school_id, path = %path.display(), "saved layout");
        Ok(())
    }

    fn delete_layout(&self, school_id: &str) -> io::Result<bool> {
        let path = self.school_dir(school_id)?.join(LAYOUT_FILE);
        if !self.fs.exists(&path) {
            return Ok(false);
        }
        self.fs.remove_file(&path)?;
        info!(school_id, "deleted layout");
        Ok(true)
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    staff: Mutex<HashMap<String, Vec<StaffRecord>>>,
    layouts: Mutex<HashMap<String, SavedLayout>>,
}

fn lock<T>(m: &Mutex<T>) -> io::Result<MutexGuard<'_, T>> {
    m.lock().map_err(|e| io::Error::other(e.to_string()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn list_staff(&self, school_id: &str) -> io::Result<Vec<StaffRecord>> {
        Ok(lock(&self.staff)?.get(school_id).cloned().unwrap_or_default())
    }

    fn replace_staff(&self, school_id: &str, records: &[StaffRecord]) -> io::Result<()> {
        lock(&self.staff)?.insert(school_id.to_string(), records.to_vec());
        Ok(())
    }
}

impl LayoutStore for MemoryStore {
    fn get_layout(&self, school_id: &str) -> io::Result<Option<SavedLayout>> {
        Ok(lock(&self.layouts)?.get(school_id).cloned())
    }

    fn put_layout(
        &self,
        school_id: &str,
        nodes: &Forest,
        roster_fingerprint: &str,
    ) -> io::Result<()> {
        let layout = SavedLayout {
            nodes: nodes.clone(),
            roster_fingerprint: roster_fingerprint.to_string(),
            updated_at: Utc::now(),
        };
        lock(&self.layouts)?.insert(school_id.to_string(), layout);
        Ok(())
    }

    fn delete_layout(&self, school_id: &str) -> io::Result<bool> {
        Ok(lock(&self.layouts)?.remove(school_id).is_some())
    }
}
