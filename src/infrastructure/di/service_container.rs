//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{ChartService, RosterService};
use crate::config::Settings;
use crate::infrastructure::store::JsonFileStore;
use crate::infrastructure::traits::{FileSystem, LayoutStore, RealFileSystem, RecordStore};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    pub roster: RosterService,
    pub chart: ChartService,
}

impl ServiceContainer {
    /// Create a new service container backed by JSON files under `settings.data_dir`.
    pub fn new(settings: Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let store = Arc::new(JsonFileStore::new(fs, settings.data_dir.clone()));
        Self::with_deps(settings, store.clone(), store)
    }

    /// Create a service container with custom stores (for testing).
    pub fn with_deps(
        settings: Settings,
        records: Arc<dyn RecordStore>,
        layouts: Arc<dyn LayoutStore>,
    ) -> Self {
        let settings = Arc::new(settings);
        let roster = RosterService::new(records.clone());
        let chart = ChartService::new(records, layouts).with_reconcile(settings.reconcile_layout);

        Self {
            settings,
            roster,
            chart,
        }
    }
}
