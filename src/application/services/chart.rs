//! Organization chart service
//!
//! Decides which forest a school sees: its saved layout when there is one,
//! otherwise the forest derived from the roster. Moves are applied to the
//! current forest and saved as the new layout.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::{roster_fingerprint, ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{self, Forest, Move, OrgTreeBuilder, ReconcileReport, StaffRecord};
use crate::infrastructure::traits::{LayoutStore, RecordStore};

/// Where the displayed forest came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartSource {
    /// Derived from the roster by the tier rules
    Computed,
    /// Restored from a saved layout
    Layout {
        /// Roster changed since the layout was saved
        stale: bool,
        /// Changes applied while reconciling; empty when reconciliation is off
        report: ReconcileReport,
    },
}

#[derive(Debug, Clone)]
pub struct ChartView {
    pub forest: Forest,
    pub source: ChartSource,
    pub records: Vec<StaffRecord>,
}

/// Service for building, rearranging and persisting the chart.
pub struct ChartService {
    records: Arc<dyn RecordStore>,
    layouts: Arc<dyn LayoutStore>,
    builder: OrgTreeBuilder,
    reconcile: bool,
}

impl ChartService {
    pub fn new(records: Arc<dyn RecordStore>, layouts: Arc<dyn LayoutStore>) -> Self {
        Self {
            records,
            layouts,
            builder: OrgTreeBuilder::new(),
            reconcile: true,
        }
    }

    /// Whether saved layouts are aligned with roster changes on load.
    pub fn with_reconcile(mut self, enabled: bool) -> Self {
        self.reconcile = enabled;
        self
    }

    fn roster(&self, school_id: &str) -> ApplicationResult<Vec<StaffRecord>> {
        let records = self
            .records
            .list_staff(school_id)
            .with_school_context("list staff", school_id)?;
        if records.is_empty() {
            return Err(ApplicationError::NoRoster(school_id.to_string()));
        }
        Ok(records)
    }

    /// Current chart for a school.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, school_id: &str) -> ApplicationResult<ChartView> {
        let records = self.roster(school_id)?;
        let saved = self
            .layouts
            .get_layout(school_id)
            .with_school_context("load layout", school_id)?;

        let Some(saved) = saved else {
            debug!(school_id, "no saved layout, building from roster");
            let forest = self.builder.build(&records);
            return Ok(ChartView {
                forest,
                source: ChartSource::Computed,
                records,
            });
        };

        let stale = saved.roster_fingerprint != roster_fingerprint(&records);
        if stale {
            warn!(school_id, updated_at = %saved.updated_at, "roster changed since layout was saved");
        }

        let (forest, report) = if self.reconcile && stale {
            let reconciled = domain::reconcile(&saved.nodes, &records);
            (reconciled.forest, reconciled.report)
        } else {
            (saved.nodes, ReconcileReport::default())
        };

        Ok(ChartView {
            forest,
            source: ChartSource::Layout { stale, report },
            records,
        })
    }

    /// Apply a move to the current chart and save the result as the layout.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(&self, school_id: &str, mv: &Move) -> ApplicationResult<Forest> {
        let view = self.load(school_id)?;
        let forest = domain::move_node(&view.forest, mv)?;
        self.layouts
            .put_layout(school_id, &forest, &roster_fingerprint(&view.records))
            .with_school_context("save layout", school_id)?;
        info!(school_id, node = %mv.node_id, "layout updated");
        Ok(forest)
    }

    /// Save an arbitrary forest as the school's layout.
    pub fn save_layout(&self, school_id: &str, forest: &Forest) -> ApplicationResult<()> {
        let records = self.roster(school_id)?;
        self.layouts
            .put_layout(school_id, forest, &roster_fingerprint(&records))
            .with_school_context("save layout", school_id)
    }

    /// Drop the saved layout so the chart is derived from the roster again.
    pub fn reset(&self, school_id: &str) -> ApplicationResult<bool> {
        let removed = self
            .layouts
            .delete_layout(school_id)
            .with_school_context("delete layout", school_id)?;
        if removed {
            info!(school_id, "layout reset");
        }
        Ok(removed)
    }

    /// Members the tier rules leave out of the chart.
    pub fn orphans(&self, school_id: &str) -> ApplicationResult<Vec<StaffRecord>> {
        let records = self.roster(school_id)?;
        Ok(domain::orphans(&records).into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParentRef, Position};
    use crate::infrastructure::MemoryStore;

    fn setup() -> (Arc<MemoryStore>, ChartService) {
        let store = Arc::new(MemoryStore::new());
        store
            .replace_staff(
                "s",
                &[
                    StaffRecord::new("p", "P", "Office", Position::Principal, "1"),
                    StaffRecord::new("h", "H", "Math", Position::DepartmentHead, "2"),
                    StaffRecord::new("s1", "S1", "Math", Position::Staff, "3"),
                    StaffRecord::new("s2", "S2", "Math", Position::Staff, "4"),
                ],
            )
            .unwrap();
        let svc = ChartService::new(store.clone(), store.clone());
        (store, svc)
    }

    fn swap_staff() -> Move {
        Move {
            node_id: "s1".into(),
            from: ParentRef::node("h"),
            from_index: 0,
            to: ParentRef::node("h"),
            to_index: 1,
        }
    }

    #[test]
    fn given_no_layout_when_loading_then_computed() {
        let (_, svc) = setup();
        let view = svc.load("s").unwrap();
        assert_eq!(view.source, ChartSource::Computed);
        assert_eq!(view.forest[0].id, "p");
    }

    #[test]
    fn given_move_when_loading_again_then_layout_wins() {
        let (_, svc) = setup();
        svc.move_node("s", &swap_staff()).unwrap();

        let view = svc.load("s").unwrap();

        assert!(matches!(view.source, ChartSource::Layout { stale: false, .. }));
        assert_eq!(view.forest[0].children[0].children[0].id, "s2");
    }

    #[test]
    fn given_reset_when_loading_then_computed_again() {
        let (_, svc) = setup();
        svc.move_node("s", &swap_staff()).unwrap();
        assert!(svc.reset("s").unwrap());
        assert!(!svc.reset("s").unwrap());
        assert_eq!(svc.load("s").unwrap().source, ChartSource::Computed);
    }

    #[test]
    fn given_saved_forest_when_loading_then_returned_as_fresh_layout() {
        let (_, svc) = setup();
        let mut forest = svc.load("s").unwrap().forest;
        let head = forest[0].children.remove(0);
        forest.push(head);

        svc.save_layout("s", &forest).unwrap();
        let view = svc.load("s").unwrap();

        assert!(matches!(view.source, ChartSource::Layout { stale: false, .. }));
        assert_eq!(view.forest, forest);
    }

    #[test]
    fn given_empty_roster_when_loading_then_no_roster_error() {
        let svc = ChartService::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()));
        assert!(matches!(svc.load("none"), Err(ApplicationError::NoRoster(_))));
    }

    #[test]
    fn given_stale_layout_without_reconcile_when_loading_then_verbatim() {
        let (store, svc) = setup();
        svc.move_node("s", &swap_staff()).unwrap();
        let saved = store.get_layout("s").unwrap().unwrap();
        let mut records = store.list_staff("s").unwrap();
        records.retain(|r| r.id != "s2");
        store.replace_staff("s", &records).unwrap();

        let svc = svc.with_reconcile(false);
        let view = svc.load("s").unwrap();

        assert!(matches!(view.source, ChartSource::Layout { stale: true, .. }));
        assert_eq!(view.forest, saved.nodes);
    }
}
