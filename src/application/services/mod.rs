//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on store boundary traits (RecordStore, LayoutStore)
//! but are themselves concrete structs, not traits.

mod chart;
mod roster;

pub use chart::{ChartService, ChartSource, ChartView};
pub use roster::RosterService;
