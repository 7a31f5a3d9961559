//! schoolnet: school staff roster and emergency-contact organization chart.
//!
//! The chart is derived from the roster by position tier and department
//! ([`domain::builder`]), can be rearranged by hand ([`domain::reorder`]) and
//! the arrangement is persisted as a layout that overrides the derived chart
//! ([`application::services::ChartService`]).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
