//! Staff roster service
//!
//! A roster is always submitted as a whole and replaces the stored one.

use std::collections::HashSet;
use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{DomainError, StaffRecord};
use crate::infrastructure::traits::RecordStore;

/// Service for reading and replacing a school's roster.
pub struct RosterService {
    records: Arc<dyn RecordStore>,
}

impl RosterService {
    /// Create a new roster service.
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Roster in tier order; members of the same tier keep their stored order.
    #[instrument(level = "debug", skip(self))]
    pub fn list(&self, school_id: &str) -> ApplicationResult<Vec<StaffRecord>> {
        let records = self
            .records
            .list_staff(school_id)
            .with_school_context("list staff", school_id)?;
        Ok(records
            .into_iter()
            .sorted_by_key(|r| r.position)
            .collect())
    }

    /// Validate and store a complete roster, replacing the previous one.
    ///
    /// Records without an id get a fresh one. Returns the stored records.
    #[instrument(level = "debug", skip(self, records), fields(count = records.len()))]
    pub fn replace(
        &self,
        school_id: &str,
        records: Vec<StaffRecord>,
    ) -> ApplicationResult<Vec<StaffRecord>> {
        let records = Self::prepare(records)?;
        self.records
            .replace_staff(school_id, &records)
            .with_school_context("replace staff", school_id)?;
        info!(school_id, count = records.len(), "roster replaced");
        Ok(records)
    }

    /// Append one member to the stored roster.
    #[instrument(level = "debug", skip(self, record), fields(name = %record.name))]
    pub fn add(&self, school_id: &str, record: StaffRecord) -> ApplicationResult<StaffRecord> {
        let mut records = self
            .records
            .list_staff(school_id)
            .with_school_context("list staff", school_id)?;
        records.push(record);
        let mut stored = self.replace(school_id, records)?;
        // prepare() keeps order, so the new member is last
        stored.pop().ok_or_else(|| ApplicationError::OperationFailed {
            context: format!("add staff: school {school_id}"),
            source: "stored roster is empty".into(),
        })
    }

    /// Remove every member of the roster.
    pub fn clear(&self, school_id: &str) -> ApplicationResult<()> {
        self.records
            .replace_staff(school_id, &[])
            .with_school_context("clear staff", school_id)
    }

    fn prepare(records: Vec<StaffRecord>) -> ApplicationResult<Vec<StaffRecord>> {
        let mut seen = HashSet::new();
        let mut prepared = Vec::with_capacity(records.len());

        for (index, mut record) in records.into_iter().enumerate() {
            record.validate(index)?;
            record.name = record.name.trim().to_string();
            record.department = record.department.trim().to_string();
            record.contact = record.contact.trim().to_string();

            if record.id.trim().is_empty() {
                record.id = Uuid::new_v4().to_string();
                debug!(index, id = %record.id, "assigned id");
            }
            if !seen.insert(record.id.clone()) {
                return Err(DomainError::DuplicateId(record.id).into());
            }
            prepared.push(record);
        }
        Ok(prepared)
    }
}
