//! Domain entities: staff records and position tiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Position tier of a staff member.
///
/// Variants are declared in precedence order, so the derived `Ord`
/// is the tier order: principal < vice_principal < department_head < staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Principal,
    VicePrincipal,
    DepartmentHead,
    Staff,
}

impl Position {
    /// All tiers in precedence order.
    pub const ALL: [Position; 4] = [
        Position::Principal,
        Position::VicePrincipal,
        Position::DepartmentHead,
        Position::Staff,
    ];

    /// Storage key, e.g. `vice_principal`.
    pub fn key(self) -> &'static str {
        match self {
            Position::Principal => "principal",
            Position::VicePrincipal => "vice_principal",
            Position::DepartmentHead => "department_head",
            Position::Staff => "staff",
        }
    }

    /// Label printed on the chart.
    pub fn label(self) -> &'static str {
        match self {
            Position::Principal => "교장",
            Position::VicePrincipal => "교감",
            Position::DepartmentHead => "부서장",
            Position::Staff => "부원",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Position {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Position::ALL
            .into_iter()
            .find(|p| p.key() == normalized)
            .ok_or_else(|| DomainError::UnknownPosition(s.to_string()))
    }
}

/// A single member of a school's roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffRecord {
    /// Opaque identifier, stable across roster replacements
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Free-text label linking staff to their department head
    pub department: String,
    pub position: Position,
    pub contact: String,
}

impl StaffRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<String>,
        position: Position,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            department: department.into(),
            position,
            contact: contact.into(),
        }
    }

    /// Check required fields. `index` is the record's position in the
    /// submitted roster and is only used for the error message.
    pub fn validate(&self, index: usize) -> DomainResult<()> {
        let required = [
            ("name", &self.name),
            ("department", &self.department),
            ("contact", &self.contact),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DomainError::InvalidRecord { index, field });
            }
        }
        Ok(())
    }
}

impl fmt::Display for StaffRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}) {}",
            self.position.label(),
            self.name,
            self.department,
            self.contact
        )
    }
}
