use serde::{Deserialize, Serialize};

use super::enums::Specialty;

/// A staff doctor as listed in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub name: String,
    pub specialty: Specialty,
    pub hourly_rate: u32,
}

/// How the doctor-assignment family produced its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentSource {
    /// Resolved specialty had a directory entry.
    Specialty(Specialty),
    /// Primary clause failed; the default doctor was committed.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorAssignment {
    pub doctor: String,
    pub source: AssignmentSource,
}

impl DoctorAssignment {
    pub fn is_fallback(&self) -> bool {
        self.source == AssignmentSource::Fallback
    }
}
