use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::{AgeClass, RiskFactor, Specialty, UrgencyLevel};
use super::patient::PatientId;

/// Urgency tag plus numeric priority (0..=10, higher is more urgent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Urgency {
    pub level: UrgencyLevel,
    pub priority: u8,
}

impl Urgency {
    pub fn new(level: UrgencyLevel, priority: u8) -> Self {
        Self { level, priority }
    }
}

/// Composite result of one diagnosis request.
///
/// Every field except `doctor` may be absent; absence means no clause of
/// that family matched, never a sentinel value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub patient_id: PatientId,
    pub urgency: Option<Urgency>,
    pub specialty: Option<Specialty>,
    pub disease: Option<String>,
    pub doctor: String,
    pub diagnosed_at: NaiveDateTime,
}

/// Derived age and risk flags for one patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub age_class: Option<AgeClass>,
    pub is_child: bool,
    pub is_elderly: bool,
    pub is_high_risk: bool,
    pub factors: Vec<RiskFactor>,
}
