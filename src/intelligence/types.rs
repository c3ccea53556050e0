use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    AgeClass, Diagnosis, DoctorAssignment, Gender, ModelError, PatientId, RiskProfile,
    Specialty, Symptom, Urgency,
};

// ---------------------------------------------------------------------------
// Family
// ---------------------------------------------------------------------------

/// A predicate family: every clause that can answer one output category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Urgency,
    Specialty,
    Disease,
    Doctor,
    Risk,
    AgeClass,
}

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgency => "urgency",
            Self::Specialty => "specialty",
            Self::Disease => "disease",
            Self::Doctor => "doctor",
            Self::Risk => "risk",
            Self::AgeClass => "age_class",
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Clause
// ---------------------------------------------------------------------------

/// One conjunct of a clause body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    HasSymptom(Symptom),
    /// At least one symptom recorded.
    HasAnySymptom,
    /// Age recorded and strictly below the threshold.
    AgeBelow(u32),
    /// Age recorded and at or above the threshold.
    AgeAtLeast(u32),
    /// Delegates to the age-class family; holds when it resolves to this class.
    AgeClassIs(AgeClass),
}

/// A compiled rule alternative. `position` is the declaration index inside
/// its family and doubles as match priority.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause<T> {
    pub position: usize,
    pub body: Vec<Condition>,
    pub result: T,
}

impl<T> Clause<T> {
    pub fn is_unconditional(&self) -> bool {
        self.body.is_empty()
    }
}

/// The doctor-assignment family: position 0 delegates to specialty and the
/// directory, position 1 is the unconditional default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorRules {
    pub default_doctor: String,
}

// ---------------------------------------------------------------------------
// TriageError
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Invalid fact: {0}")]
    InvalidFact(String),

    #[error("Malformed clause {family}#{position}: {reason}")]
    MalformedClause {
        family: Family,
        position: usize,
        reason: String,
    },

    #[error("Reference data load failed ({0}): {1}")]
    CatalogLoad(String, String),

    #[error("Reference data parse failed ({0}): {1}")]
    CatalogParse(String, String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Internal lock failed")]
    LockFailed,
}

// ---------------------------------------------------------------------------
// TriageEngine trait
// ---------------------------------------------------------------------------

/// Fact mutation plus rule resolution for individual patients.
pub trait TriageEngine {
    /// Record a symptom. Recording the same symptom twice is a no-op.
    fn add_symptom(&self, patient: &PatientId, symptom: Symptom) -> Result<(), TriageError>;

    /// Overwrite the patient's age. Negative ages are rejected.
    fn set_age(&self, patient: &PatientId, age: i64) -> Result<(), TriageError>;

    fn set_gender(&self, patient: &PatientId, gender: Gender) -> Result<(), TriageError>;

    /// Drop every fact recorded for the patient.
    fn clear_patient(&self, patient: &PatientId) -> Result<(), TriageError>;

    /// Recorded symptoms in insertion order.
    fn all_symptoms(&self, patient: &PatientId) -> Result<Vec<Symptom>, TriageError>;

    fn count_symptoms(&self, patient: &PatientId) -> Result<usize, TriageError>;

    fn resolve_urgency(&self, patient: &PatientId) -> Result<Option<Urgency>, TriageError>;

    fn resolve_specialty(&self, patient: &PatientId) -> Result<Option<Specialty>, TriageError>;

    fn resolve_disease(&self, patient: &PatientId) -> Result<Option<String>, TriageError>;

    /// Never absent: the default doctor covers every patient.
    fn resolve_doctor(&self, patient: &PatientId) -> Result<DoctorAssignment, TriageError>;

    /// Every matching disease label, in declaration order, duplicates kept.
    fn list_all_diseases(&self, patient: &PatientId) -> Result<Vec<String>, TriageError>;

    /// Urgency, specialty, disease and doctor from one fact snapshot.
    fn diagnose(&self, patient: &PatientId) -> Result<Diagnosis, TriageError>;

    fn is_child(&self, patient: &PatientId) -> Result<bool, TriageError>;

    fn is_elderly(&self, patient: &PatientId) -> Result<bool, TriageError>;

    fn is_high_risk(&self, patient: &PatientId) -> Result<bool, TriageError>;

    fn assess_risk(&self, patient: &PatientId) -> Result<RiskProfile, TriageError>;
}
