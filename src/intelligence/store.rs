use std::collections::HashMap;

use crate::models::{Gender, PatientFacts, PatientId, Symptom};

use super::types::TriageError;

/// In-memory fact store keyed by patient, backed by RwLock.
///
/// Every mutation takes the write lock for its whole duration, so
/// `clear_patient` is atomic and a `snapshot` never mixes pre- and
/// post-mutation state for a patient.
pub struct FactStore {
    pub(crate) patients: std::sync::RwLock<HashMap<PatientId, PatientFacts>>,
}

impl FactStore {
    pub fn new() -> Self {
        Self {
            patients: std::sync::RwLock::new(HashMap::new()),
        }
    }

    /// Insert a symptom into the patient's set. Creates the patient on first fact.
    pub fn add_symptom(&self, patient: &PatientId, symptom: Symptom) -> Result<(), TriageError> {
        let mut patients = self
            .patients
            .write()
            .map_err(|_| TriageError::LockFailed)?;

        let inserted = patients
            .entry(patient.clone())
            .or_default()
            .insert_symptom(symptom);

        if !inserted {
            tracing::debug!(
                patient = %patient,
                symptom = symptom.as_str(),
                "Symptom already recorded, skipping"
            );
        }

        Ok(())
    }

    /// Overwrite the patient's age. Rejected before any state change when negative.
    pub fn set_age(&self, patient: &PatientId, age: i64) -> Result<(), TriageError> {
        if age < 0 {
            return Err(TriageError::InvalidFact(format!(
                "age must be a non-negative integer, got {age}"
            )));
        }
        let age = u32::try_from(age)
            .map_err(|_| TriageError::InvalidFact(format!("age {age} is out of range")))?;

        let mut patients = self
            .patients
            .write()
            .map_err(|_| TriageError::LockFailed)?;
        patients.entry(patient.clone()).or_default().age = Some(age);

        Ok(())
    }

    pub fn set_gender(&self, patient: &PatientId, gender: Gender) -> Result<(), TriageError> {
        let mut patients = self
            .patients
            .write()
            .map_err(|_| TriageError::LockFailed)?;
        patients.entry(patient.clone()).or_default().gender = Some(gender);

        Ok(())
    }

    /// Remove symptoms, age and gender for the patient in one step.
    pub fn clear_patient(&self, patient: &PatientId) -> Result<(), TriageError> {
        let mut patients = self
            .patients
            .write()
            .map_err(|_| TriageError::LockFailed)?;

        if patients.remove(patient).is_some() {
            tracing::debug!(patient = %patient, "Patient facts cleared");
        }

        Ok(())
    }

    /// Symptoms in insertion order; empty for an unknown patient.
    pub fn symptoms(&self, patient: &PatientId) -> Result<Vec<Symptom>, TriageError> {
        let patients = self.patients.read().map_err(|_| TriageError::LockFailed)?;

        Ok(patients
            .get(patient)
            .map(|facts| facts.symptoms.clone())
            .unwrap_or_default())
    }

    pub fn age(&self, patient: &PatientId) -> Result<Option<u32>, TriageError> {
        let patients = self.patients.read().map_err(|_| TriageError::LockFailed)?;
        Ok(patients.get(patient).and_then(|facts| facts.age))
    }

    pub fn gender(&self, patient: &PatientId) -> Result<Option<Gender>, TriageError> {
        let patients = self.patients.read().map_err(|_| TriageError::LockFailed)?;
        Ok(patients.get(patient).and_then(|facts| facts.gender))
    }

    /// Consistent copy of everything recorded for the patient.
    /// Unknown patients yield empty facts.
    pub fn snapshot(&self, patient: &PatientId) -> Result<PatientFacts, TriageError> {
        let patients = self.patients.read().map_err(|_| TriageError::LockFailed)?;
        Ok(patients.get(patient).cloned().unwrap_or_default())
    }

    /// Number of patients with at least one recorded fact.
    pub fn patient_count(&self) -> Result<usize, TriageError> {
        let patients = self.patients.read().map_err(|_| TriageError::LockFailed)?;
        Ok(patients.len())
    }
}

impl Default for FactStore {
    fn default() -> Self {
        Self::new()
    }
}
