use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Gender;
use super::symptom::Symptom;

/// Opaque patient identifier. Any caller-chosen string; `generate` mints a fresh UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PatientId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Observations recorded for one patient.
///
/// Symptoms behave as a set: re-inserting a symptom is a no-op. Insertion
/// order is kept so listings are stable. A default value is exactly what an
/// unknown patient looks like.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientFacts {
    pub symptoms: Vec<Symptom>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
}

impl PatientFacts {
    /// Returns false when the symptom was already recorded.
    pub fn insert_symptom(&mut self, symptom: Symptom) -> bool {
        if self.has_symptom(symptom) {
            return false;
        }
        self.symptoms.push(symptom);
        true
    }

    pub fn has_symptom(&self, symptom: Symptom) -> bool {
        self.symptoms.contains(&symptom)
    }

    pub fn has_any_symptom(&self) -> bool {
        !self.symptoms.is_empty()
    }

    pub fn symptom_count(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty() && self.age.is_none() && self.gender.is_none()
    }
}
