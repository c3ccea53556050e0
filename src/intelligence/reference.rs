use std::path::Path;

use crate::models::{Doctor, Specialty};

use super::types::TriageError;

pub const DOCTORS_FILE: &str = "doctors.json";

/// Static specialty → doctor table consulted by doctor assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorDirectory {
    pub doctors: Vec<Doctor>,
}

impl DoctorDirectory {
    pub fn new(doctors: Vec<Doctor>) -> Self {
        Self { doctors }
    }

    /// Load the directory from `doctors.json` in the resources directory.
    pub fn load(resources_dir: &Path) -> Result<Self, TriageError> {
        let path = resources_dir.join(DOCTORS_FILE);
        let json = std::fs::read_to_string(&path).map_err(|e| {
            TriageError::CatalogLoad(path.display().to_string(), e.to_string())
        })?;
        let doctors: Vec<Doctor> = serde_json::from_str(&json)
            .map_err(|e| TriageError::CatalogParse(DOCTORS_FILE.into(), e.to_string()))?;

        Ok(Self { doctors })
    }

    /// Load `doctors.json` when present, otherwise the built-in staff list.
    pub fn load_or_builtin(resources_dir: &Path) -> Result<Self, TriageError> {
        if resources_dir.join(DOCTORS_FILE).exists() {
            let directory = Self::load(resources_dir)?;
            tracing::info!(
                doctors = directory.doctors.len(),
                "Loaded doctor directory override"
            );
            Ok(directory)
        } else {
            Ok(Self::builtin())
        }
    }

    /// The hospital's staff, one doctor per specialty.
    pub fn builtin() -> Self {
        Self::new(vec![
            doctor("Dr. Sarah Johnson", Specialty::Cardiology, 150),
            doctor("Dr. Michael Chen", Specialty::Neurology, 140),
            doctor("Dr. Emily Davis", Specialty::GeneralMedicine, 100),
            doctor("Dr. Robert Lee", Specialty::Pediatrics, 120),
            doctor("Dr. Anna Martinez", Specialty::Orthopedics, 130),
            doctor("Dr. James Wilson", Specialty::Pulmonology, 145),
            doctor("Dr. Linda Sophia", Specialty::Gastroenterology, 135),
            doctor("Dr. Kevin Park", Specialty::Dermatology, 110),
        ])
    }

    /// First doctor listed for a specialty.
    pub fn for_specialty(&self, specialty: Specialty) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.specialty == specialty)
    }
}

fn doctor(name: &str, specialty: Specialty, hourly_rate: u32) -> Doctor {
    Doctor {
        name: name.into(),
        specialty,
        hourly_rate,
    }
}
