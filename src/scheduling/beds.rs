use std::sync::RwLock;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{Gender, PatientId, Specialty, Urgency, UrgencyLevel};

use super::SchedulingError;

// ---------------------------------------------------------------------------
// Beds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ward {
    Icu,
    General,
    Isolation,
    Pediatric,
}

impl Ward {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Icu => "icu",
            Self::General => "general",
            Self::Isolation => "isolation",
            Self::Pediatric => "pediatric",
        }
    }

    /// General and isolation beds share one allocation pool.
    pub fn is_general_pool(&self) -> bool {
        matches!(self, Self::General | Self::Isolation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bed {
    pub id: String,
    pub ward: Ward,
    /// Only patients of this gender may take the bed. `None` admits anyone.
    pub gender: Option<Gender>,
    pub available: bool,
    /// Patient placed here by `allocate`. Beds taken out of service start
    /// unavailable with no occupant.
    pub occupant: Option<PatientId>,
}

impl Bed {
    pub fn new(id: &str, ward: Ward) -> Self {
        Self {
            id: id.to_string(),
            ward,
            gender: None,
            available: true,
            occupant: None,
        }
    }

    pub fn restricted_to(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn occupied(mut self) -> Self {
        self.available = false;
        self
    }

    fn admits(&self, gender: Option<Gender>) -> bool {
        match self.gender {
            None => true,
            Some(required) => gender == Some(required),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests and results
// ---------------------------------------------------------------------------

/// Inputs to bed allocation, assembled from one patient's facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionRequest {
    pub patient_id: PatientId,
    pub urgency: Option<Urgency>,
    pub specialty: Option<Specialty>,
    pub is_child: bool,
    pub gender: Option<Gender>,
}

impl AdmissionRequest {
    fn is_emergency(&self) -> bool {
        self.urgency.map(|u| u.level) == Some(UrgencyLevel::Emergency)
    }

    fn needs_pediatric(&self) -> bool {
        self.is_child || self.specialty == Some(Specialty::Pediatrics)
    }
}

/// Expected length of stay, in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayEstimate {
    pub min_days: u8,
    pub max_days: u8,
}

impl StayEstimate {
    pub fn for_request(request: &AdmissionRequest) -> Self {
        if request.is_emergency() {
            Self {
                min_days: 3,
                max_days: 5,
            }
        } else {
            Self {
                min_days: 1,
                max_days: 2,
            }
        }
    }
}

/// Outcome of an allocation. No bed means the patient was wait-listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedAllocation {
    pub patient_id: PatientId,
    pub bed_id: Option<String>,
    pub ward: Option<Ward>,
    pub assigned_at: NaiveDateTime,
    pub estimated_stay: StayEstimate,
}

impl BedAllocation {
    pub fn is_wait_listed(&self) -> bool {
        self.bed_id.is_none()
    }
}

// ---------------------------------------------------------------------------
// BedRegistry
// ---------------------------------------------------------------------------

struct RegistryState {
    beds: Vec<Bed>,
    wait_list: Vec<PatientId>,
}

/// Hospital beds plus the admission wait list, behind one RwLock.
pub struct BedRegistry {
    state: RwLock<RegistryState>,
}

impl BedRegistry {
    pub fn new(beds: Vec<Bed>) -> Self {
        Self {
            state: RwLock::new(RegistryState {
                beds,
                wait_list: Vec::new(),
            }),
        }
    }

    /// The hospital's ward layout.
    pub fn hospital_default() -> Self {
        Self::new(vec![
            Bed::new("ICU-1", Ward::Icu),
            Bed::new("ICU-2", Ward::Icu),
            Bed::new("ICU-3", Ward::Icu).occupied(),
            Bed::new("GW-201", Ward::General).restricted_to(Gender::Male),
            Bed::new("GW-202", Ward::General).restricted_to(Gender::Female),
            Bed::new("ISO-101", Ward::Isolation),
            Bed::new("PED-1", Ward::Pediatric),
            Bed::new("PED-2", Ward::Pediatric),
        ])
    }

    /// Apply the admission constraints in order and take the first bed that fits:
    /// emergencies go to ICU, children and pediatric cases to the pediatric
    /// ward, everyone else to a general bed admitting their gender.
    /// A patient holds at most one bed at a time.
    pub fn allocate(&self, request: &AdmissionRequest) -> Result<BedAllocation, SchedulingError> {
        let mut state = self.state.write().map_err(|_| SchedulingError::LockFailed)?;

        if let Some(held) = state
            .beds
            .iter()
            .find(|b| b.occupant.as_ref() == Some(&request.patient_id))
        {
            return Err(SchedulingError::AlreadyAdmitted(
                request.patient_id.to_string(),
                held.id.clone(),
            ));
        }

        let fits = |bed: &Bed| -> bool {
            if !bed.available {
                return false;
            }
            if request.is_emergency() {
                bed.ward == Ward::Icu
            } else if request.needs_pediatric() {
                bed.ward == Ward::Pediatric
            } else {
                bed.ward.is_general_pool() && bed.admits(request.gender)
            }
        };

        let chosen = state.beds.iter_mut().find(|bed| fits(bed)).map(|bed| {
            bed.available = false;
            bed.occupant = Some(request.patient_id.clone());
            (bed.id.clone(), bed.ward)
        });

        let (bed_id, ward) = match chosen {
            Some((id, ward)) => {
                state.wait_list.retain(|p| p != &request.patient_id);
                tracing::info!(
                    patient = %request.patient_id,
                    bed = %id,
                    ward = ward.as_str(),
                    "Bed allocated"
                );
                (Some(id), Some(ward))
            }
            None => {
                if !state.wait_list.contains(&request.patient_id) {
                    state.wait_list.push(request.patient_id.clone());
                }
                tracing::warn!(
                    patient = %request.patient_id,
                    waiting = state.wait_list.len(),
                    "No suitable bed, patient wait-listed"
                );
                (None, None)
            }
        };

        Ok(BedAllocation {
            patient_id: request.patient_id.clone(),
            bed_id,
            ward,
            assigned_at: chrono::Local::now().naive_local(),
            estimated_stay: StayEstimate::for_request(request),
        })
    }

    /// Return an allocated bed to the pool.
    pub fn release(&self, bed_id: &str) -> Result<(), SchedulingError> {
        let mut state = self.state.write().map_err(|_| SchedulingError::LockFailed)?;

        let bed = state
            .beds
            .iter_mut()
            .find(|b| b.id == bed_id)
            .ok_or_else(|| SchedulingError::BedNotFound(bed_id.to_string()))?;

        if bed.available {
            return Err(SchedulingError::BedNotAllocated(bed_id.to_string()));
        }
        bed.available = true;
        bed.occupant = None;

        tracing::debug!(bed = bed_id, "Bed released");
        Ok(())
    }

    /// Id of the bed the patient currently holds.
    pub fn bed_of(&self, patient: &PatientId) -> Result<Option<String>, SchedulingError> {
        let state = self.state.read().map_err(|_| SchedulingError::LockFailed)?;
        Ok(state
            .beds
            .iter()
            .find(|b| b.occupant.as_ref() == Some(patient))
            .map(|b| b.id.clone()))
    }

    pub fn beds(&self) -> Result<Vec<Bed>, SchedulingError> {
        let state = self.state.read().map_err(|_| SchedulingError::LockFailed)?;
        Ok(state.beds.clone())
    }

    pub fn available_in(&self, ward: Ward) -> Result<usize, SchedulingError> {
        let state = self.state.read().map_err(|_| SchedulingError::LockFailed)?;
        Ok(state
            .beds
            .iter()
            .filter(|b| b.ward == ward && b.available)
            .count())
    }

    /// Wait-listed patients in arrival order.
    pub fn wait_list(&self) -> Result<Vec<PatientId>, SchedulingError> {
        let state = self.state.read().map_err(|_| SchedulingError::LockFailed)?;
        Ok(state.wait_list.clone())
    }
}

impl Default for BedRegistry {
    fn default() -> Self {
        Self::hospital_default()
    }
}
