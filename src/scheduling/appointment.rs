use chrono::{Days, Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{Diagnosis, PatientId, Specialty, UrgencyLevel};

/// Room used when the specialty has no dedicated one.
pub const DEFAULT_ROOM: &str = "OPD-10";

/// Hour of the first routine slot on the following day.
const ROUTINE_START_HOUR: i64 = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentPlan {
    pub patient_id: PatientId,
    pub doctor: String,
    pub specialty: Option<Specialty>,
    pub room: String,
    pub starts_at: NaiveDateTime,
    pub duration_minutes: u32,
    pub urgency: Option<UrgencyLevel>,
}

impl AppointmentPlan {
    pub fn ends_at(&self) -> NaiveDateTime {
        self.starts_at + Duration::minutes(i64::from(self.duration_minutes))
    }
}

/// Consultation room for a specialty.
pub fn room_for(specialty: Option<Specialty>) -> &'static str {
    match specialty {
        Some(Specialty::Cardiology) => "CCU-201",
        Some(Specialty::Neurology) => "Neuro-305",
        Some(Specialty::Pediatrics) => "Pediatric-102",
        Some(Specialty::GeneralMedicine) => "OPD-15",
        Some(Specialty::Orthopedics) => "Ortho-204",
        _ => DEFAULT_ROOM,
    }
}

/// Slot start and length for an urgency level.
/// Low or unknown urgency waits for the next morning's routine slots.
fn slot_for(urgency: Option<UrgencyLevel>, now: NaiveDateTime) -> (NaiveDateTime, u32) {
    match urgency {
        Some(UrgencyLevel::Emergency) => (now + Duration::minutes(15), 60),
        Some(UrgencyLevel::High) => (now + Duration::hours(1), 45),
        Some(UrgencyLevel::Medium) => (now + Duration::hours(3), 30),
        Some(UrgencyLevel::Low) | None => {
            let next_day = now.date() + Days::new(1);
            let start = next_day.and_time(NaiveTime::MIN) + Duration::hours(ROUTINE_START_HOUR);
            (start, 30)
        }
    }
}

pub fn plan_appointment(diagnosis: &Diagnosis, now: NaiveDateTime) -> AppointmentPlan {
    let urgency = diagnosis.urgency.map(|u| u.level);
    let (starts_at, duration_minutes) = slot_for(urgency, now);

    let plan = AppointmentPlan {
        patient_id: diagnosis.patient_id.clone(),
        doctor: diagnosis.doctor.clone(),
        specialty: diagnosis.specialty,
        room: room_for(diagnosis.specialty).to_string(),
        starts_at,
        duration_minutes,
        urgency,
    };

    tracing::info!(
        patient = %plan.patient_id,
        room = %plan.room,
        starts_at = %plan.starts_at,
        duration_minutes = plan.duration_minutes,
        "Appointment planned"
    );

    plan
}
