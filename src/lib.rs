pub mod config;
pub mod intelligence; // Fact store, clause database, resolution
pub mod models;
pub mod scheduling; // Appointment slots, bed allocation

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. `RUST_LOG` wins over the default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::{DefaultTriageEngine, TriageEngine};
    use crate::models::{Gender, PatientId, Symptom, UrgencyLevel};
    use crate::scheduling::{plan_appointment, BedRegistry, Ward};

    #[test]
    fn init_tracing_twice_is_harmless() {
        init_tracing();
        init_tracing();
    }

    /// Diagnosis flows into an appointment and a bed.
    #[test]
    fn triage_to_admission() {
        let engine = DefaultTriageEngine::builtin().unwrap();
        let registry = BedRegistry::hospital_default();
        let patient = PatientId::generate();

        engine.add_symptom(&patient, Symptom::ChestPain).unwrap();
        engine.set_age(&patient, 68).unwrap();
        engine.set_gender(&patient, Gender::Male).unwrap();

        let diagnosis = engine.diagnose(&patient).unwrap();
        let plan = plan_appointment(&diagnosis, diagnosis.diagnosed_at);
        assert_eq!(plan.room, "CCU-201");
        assert_eq!(plan.urgency, Some(UrgencyLevel::Emergency));

        let request = engine.admission_request(&patient).unwrap();
        let allocation = registry.allocate(&request).unwrap();
        assert_eq!(allocation.ward, Some(Ward::Icu));
        assert!(engine.is_high_risk(&patient).unwrap());
    }
}
