use std::path::Path;
use std::time::Instant;

use crate::models::{
    AgeClass, Diagnosis, DoctorAssignment, Gender, PatientId, RiskFactor, RiskProfile, Specialty,
    Symptom, Urgency,
};
use crate::scheduling::AdmissionRequest;

use super::catalog::RuleCatalog;
use super::clauses::ClauseDatabase;
use super::reference::DoctorDirectory;
use super::resolution::Resolver;
use super::store::FactStore;
use super::types::{TriageEngine, TriageError};

/// Default implementation of the triage engine.
/// Owns the mutable fact store plus the read-only clause database and directory.
pub struct DefaultTriageEngine {
    pub(crate) facts: FactStore,
    pub(crate) clauses: ClauseDatabase,
    pub(crate) directory: DoctorDirectory,
}

impl DefaultTriageEngine {
    pub fn new(clauses: ClauseDatabase, directory: DoctorDirectory) -> Self {
        Self {
            facts: FactStore::new(),
            clauses,
            directory,
        }
    }

    /// Engine over the built-in catalog and directory.
    pub fn builtin() -> Result<Self, TriageError> {
        Ok(Self::new(
            ClauseDatabase::builtin()?,
            DoctorDirectory::builtin(),
        ))
    }

    /// Engine over `rules.json` / `doctors.json` when present in the
    /// resources directory, built-ins otherwise.
    pub fn load(resources_dir: &Path) -> Result<Self, TriageError> {
        let catalog = RuleCatalog::load_or_builtin(resources_dir)?;
        let clauses = ClauseDatabase::build(&catalog)?;
        let directory = DoctorDirectory::load_or_builtin(resources_dir)?;
        Ok(Self::new(clauses, directory))
    }

    pub fn clauses(&self) -> &ClauseDatabase {
        &self.clauses
    }

    pub fn directory(&self) -> &DoctorDirectory {
        &self.directory
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.clauses, &self.directory)
    }

    pub fn age_class(&self, patient: &PatientId) -> Result<Option<AgeClass>, TriageError> {
        let facts = self.facts.snapshot(patient)?;
        Ok(self.resolver().age_class(&facts))
    }

    pub fn risk_factors(&self, patient: &PatientId) -> Result<Vec<RiskFactor>, TriageError> {
        let facts = self.facts.snapshot(patient)?;
        Ok(self.resolver().risk_factors(&facts))
    }

    /// Inputs for bed allocation, taken from one fact snapshot.
    pub fn admission_request(&self, patient: &PatientId) -> Result<AdmissionRequest, TriageError> {
        let facts = self.facts.snapshot(patient)?;
        let resolver = self.resolver();

        Ok(AdmissionRequest {
            patient_id: patient.clone(),
            urgency: resolver.urgency(&facts),
            specialty: resolver.specialty(&facts),
            is_child: resolver.age_class(&facts) == Some(AgeClass::Child),
            gender: facts.gender,
        })
    }
}

impl TriageEngine for DefaultTriageEngine {
    fn add_symptom(&self, patient: &PatientId, symptom: Symptom) -> Result<(), TriageError> {
        self.facts.add_symptom(patient, symptom)
    }

    fn set_age(&self, patient: &PatientId, age: i64) -> Result<(), TriageError> {
        self.facts.set_age(patient, age)
    }

    fn set_gender(&self, patient: &PatientId, gender: Gender) -> Result<(), TriageError> {
        self.facts.set_gender(patient, gender)
    }

    fn clear_patient(&self, patient: &PatientId) -> Result<(), TriageError> {
        self.facts.clear_patient(patient)
    }

    fn all_symptoms(&self, patient: &PatientId) -> Result<Vec<Symptom>, TriageError> {
        self.facts.symptoms(patient)
    }

    fn count_symptoms(&self, patient: &PatientId) -> Result<usize, TriageError> {
        Ok(self.facts.symptoms(patient)?.len())
    }

    fn resolve_urgency(&self, patient: &PatientId) -> Result<Option<Urgency>, TriageError> {
        let facts = self.facts.snapshot(patient)?;
        Ok(self.resolver().urgency(&facts))
    }

    fn resolve_specialty(&self, patient: &PatientId) -> Result<Option<Specialty>, TriageError> {
        let facts = self.facts.snapshot(patient)?;
        Ok(self.resolver().specialty(&facts))
    }

    fn resolve_disease(&self, patient: &PatientId) -> Result<Option<String>, TriageError> {
        let facts = self.facts.snapshot(patient)?;
        Ok(self.resolver().disease(&facts))
    }

    fn resolve_doctor(&self, patient: &PatientId) -> Result<DoctorAssignment, TriageError> {
        let facts = self.facts.snapshot(patient)?;
        Ok(self.resolver().doctor(&facts))
    }

    fn list_all_diseases(&self, patient: &PatientId) -> Result<Vec<String>, TriageError> {
        let facts = self.facts.snapshot(patient)?;
        Ok(self.resolver().all_diseases(&facts))
    }

    fn diagnose(&self, patient: &PatientId) -> Result<Diagnosis, TriageError> {
        let start = Instant::now();
        let facts = self.facts.snapshot(patient)?;
        let resolver = self.resolver();

        let diagnosis = Diagnosis {
            patient_id: patient.clone(),
            urgency: resolver.urgency(&facts),
            specialty: resolver.specialty(&facts),
            disease: resolver.disease(&facts),
            doctor: resolver.doctor(&facts).doctor,
            diagnosed_at: chrono::Local::now().naive_local(),
        };

        tracing::info!(
            patient = %patient,
            symptoms = facts.symptom_count(),
            urgency = diagnosis.urgency.map(|u| u.level.as_str()).unwrap_or("none"),
            specialty = diagnosis.specialty.map(|s| s.as_str()).unwrap_or("none"),
            doctor = %diagnosis.doctor,
            processing_us = start.elapsed().as_micros() as u64,
            "Diagnosis complete"
        );

        Ok(diagnosis)
    }

    fn is_child(&self, patient: &PatientId) -> Result<bool, TriageError> {
        Ok(self.age_class(patient)? == Some(AgeClass::Child))
    }

    fn is_elderly(&self, patient: &PatientId) -> Result<bool, TriageError> {
        Ok(self.age_class(patient)? == Some(AgeClass::Elderly))
    }

    fn is_high_risk(&self, patient: &PatientId) -> Result<bool, TriageError> {
        Ok(!self.risk_factors(patient)?.is_empty())
    }

    fn assess_risk(&self, patient: &PatientId) -> Result<RiskProfile, TriageError> {
        let facts = self.facts.snapshot(patient)?;
        let resolver = self.resolver();
        let age_class = resolver.age_class(&facts);
        let factors = resolver.risk_factors(&facts);

        Ok(RiskProfile {
            age_class,
            is_child: age_class == Some(AgeClass::Child),
            is_elderly: age_class == Some(AgeClass::Elderly),
            is_high_risk: !factors.is_empty(),
            factors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::catalog::RULES_FILE;
    use crate::intelligence::types::Family;
    use crate::models::{AssignmentSource, UrgencyLevel};

    fn engine() -> DefaultTriageEngine {
        DefaultTriageEngine::builtin().unwrap()
    }

    fn patient_with(engine: &DefaultTriageEngine, id: &str, symptoms: &[Symptom]) -> PatientId {
        let patient = PatientId::from(id);
        for symptom in symptoms {
            engine.add_symptom(&patient, *symptom).unwrap();
        }
        patient
    }

    /// Chest pain alone: emergency cardiology.
    #[test]
    fn scenario_chest_pain() {
        let engine = engine();
        let patient = patient_with(&engine, "a", &[Symptom::ChestPain]);

        let diagnosis = engine.diagnose(&patient).unwrap();
        assert_eq!(
            diagnosis.urgency,
            Some(Urgency::new(UrgencyLevel::Emergency, 10))
        );
        assert_eq!(diagnosis.specialty, Some(Specialty::Cardiology));
        assert_eq!(diagnosis.disease.as_deref(), Some("Possible Cardiac Event"));
        assert_eq!(diagnosis.doctor, "Dr. Sarah Johnson");
        assert_eq!(diagnosis.patient_id, patient);
    }

    /// A child with no symptoms still gets an age-based triage.
    #[test]
    fn scenario_child_without_symptoms() {
        let engine = engine();
        let patient = PatientId::from("b");
        engine.set_age(&patient, 10).unwrap();

        let diagnosis = engine.diagnose(&patient).unwrap();
        assert_eq!(diagnosis.urgency, Some(Urgency::new(UrgencyLevel::Medium, 6)));
        assert_eq!(diagnosis.specialty, Some(Specialty::Pediatrics));
        assert_eq!(diagnosis.disease.as_deref(), Some("Pediatric Consultation"));
        assert_eq!(diagnosis.doctor, "Dr. Robert Lee");
    }

    /// The three-symptom clause is declared before the two-symptom one.
    #[test]
    fn scenario_pneumonia_beats_respiratory_infection() {
        let engine = engine();
        let patient = patient_with(
            &engine,
            "c",
            &[Symptom::Fever, Symptom::Cough, Symptom::ShortnessOfBreath],
        );

        assert_eq!(
            engine.resolve_disease(&patient).unwrap().as_deref(),
            Some("Pneumonia")
        );
        let all = engine.list_all_diseases(&patient).unwrap();
        assert_eq!(all[0], "Pneumonia");
        assert!(all.contains(&"Respiratory Infection".to_string()));
    }

    /// No facts at all: only the default doctor.
    #[test]
    fn scenario_empty_patient() {
        let engine = engine();
        let patient = PatientId::from("d");

        let diagnosis = engine.diagnose(&patient).unwrap();
        assert_eq!(diagnosis.urgency, None);
        assert_eq!(diagnosis.specialty, None);
        assert_eq!(diagnosis.disease, None);
        assert_eq!(diagnosis.doctor, "Dr. Emily Davis");
        assert!(engine.resolve_doctor(&patient).unwrap().is_fallback());
    }

    #[test]
    fn scenario_arthritis() {
        let engine = engine();
        let patient = patient_with(&engine, "e", &[Symptom::JointPain, Symptom::Stiffness]);

        let diagnosis = engine.diagnose(&patient).unwrap();
        assert_eq!(diagnosis.disease.as_deref(), Some("Arthritis"));
        assert_eq!(diagnosis.specialty, Some(Specialty::Orthopedics));
        assert_eq!(diagnosis.urgency, Some(Urgency::new(UrgencyLevel::Low, 3)));
        assert_eq!(diagnosis.doctor, "Dr. Anna Martinez");
    }

    #[test]
    fn duplicate_symptom_leaves_count_unchanged() {
        let engine = engine();
        let patient = patient_with(&engine, "p", &[Symptom::Fever, Symptom::Cough]);
        let before = engine.count_symptoms(&patient).unwrap();

        engine.add_symptom(&patient, Symptom::Fever).unwrap();

        assert_eq!(engine.count_symptoms(&patient).unwrap(), before);
        assert_eq!(
            engine.all_symptoms(&patient).unwrap(),
            vec![Symptom::Fever, Symptom::Cough]
        );
    }

    #[test]
    fn cleared_patient_matches_never_seen_patient() {
        let engine = engine();
        let patient = patient_with(&engine, "p", &[Symptom::ChestPain, Symptom::Seizure]);
        engine.set_age(&patient, 72).unwrap();
        engine.set_gender(&patient, Gender::Male).unwrap();

        engine.clear_patient(&patient).unwrap();

        let fresh = PatientId::generate();
        let cleared = engine.diagnose(&patient).unwrap();
        let never_seen = engine.diagnose(&fresh).unwrap();
        assert_eq!(cleared.urgency, never_seen.urgency);
        assert_eq!(cleared.specialty, never_seen.specialty);
        assert_eq!(cleared.disease, never_seen.disease);
        assert_eq!(cleared.doctor, never_seen.doctor);
        assert_eq!(
            engine.assess_risk(&patient).unwrap(),
            engine.assess_risk(&fresh).unwrap()
        );
        assert_eq!(engine.count_symptoms(&patient).unwrap(), 0);
    }

    #[test]
    fn negative_age_is_invalid_fact() {
        let engine = engine();
        let patient = PatientId::from("p");
        assert!(matches!(
            engine.set_age(&patient, -3),
            Err(TriageError::InvalidFact(_))
        ));
        assert_eq!(engine.resolve_urgency(&patient).unwrap(), None);
    }

    /// Resolving one family never changes another family's answer.
    #[test]
    fn families_resolve_independently() {
        let engine = engine();
        let patient = patient_with(
            &engine,
            "p",
            &[Symptom::Wheezing, Symptom::ShortnessOfBreath, Symptom::Rash],
        );

        let disease_first = engine.resolve_disease(&patient).unwrap();
        let specialty_after = engine.resolve_specialty(&patient).unwrap();
        let specialty_first = engine.resolve_specialty(&patient).unwrap();
        let disease_after = engine.resolve_disease(&patient).unwrap();

        assert_eq!(disease_first, disease_after);
        assert_eq!(specialty_first, specialty_after);
        assert_eq!(specialty_first, Some(Specialty::Pulmonology));
        assert_eq!(disease_first.as_deref(), Some("Asthma"));

        let diagnosis = engine.diagnose(&patient).unwrap();
        assert_eq!(diagnosis.specialty, specialty_first);
        assert_eq!(diagnosis.disease, disease_first);
    }

    #[test]
    fn doctor_is_never_absent() {
        let engine = engine();
        for (i, symptom) in Symptom::ALL.iter().enumerate() {
            let patient = patient_with(&engine, &format!("p{i}"), &[*symptom]);
            let assignment = engine.resolve_doctor(&patient).unwrap();
            assert!(!assignment.doctor.is_empty());
            assert!(engine.resolve_urgency(&patient).unwrap().is_some());
        }
        let nobody = PatientId::from("nobody");
        assert!(!engine.resolve_doctor(&nobody).unwrap().doctor.is_empty());
    }

    #[test]
    fn specialty_match_reports_source() {
        let engine = engine();
        let patient = patient_with(&engine, "p", &[Symptom::AbdominalPain]);
        let assignment = engine.resolve_doctor(&patient).unwrap();
        assert_eq!(assignment.doctor, "Dr. Linda Sophia");
        assert_eq!(
            assignment.source,
            AssignmentSource::Specialty(Specialty::Gastroenterology)
        );
    }

    #[test]
    fn risk_flags() {
        let engine = engine();

        let elderly = patient_with(&engine, "elderly", &[Symptom::ChestPain]);
        engine.set_age(&elderly, 70).unwrap();
        assert!(engine.is_elderly(&elderly).unwrap());
        assert!(!engine.is_child(&elderly).unwrap());
        assert!(engine.is_high_risk(&elderly).unwrap());

        let adult = patient_with(&engine, "adult", &[Symptom::ChestPain]);
        engine.set_age(&adult, 40).unwrap();
        assert!(!engine.is_high_risk(&adult).unwrap());

        let breathless = patient_with(&engine, "breathless", &[Symptom::DifficultyBreathing]);
        let profile = engine.assess_risk(&breathless).unwrap();
        assert_eq!(profile.age_class, None);
        assert!(profile.is_high_risk);
        assert_eq!(profile.factors, vec![RiskFactor::RespiratoryDistress]);

        let child = PatientId::from("child");
        engine.set_age(&child, 5).unwrap();
        assert!(engine.is_child(&child).unwrap());
        assert!(!engine.is_high_risk(&child).unwrap());
    }

    #[test]
    fn admission_request_reflects_facts() {
        let engine = engine();
        let patient = patient_with(&engine, "p", &[Symptom::Fever]);
        engine.set_age(&patient, 12).unwrap();
        engine.set_gender(&patient, Gender::Female).unwrap();

        let request = engine.admission_request(&patient).unwrap();
        assert!(request.is_child);
        assert_eq!(request.gender, Some(Gender::Female));
        assert_eq!(request.specialty, Some(Specialty::Pediatrics));
        assert_eq!(request.urgency, Some(Urgency::new(UrgencyLevel::Medium, 6)));
    }

    #[test]
    fn load_uses_overrides_from_resources_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = RuleCatalog::builtin();
        catalog.doctor.default_doctor = "Dr. Steven Wright".into();
        std::fs::write(
            dir.path().join(RULES_FILE),
            serde_json::to_string(&catalog).unwrap(),
        )
        .unwrap();

        let engine = DefaultTriageEngine::load(dir.path()).unwrap();
        let nobody = PatientId::from("nobody");
        assert_eq!(
            engine.resolve_doctor(&nobody).unwrap().doctor,
            "Dr. Steven Wright"
        );
        assert_eq!(engine.directory(), &DoctorDirectory::builtin());
    }

    #[test]
    fn load_fails_on_malformed_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = RuleCatalog::builtin();
        catalog.urgency[0].level = "critical".into();
        std::fs::write(
            dir.path().join(RULES_FILE),
            serde_json::to_string(&catalog).unwrap(),
        )
        .unwrap();

        assert!(matches!(
            DefaultTriageEngine::load(dir.path()),
            Err(TriageError::MalformedClause { .. })
        ));
    }

    #[test]
    fn load_rejects_catalog_without_urgency_catch_all() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = RuleCatalog::builtin();
        catalog.urgency.pop();
        std::fs::write(
            dir.path().join(RULES_FILE),
            serde_json::to_string(&catalog).unwrap(),
        )
        .unwrap();

        match DefaultTriageEngine::load(dir.path()) {
            Err(TriageError::MalformedClause { family, .. }) => {
                assert_eq!(family, Family::Urgency)
            }
            Err(other) => panic!("Expected MalformedClause, got: {:?}", other),
            Ok(_) => panic!("Expected MalformedClause, got a loaded engine"),
        }
    }

    /// A diagnosis racing a clear sees either every fact or none of them.
    #[test]
    fn diagnose_sees_one_snapshot_while_clearing() {
        use std::sync::Arc;
        use std::thread;

        let engine = Arc::new(engine());
        let patient = PatientId::from("racing");

        for _ in 0..50 {
            engine.add_symptom(&patient, Symptom::ChestPain).unwrap();
            engine.set_age(&patient, 70).unwrap();

            let reader = {
                let engine = Arc::clone(&engine);
                let patient = patient.clone();
                thread::spawn(move || {
                    (0..20)
                        .map(|_| engine.diagnose(&patient).unwrap())
                        .collect::<Vec<_>>()
                })
            };
            let writer = {
                let engine = Arc::clone(&engine);
                let patient = patient.clone();
                thread::spawn(move || engine.clear_patient(&patient).unwrap())
            };

            writer.join().unwrap();
            for diagnosis in reader.join().unwrap() {
                let before = diagnosis.urgency == Some(Urgency::new(UrgencyLevel::Emergency, 10))
                    && diagnosis.specialty == Some(Specialty::Cardiology)
                    && diagnosis.disease.as_deref() == Some("Possible Cardiac Event")
                    && diagnosis.doctor == "Dr. Sarah Johnson";
                let after = diagnosis.urgency.is_none()
                    && diagnosis.specialty.is_none()
                    && diagnosis.disease.is_none()
                    && diagnosis.doctor == "Dr. Emily Davis";
                assert!(before || after, "Mixed snapshot: {:?}", diagnosis);
            }
        }
    }
}
