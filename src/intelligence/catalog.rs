//! Rule catalog in its declarative, serializable form.
//!
//! A catalog names symptoms, specialties and classes by their catalog
//! strings; `ClauseDatabase::build` compiles it into typed clauses and
//! rejects anything that does not resolve. The built-in catalog is the
//! hospital's rule set; `rules.json` in the resources directory replaces it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::types::TriageError;

pub const RULES_FILE: &str = "rules.json";

/// One body condition as written in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConditionSpec {
    Symptom { name: String },
    AnySymptom,
    AgeBelow { years: u32 },
    AgeAtLeast { years: u32 },
    AgeClass { class: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyRule {
    pub level: String,
    pub priority: u8,
    #[serde(default)]
    pub when: Vec<ConditionSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialtyRule {
    pub specialty: String,
    #[serde(default)]
    pub when: Vec<ConditionSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseRule {
    pub disease: String,
    #[serde(default)]
    pub when: Vec<ConditionSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRule {
    pub factor: String,
    #[serde(default)]
    pub when: Vec<ConditionSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeClassRule {
    pub class: String,
    #[serde(default)]
    pub when: Vec<ConditionSpec>,
}

/// The specialty-matched doctor is always tried first; only the default is
/// configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRuleSpec {
    pub default_doctor: String,
}

/// Every clause family, each in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCatalog {
    pub urgency: Vec<UrgencyRule>,
    pub specialty: Vec<SpecialtyRule>,
    pub disease: Vec<DiseaseRule>,
    pub risk: Vec<RiskRule>,
    pub age_class: Vec<AgeClassRule>,
    pub doctor: DoctorRuleSpec,
}

impl RuleCatalog {
    /// Load the catalog from `rules.json` in the resources directory.
    pub fn load(resources_dir: &Path) -> Result<Self, TriageError> {
        let path = resources_dir.join(RULES_FILE);
        let json = std::fs::read_to_string(&path).map_err(|e| {
            TriageError::CatalogLoad(path.display().to_string(), e.to_string())
        })?;
        serde_json::from_str(&json)
            .map_err(|e| TriageError::CatalogParse(RULES_FILE.into(), e.to_string()))
    }

    /// Load `rules.json` when present, otherwise fall back to the built-in catalog.
    pub fn load_or_builtin(resources_dir: &Path) -> Result<Self, TriageError> {
        if resources_dir.join(RULES_FILE).exists() {
            let catalog = Self::load(resources_dir)?;
            tracing::info!(
                dir = %resources_dir.display(),
                "Loaded rule catalog override"
            );
            Ok(catalog)
        } else {
            Ok(Self::builtin())
        }
    }

    /// The hospital's rule set. Order inside each family is significant.
    pub fn builtin() -> Self {
        Self {
            urgency: vec![
                urgency("emergency", 10, vec![symptom("chest_pain")]),
                urgency("emergency", 10, vec![symptom("loss_of_consciousness")]),
                urgency("emergency", 9, vec![symptom("difficulty_breathing")]),
                urgency("emergency", 9, vec![symptom("seizure")]),
                urgency("high", 8, vec![symptom("severe_headache")]),
                urgency("high", 8, vec![symptom("confusion")]),
                urgency("high", 7, vec![symptom("blood_in_stool")]),
                urgency("high", 7, vec![age_class("elderly"), symptom("fever")]),
                urgency("medium", 6, vec![age_class("child")]),
                urgency("medium", 5, vec![symptom("fever"), symptom("cough")]),
                urgency("medium", 5, vec![symptom("vomiting"), symptom("diarrhea")]),
                urgency("low", 3, vec![ConditionSpec::AnySymptom]),
            ],
            specialty: vec![
                specialty("cardiology", vec![symptom("chest_pain")]),
                specialty("cardiology", vec![symptom("heart_palpitations")]),
                specialty("cardiology", vec![symptom("irregular_heartbeat")]),
                specialty("neurology", vec![symptom("severe_headache")]),
                specialty("neurology", vec![symptom("seizure")]),
                specialty("neurology", vec![symptom("dizziness")]),
                specialty("neurology", vec![symptom("confusion")]),
                specialty("pediatrics", vec![age_class("child")]),
                specialty("pulmonology", vec![symptom("difficulty_breathing")]),
                specialty("pulmonology", vec![symptom("shortness_of_breath")]),
                specialty("pulmonology", vec![symptom("wheezing")]),
                specialty("gastroenterology", vec![symptom("abdominal_pain")]),
                specialty("gastroenterology", vec![symptom("blood_in_stool")]),
                specialty("gastroenterology", vec![symptom("vomiting")]),
                specialty("orthopedics", vec![symptom("joint_pain")]),
                specialty("orthopedics", vec![symptom("back_pain")]),
                specialty("orthopedics", vec![symptom("limited_mobility")]),
                specialty("dermatology", vec![symptom("rash")]),
                specialty("dermatology", vec![symptom("skin_lesions")]),
                specialty("dermatology", vec![symptom("hives")]),
                specialty("general_medicine", vec![symptom("fever")]),
                specialty("general_medicine", vec![symptom("cough")]),
            ],
            disease: vec![
                disease("Possible Cardiac Event", vec![symptom("chest_pain")]),
                disease(
                    "Possible Stroke",
                    vec![symptom("confusion"), symptom("difficulty_speaking")],
                ),
                disease("Migraine", vec![symptom("severe_headache"), symptom("nausea")]),
                disease("Neurological Concern", vec![symptom("seizure")]),
                disease(
                    "Pneumonia",
                    vec![symptom("fever"), symptom("cough"), symptom("shortness_of_breath")],
                ),
                disease("Respiratory Infection", vec![symptom("fever"), symptom("cough")]),
                disease("Asthma", vec![symptom("wheezing"), symptom("shortness_of_breath")]),
                disease("Gastroenteritis", vec![symptom("vomiting"), symptom("diarrhea")]),
                disease("Gastrointestinal Disorder", vec![symptom("abdominal_pain")]),
                disease("Arthritis", vec![symptom("joint_pain"), symptom("stiffness")]),
                disease("Musculoskeletal Issue", vec![symptom("back_pain")]),
                disease("Allergic Reaction", vec![symptom("hives"), symptom("itching")]),
                disease("Dermatological Condition", vec![symptom("rash")]),
                disease("Anxiety Disorder", vec![symptom("anxiety"), symptom("insomnia")]),
                disease("Pediatric Consultation", vec![age_class("child")]),
                disease("Viral Infection", vec![symptom("fever")]),
                disease("General Checkup", vec![symptom("fatigue")]),
            ],
            risk: vec![
                risk("elderly_chest_pain", vec![age_class("elderly"), symptom("chest_pain")]),
                risk("respiratory_distress", vec![symptom("difficulty_breathing")]),
            ],
            age_class: vec![
                class("child", vec![ConditionSpec::AgeBelow { years: 18 }]),
                class("elderly", vec![ConditionSpec::AgeAtLeast { years: 65 }]),
                class("adult", vec![ConditionSpec::AgeAtLeast { years: 18 }]),
            ],
            doctor: DoctorRuleSpec {
                default_doctor: "Dr. Emily Davis".into(),
            },
        }
    }
}

fn symptom(name: &str) -> ConditionSpec {
    ConditionSpec::Symptom { name: name.into() }
}

fn age_class(class: &str) -> ConditionSpec {
    ConditionSpec::AgeClass { class: class.into() }
}

fn urgency(level: &str, priority: u8, when: Vec<ConditionSpec>) -> UrgencyRule {
    UrgencyRule {
        level: level.into(),
        priority,
        when,
    }
}

fn specialty(specialty: &str, when: Vec<ConditionSpec>) -> SpecialtyRule {
    SpecialtyRule {
        specialty: specialty.into(),
        when,
    }
}

fn disease(disease: &str, when: Vec<ConditionSpec>) -> DiseaseRule {
    DiseaseRule {
        disease: disease.into(),
        when,
    }
}

fn risk(factor: &str, when: Vec<ConditionSpec>) -> RiskRule {
    RiskRule {
        factor: factor.into(),
        when,
    }
}

fn class(class: &str, when: Vec<ConditionSpec>) -> AgeClassRule {
    AgeClassRule {
        class: class.into(),
        when,
    }
}
