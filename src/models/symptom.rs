use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::enums::{str_enum, BodySystem};
use super::ModelError;

/// Declares the symptom catalog grouped by body system. Generates the
/// `Symptom` enum and its `body_system` mapping from one table.
macro_rules! symptom_catalog {
    ($($system:ident => { $($variant:ident => $s:literal),+ $(,)? }),+ $(,)?) => {
        str_enum!(Symptom { $($($variant => $s),+),+ });

        impl Symptom {
            pub fn body_system(&self) -> BodySystem {
                match self {
                    $($(Self::$variant => BodySystem::$system,)+)+
                }
            }
        }
    };
}

symptom_catalog! {
    General => {
        Fever => "fever",
        Fatigue => "fatigue",
        Weakness => "weakness",
        LossOfAppetite => "loss_of_appetite",
        WeightLoss => "weight_loss",
        NightSweats => "night_sweats",
        Chills => "chills",
        Malaise => "malaise",
    },
    Respiratory => {
        Cough => "cough",
        ShortnessOfBreath => "shortness_of_breath",
        Wheezing => "wheezing",
        SoreThroat => "sore_throat",
        RunnyNose => "runny_nose",
        NasalCongestion => "nasal_congestion",
        DifficultyBreathing => "difficulty_breathing",
    },
    Cardiovascular => {
        ChestPain => "chest_pain",
        HeartPalpitations => "heart_palpitations",
        IrregularHeartbeat => "irregular_heartbeat",
        HighBloodPressure => "high_blood_pressure",
        LowBloodPressure => "low_blood_pressure",
        RapidHeartbeat => "rapid_heartbeat",
    },
    Neurological => {
        SevereHeadache => "severe_headache",
        Headache => "headache",
        Dizziness => "dizziness",
        Confusion => "confusion",
        Seizure => "seizure",
        MemoryLoss => "memory_loss",
        Numbness => "numbness",
        Tingling => "tingling",
        VisionProblems => "vision_problems",
        LossOfConsciousness => "loss_of_consciousness",
        DifficultySpeaking => "difficulty_speaking",
    },
    Gastrointestinal => {
        Nausea => "nausea",
        Vomiting => "vomiting",
        Diarrhea => "diarrhea",
        Constipation => "constipation",
        AbdominalPain => "abdominal_pain",
        Bloating => "bloating",
        BloodInStool => "blood_in_stool",
    },
    Musculoskeletal => {
        JointPain => "joint_pain",
        MusclePain => "muscle_pain",
        BackPain => "back_pain",
        NeckPain => "neck_pain",
        Stiffness => "stiffness",
        Swelling => "swelling",
        LimitedMobility => "limited_mobility",
    },
    Dermatological => {
        Rash => "rash",
        Itching => "itching",
        SkinDiscoloration => "skin_discoloration",
        Bruising => "bruising",
        Hives => "hives",
        DrySkin => "dry_skin",
        SkinLesions => "skin_lesions",
    },
    Pediatric => {
        ChildFever => "child_fever",
        InfantCrying => "infant_crying",
        PoorFeeding => "poor_feeding",
        DevelopmentalDelay => "developmental_delay",
        IrritabilityInChild => "irritability_in_child",
    },
    Other => {
        AllergicReaction => "allergic_reaction",
        Dehydration => "dehydration",
        Insomnia => "insomnia",
        Anxiety => "anxiety",
        Depression => "depression",
        Bleeding => "bleeding",
    },
}

/// Runs of whitespace, hyphens and underscores collapse to a single underscore.
static RE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-_]+").unwrap());

impl Symptom {
    /// Parse a human label ("Chest pain", "chest-pain") or a catalog name.
    pub fn from_label(label: &str) -> Result<Self, ModelError> {
        let normalized = RE_SEPARATORS
            .replace_all(label.trim(), "_")
            .to_lowercase();
        normalized.parse().map_err(|_| ModelError::InvalidEnum {
            field: "Symptom".into(),
            value: label.into(),
        })
    }

    /// All symptoms belonging to one body system, in catalog order.
    pub fn in_system(system: BodySystem) -> Vec<Symptom> {
        Self::ALL
            .iter()
            .copied()
            .filter(|s| s.body_system() == system)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;

    #[test]
    fn catalog_has_unique_names() {
        let names: HashSet<&str> = Symptom::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(names.len(), Symptom::ALL.len());
        assert_eq!(Symptom::ALL.len(), 64);
    }

    #[test]
    fn from_label_accepts_display_forms() {
        assert_eq!(Symptom::from_label("Chest pain").unwrap(), Symptom::ChestPain);
        assert_eq!(Symptom::from_label("  shortness-of  breath ").unwrap(), Symptom::ShortnessOfBreath);
        assert_eq!(Symptom::from_label("BLOOD_IN_STOOL").unwrap(), Symptom::BloodInStool);
    }

    #[test]
    fn from_label_rejects_unknown() {
        let err = Symptom::from_label("Heart attack").unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidEnum {
                field: "Symptom".into(),
                value: "Heart attack".into(),
            }
        );
        // Exact parsing does not normalize.
        assert!(Symptom::from_str("Chest pain").is_err());
    }

    #[test]
    fn body_system_grouping() {
        assert_eq!(Symptom::ChestPain.body_system(), BodySystem::Cardiovascular);
        assert_eq!(Symptom::Stiffness.body_system(), BodySystem::Musculoskeletal);

        let pediatric = Symptom::in_system(BodySystem::Pediatric);
        assert_eq!(pediatric.len(), 5);
        assert_eq!(pediatric[0], Symptom::ChildFever);

        let total: usize = BodySystem::ALL
            .iter()
            .map(|system| Symptom::in_system(*system).len())
            .sum();
        assert_eq!(total, Symptom::ALL.len());
    }
}
