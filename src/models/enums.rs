use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate a closed enum with as_str, ALL and std::str::FromStr.
/// Serialized names match `as_str`.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $s)]
                $variant
            ),+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use str_enum;

str_enum!(Specialty {
    Cardiology => "cardiology",
    Neurology => "neurology",
    Pediatrics => "pediatrics",
    GeneralMedicine => "general_medicine",
    Orthopedics => "orthopedics",
    Dermatology => "dermatology",
    Gastroenterology => "gastroenterology",
    Pulmonology => "pulmonology",
});

str_enum!(UrgencyLevel {
    Emergency => "emergency",
    High => "high",
    Medium => "medium",
    Low => "low",
});

str_enum!(AgeClass {
    Child => "child",
    Adult => "adult",
    Elderly => "elderly",
});

str_enum!(RiskFactor {
    ElderlyChestPain => "elderly_chest_pain",
    RespiratoryDistress => "respiratory_distress",
});

str_enum!(Gender {
    Male => "male",
    Female => "female",
    Other => "other",
});

str_enum!(BodySystem {
    General => "general",
    Respiratory => "respiratory",
    Cardiovascular => "cardiovascular",
    Neurological => "neurological",
    Gastrointestinal => "gastrointestinal",
    Musculoskeletal => "musculoskeletal",
    Dermatological => "dermatological",
    Pediatric => "pediatric",
    Other => "other",
});
