use std::str::FromStr;

use crate::models::{AgeClass, RiskFactor, Specialty, Symptom, Urgency, UrgencyLevel};

use super::catalog::{
    AgeClassRule, ConditionSpec, DiseaseRule, RiskRule, RuleCatalog, SpecialtyRule, UrgencyRule,
};
use super::types::{Clause, Condition, DoctorRules, Family, TriageError};

/// Highest priority an urgency clause may carry.
pub const MAX_PRIORITY: u8 = 10;

/// A catalog rule that compiles into one clause of its family.
trait RuleSpec {
    type Output;

    fn when(&self) -> &[ConditionSpec];

    /// Resolve the rule's result value. Errors are the malformation reason.
    fn output(&self) -> Result<Self::Output, String>;
}

impl RuleSpec for UrgencyRule {
    type Output = Urgency;

    fn when(&self) -> &[ConditionSpec] {
        &self.when
    }

    fn output(&self) -> Result<Urgency, String> {
        let level = UrgencyLevel::from_str(&self.level)
            .map_err(|_| format!("unknown urgency level '{}'", self.level))?;
        if self.priority > MAX_PRIORITY {
            return Err(format!(
                "priority {} exceeds maximum {}",
                self.priority, MAX_PRIORITY
            ));
        }
        Ok(Urgency::new(level, self.priority))
    }
}

impl RuleSpec for SpecialtyRule {
    type Output = Specialty;

    fn when(&self) -> &[ConditionSpec] {
        &self.when
    }

    fn output(&self) -> Result<Specialty, String> {
        Specialty::from_str(&self.specialty)
            .map_err(|_| format!("unknown specialty '{}'", self.specialty))
    }
}

impl RuleSpec for DiseaseRule {
    type Output = String;

    fn when(&self) -> &[ConditionSpec] {
        &self.when
    }

    fn output(&self) -> Result<String, String> {
        let label = self.disease.trim();
        if label.is_empty() {
            return Err("empty disease label".into());
        }
        Ok(label.to_string())
    }
}

impl RuleSpec for RiskRule {
    type Output = RiskFactor;

    fn when(&self) -> &[ConditionSpec] {
        &self.when
    }

    fn output(&self) -> Result<RiskFactor, String> {
        RiskFactor::from_str(&self.factor)
            .map_err(|_| format!("unknown risk factor '{}'", self.factor))
    }
}

impl RuleSpec for AgeClassRule {
    type Output = AgeClass;

    fn when(&self) -> &[ConditionSpec] {
        &self.when
    }

    fn output(&self) -> Result<AgeClass, String> {
        AgeClass::from_str(&self.class).map_err(|_| format!("unknown age class '{}'", self.class))
    }
}

/// Immutable, ordered clause lists for every family.
#[derive(Debug, Clone)]
pub struct ClauseDatabase {
    urgency: Vec<Clause<Urgency>>,
    specialty: Vec<Clause<Specialty>>,
    disease: Vec<Clause<String>>,
    risk: Vec<Clause<RiskFactor>>,
    age_class: Vec<Clause<AgeClass>>,
    doctor: DoctorRules,
}

impl ClauseDatabase {
    /// Compile a catalog. Fails on the first clause that references an
    /// unknown symbol or cannot be reached, and when urgency lacks a
    /// trailing catch-all.
    pub fn build(catalog: &RuleCatalog) -> Result<Self, TriageError> {
        let db = Self {
            urgency: compile_family(Family::Urgency, &catalog.urgency)?,
            specialty: compile_family(Family::Specialty, &catalog.specialty)?,
            disease: compile_family(Family::Disease, &catalog.disease)?,
            risk: compile_family(Family::Risk, &catalog.risk)?,
            age_class: compile_family(Family::AgeClass, &catalog.age_class)?,
            doctor: compile_doctor(catalog)?,
        };
        require_catch_all(Family::Urgency, &db.urgency)?;

        tracing::debug!(
            urgency = db.urgency.len(),
            specialty = db.specialty.len(),
            disease = db.disease.len(),
            risk = db.risk.len(),
            age_class = db.age_class.len(),
            "Clause database built"
        );

        Ok(db)
    }

    pub fn builtin() -> Result<Self, TriageError> {
        Self::build(&RuleCatalog::builtin())
    }

    pub fn urgency(&self) -> &[Clause<Urgency>] {
        &self.urgency
    }

    pub fn specialty(&self) -> &[Clause<Specialty>] {
        &self.specialty
    }

    pub fn disease(&self) -> &[Clause<String>] {
        &self.disease
    }

    pub fn risk(&self) -> &[Clause<RiskFactor>] {
        &self.risk
    }

    pub fn age_class(&self) -> &[Clause<AgeClass>] {
        &self.age_class
    }

    pub fn doctor(&self) -> &DoctorRules {
        &self.doctor
    }

    /// Number of declaration positions in a family.
    pub fn clause_count(&self, family: Family) -> usize {
        match family {
            Family::Urgency => self.urgency.len(),
            Family::Specialty => self.specialty.len(),
            Family::Disease => self.disease.len(),
            Family::Risk => self.risk.len(),
            Family::AgeClass => self.age_class.len(),
            Family::Doctor => 2,
        }
    }
}

fn compile_family<R: RuleSpec>(
    family: Family,
    rules: &[R],
) -> Result<Vec<Clause<R::Output>>, TriageError> {
    let mut clauses: Vec<Clause<R::Output>> = Vec::with_capacity(rules.len());

    for (position, rule) in rules.iter().enumerate() {
        let malformed = |reason: String| TriageError::MalformedClause {
            family,
            position,
            reason,
        };

        if let Some(previous) = clauses.last() {
            if previous.is_unconditional() {
                return Err(malformed(format!(
                    "unreachable: clause #{} has no conditions",
                    previous.position
                )));
            }
        }

        let body = rule
            .when()
            .iter()
            .map(|spec| compile_condition(family, spec))
            .collect::<Result<Vec<_>, _>>()
            .map_err(malformed)?;
        let result = rule.output().map_err(malformed)?;

        clauses.push(Clause {
            position,
            body,
            result,
        });
    }

    Ok(clauses)
}

/// Every patient with a symptom must resolve to some value, so the family
/// has to end in an empty body or a bare "has any symptom" clause.
fn require_catch_all<T>(family: Family, clauses: &[Clause<T>]) -> Result<(), TriageError> {
    let covered = clauses
        .last()
        .is_some_and(|c| c.is_unconditional() || c.body == [Condition::HasAnySymptom]);
    if covered {
        return Ok(());
    }

    Err(TriageError::MalformedClause {
        family,
        position: clauses.len().saturating_sub(1),
        reason: "family must end with a catch-all clause".into(),
    })
}

fn compile_condition(family: Family, spec: &ConditionSpec) -> Result<Condition, String> {
    match spec {
        ConditionSpec::Symptom { name } => Symptom::from_str(name)
            .map(Condition::HasSymptom)
            .map_err(|_| format!("unknown symptom '{name}'")),
        ConditionSpec::AnySymptom => Ok(Condition::HasAnySymptom),
        ConditionSpec::AgeBelow { years } => Ok(Condition::AgeBelow(*years)),
        ConditionSpec::AgeAtLeast { years } => Ok(Condition::AgeAtLeast(*years)),
        ConditionSpec::AgeClass { class } => {
            if family == Family::AgeClass {
                return Err("age-class clauses cannot delegate to their own family".into());
            }
            AgeClass::from_str(class)
                .map(Condition::AgeClassIs)
                .map_err(|_| format!("unknown age class '{class}'"))
        }
    }
}

fn compile_doctor(catalog: &RuleCatalog) -> Result<DoctorRules, TriageError> {
    let default_doctor = catalog.doctor.default_doctor.trim();
    if default_doctor.is_empty() {
        return Err(TriageError::MalformedClause {
            family: Family::Doctor,
            position: 1,
            reason: "empty default doctor".into(),
        });
    }

    Ok(DoctorRules {
        default_doctor: default_doctor.to_string(),
    })
}
