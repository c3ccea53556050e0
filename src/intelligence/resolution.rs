//! Ordered backward-chaining over the clause database.
//!
//! Two query modes:
//! - `first`: clauses in declaration order, bodies short-circuit on the first
//!   failing condition, the first clause whose body holds wins.
//! - `all`: every clause is checked independently against the same facts;
//!   all matching results are returned in declaration order, unduplicated.
//!
//! Doctor assignment is the one family with commitment: the specialty
//! clause is tried once, and if it fails the default doctor is returned
//! without trying any other specialty.

use crate::models::{
    AgeClass, AssignmentSource, DoctorAssignment, PatientFacts, RiskFactor, Specialty, Urgency,
};

use super::clauses::ClauseDatabase;
use super::reference::DoctorDirectory;
use super::types::{Clause, Condition, Family};

/// Evaluates queries against one clause database and directory.
/// Holds no state of its own; the facts are passed per query.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    clauses: &'a ClauseDatabase,
    directory: &'a DoctorDirectory,
}

impl<'a> Resolver<'a> {
    pub fn new(clauses: &'a ClauseDatabase, directory: &'a DoctorDirectory) -> Self {
        Self { clauses, directory }
    }

    /// Single-solution resolve: result of the first clause whose body holds.
    pub fn first<T: Clone>(
        &self,
        family: Family,
        clauses: &[Clause<T>],
        facts: &PatientFacts,
    ) -> Option<T> {
        let clause = clauses.iter().find(|c| self.body_holds(&c.body, facts))?;
        tracing::debug!(
            family = family.as_str(),
            position = clause.position,
            "Clause matched"
        );
        Some(clause.result.clone())
    }

    /// All-solutions resolve: results of every clause whose body holds.
    pub fn all<T: Clone>(
        &self,
        family: Family,
        clauses: &[Clause<T>],
        facts: &PatientFacts,
    ) -> Vec<T> {
        let results: Vec<T> = clauses
            .iter()
            .filter(|c| self.body_holds(&c.body, facts))
            .map(|c| c.result.clone())
            .collect();
        tracing::debug!(
            family = family.as_str(),
            matched = results.len(),
            "Enumerated matching clauses"
        );
        results
    }

    fn body_holds(&self, body: &[Condition], facts: &PatientFacts) -> bool {
        body.iter().all(|condition| self.condition_holds(condition, facts))
    }

    fn condition_holds(&self, condition: &Condition, facts: &PatientFacts) -> bool {
        match condition {
            Condition::HasSymptom(symptom) => facts.has_symptom(*symptom),
            Condition::HasAnySymptom => facts.has_any_symptom(),
            Condition::AgeBelow(years) => facts.age.is_some_and(|age| age < *years),
            Condition::AgeAtLeast(years) => facts.age.is_some_and(|age| age >= *years),
            // Age-class clauses never delegate, so this recursion is one level deep.
            Condition::AgeClassIs(class) => self.age_class(facts) == Some(*class),
        }
    }

    pub fn urgency(&self, facts: &PatientFacts) -> Option<Urgency> {
        self.first(Family::Urgency, self.clauses.urgency(), facts)
    }

    pub fn specialty(&self, facts: &PatientFacts) -> Option<Specialty> {
        self.first(Family::Specialty, self.clauses.specialty(), facts)
    }

    pub fn disease(&self, facts: &PatientFacts) -> Option<String> {
        self.first(Family::Disease, self.clauses.disease(), facts)
    }

    pub fn all_diseases(&self, facts: &PatientFacts) -> Vec<String> {
        self.all(Family::Disease, self.clauses.disease(), facts)
    }

    pub fn age_class(&self, facts: &PatientFacts) -> Option<AgeClass> {
        self.first(Family::AgeClass, self.clauses.age_class(), facts)
    }

    /// Risk has "any match" semantics, so every factor is collected.
    pub fn risk_factors(&self, facts: &PatientFacts) -> Vec<RiskFactor> {
        self.all(Family::Risk, self.clauses.risk(), facts)
    }

    /// Try the specialty-matched doctor, else commit to the default.
    /// Always yields exactly one doctor.
    pub fn doctor(&self, facts: &PatientFacts) -> DoctorAssignment {
        let rules = self.clauses.doctor();

        if let Some(specialty) = self.specialty(facts) {
            if let Some(doctor) = self.directory.for_specialty(specialty) {
                return DoctorAssignment {
                    doctor: doctor.name.clone(),
                    source: AssignmentSource::Specialty(specialty),
                };
            }
            tracing::warn!(
                specialty = specialty.as_str(),
                "No doctor listed for resolved specialty, assigning default"
            );
        }

        DoctorAssignment {
            doctor: rules.default_doctor.clone(),
            source: AssignmentSource::Fallback,
        }
    }
}
