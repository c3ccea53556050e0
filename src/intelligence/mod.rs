//! Triage rule engine: fact store, clause database, resolution and the
//! diagnosis facade built on top of them.

pub mod catalog;
pub mod clauses;
pub mod engine;
pub mod reference;
pub mod resolution;
pub mod store;
pub mod types;

pub use catalog::RuleCatalog;
pub use clauses::ClauseDatabase;
pub use engine::DefaultTriageEngine;
pub use reference::DoctorDirectory;
pub use resolution::Resolver;
pub use store::FactStore;
pub use types::*;
