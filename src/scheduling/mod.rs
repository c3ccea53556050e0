//! Appointment slots and bed allocation derived from a diagnosis.
//!
//! Appointment planning is a pure function of the diagnosis and the clock.
//! Beds are shared, mutable state held in a lock-protected registry.

pub mod appointment;
pub mod beds;

pub use appointment::*;
pub use beds::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("Bed not found: {0}")]
    BedNotFound(String),

    #[error("Bed is not allocated: {0}")]
    BedNotAllocated(String),

    #[error("Patient {0} already holds bed {1}")]
    AlreadyAdmitted(String, String),

    #[error("Internal lock failed")]
    LockFailed,
}
