pub mod diagnosis;
pub mod doctor;
pub mod enums;
pub mod patient;
pub mod symptom;

pub use diagnosis::*;
pub use doctor::*;
pub use enums::*;
pub use patient::*;
pub use symptom::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
