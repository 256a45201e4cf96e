pub mod enums;
pub mod patient;

pub use enums::{Region, Season};
pub use patient::{FeatureValue, FieldError, PatientInput, PatientRecord, Symptoms, ValidationErrors};
