//! Patient record: the one immutable input shared by the classifier and
//! the risk annotator.
//!
//! Raw operator input arrives as [`PatientInput`] (form or JSON). It only
//! becomes a [`PatientRecord`] after every field passes its bound check.
//! Out-of-range values are rejected, never clamped.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::enums::{Region, Season};

// ═══════════════════════════════════════════════════════════
// Field bounds (shared with the form renderer)
// ═══════════════════════════════════════════════════════════

pub const AGE_RANGE: RangeInclusive<i64> = 1..=100;
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 35.0..=42.0;
pub const PREVIOUS_CASES_RANGE: RangeInclusive<i64> = 0..=10;
pub const FEVER_DAYS_RANGE: RangeInclusive<i64> = 0..=10;
pub const RBC_RANGE: RangeInclusive<f64> = 2.0..=7.0;
pub const WBC_RANGE: RangeInclusive<f64> = 2.0..=15.0;

/// Column names of the trained pipeline, in raw feature order.
pub const FEATURE_NAMES: [&str; 15] = [
    "age",
    "temperature_celsius",
    "region",
    "season",
    "lives_near_water",
    "uses_mosquito_net",
    "previous_malaria_cases",
    "days_of_fever",
    "has_headache",
    "has_chills",
    "has_fatigue",
    "has_vomiting",
    "appetite_loss",
    "red_blood_cell_count",
    "white_blood_cell_count",
];

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

/// A single rejected field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: String,
        max: String,
    },

    #[error("{field} must be 0 or 1, got {value}")]
    InvalidFlag { field: &'static str, value: i64 },

    #[error("{field} has unknown value {value:?}")]
    UnknownCategory { field: &'static str, value: String },
}

impl FieldError {
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::OutOfRange { field, .. }
            | FieldError::InvalidFlag { field, .. }
            | FieldError::UnknownCategory { field, .. } => field,
        }
    }
}

/// Every field that failed validation for one submission.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid patient input: {}", summarize(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(FieldError::field).collect()
    }

    /// First error reported for `field`, if any.
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field() == field)
    }
}

// ═══════════════════════════════════════════════════════════
// Raw input
// ═══════════════════════════════════════════════════════════

/// Untrusted submission as received from the form or the JSON API.
///
/// Flags use the `0`/`1` encoding of the training data. Checkbox fields
/// are absent from urlencoded bodies when unchecked, hence the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    pub age: i64,
    pub temperature_celsius: f64,
    pub region: String,
    pub season: String,
    #[serde(default)]
    pub lives_near_water: i64,
    #[serde(default)]
    pub uses_mosquito_net: i64,
    #[serde(default)]
    pub previous_malaria_cases: i64,
    #[serde(default)]
    pub days_of_fever: i64,
    #[serde(default)]
    pub has_headache: i64,
    #[serde(default)]
    pub has_chills: i64,
    #[serde(default)]
    pub has_fatigue: i64,
    #[serde(default)]
    pub has_vomiting: i64,
    #[serde(default)]
    pub appetite_loss: i64,
    pub red_blood_cell_count: f64,
    pub white_blood_cell_count: f64,
}

impl Default for PatientInput {
    /// The values the form is pre-filled with.
    fn default() -> Self {
        Self {
            age: 25,
            temperature_celsius: 37.0,
            region: Region::SouthSouth.as_str().to_string(),
            season: Season::DrySeason.as_str().to_string(),
            lives_near_water: 0,
            uses_mosquito_net: 0,
            previous_malaria_cases: 0,
            days_of_fever: 0,
            has_headache: 0,
            has_chills: 0,
            has_fatigue: 0,
            has_vomiting: 0,
            appetite_loss: 0,
            red_blood_cell_count: 4.5,
            white_blood_cell_count: 7.0,
        }
    }
}

impl PatientInput {
    /// Check every field and build the record, or report all failures.
    pub fn validate(&self) -> Result<PatientRecord, ValidationErrors> {
        let mut errors = Vec::new();

        let age = check_int(&mut errors, "age", self.age, AGE_RANGE);
        let temperature = check_real(
            &mut errors,
            "temperature_celsius",
            self.temperature_celsius,
            TEMPERATURE_RANGE,
        );
        let region = self
            .region
            .parse::<Region>()
            .map_err(|e| errors.push(e))
            .ok();
        let season = self
            .season
            .parse::<Season>()
            .map_err(|e| errors.push(e))
            .ok();
        let lives_near_water = check_flag(&mut errors, "lives_near_water", self.lives_near_water);
        let uses_mosquito_net =
            check_flag(&mut errors, "uses_mosquito_net", self.uses_mosquito_net);
        let previous_malaria_cases = check_int(
            &mut errors,
            "previous_malaria_cases",
            self.previous_malaria_cases,
            PREVIOUS_CASES_RANGE,
        );
        let days_of_fever =
            check_int(&mut errors, "days_of_fever", self.days_of_fever, FEVER_DAYS_RANGE);
        let symptoms = Symptoms {
            headache: check_flag(&mut errors, "has_headache", self.has_headache),
            chills: check_flag(&mut errors, "has_chills", self.has_chills),
            fatigue: check_flag(&mut errors, "has_fatigue", self.has_fatigue),
            vomiting: check_flag(&mut errors, "has_vomiting", self.has_vomiting),
            appetite_loss: check_flag(&mut errors, "appetite_loss", self.appetite_loss),
        };
        let rbc = check_real(
            &mut errors,
            "red_blood_cell_count",
            self.red_blood_cell_count,
            RBC_RANGE,
        );
        let wbc = check_real(
            &mut errors,
            "white_blood_cell_count",
            self.white_blood_cell_count,
            WBC_RANGE,
        );

        match (age, temperature, region, season, previous_malaria_cases, days_of_fever, rbc, wbc) {
            (
                Some(age),
                Some(temperature_celsius),
                Some(region),
                Some(season),
                Some(previous_malaria_cases),
                Some(days_of_fever),
                Some(red_blood_cell_count),
                Some(white_blood_cell_count),
            ) if errors.is_empty() => Ok(PatientRecord {
                age,
                temperature_celsius,
                region,
                season,
                lives_near_water,
                uses_mosquito_net,
                previous_malaria_cases,
                days_of_fever,
                symptoms,
                red_blood_cell_count,
                white_blood_cell_count,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

fn check_int(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: i64,
    range: RangeInclusive<i64>,
) -> Option<u8> {
    if range.contains(&value) {
        u8::try_from(value).ok()
    } else {
        errors.push(FieldError::OutOfRange {
            field,
            value: value.to_string(),
            min: range.start().to_string(),
            max: range.end().to_string(),
        });
        None
    }
}

fn check_real(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: f64,
    range: RangeInclusive<f64>,
) -> Option<f64> {
    // NaN fails `contains`, so it is reported as out of range.
    if range.contains(&value) {
        Some(value)
    } else {
        errors.push(FieldError::OutOfRange {
            field,
            value: value.to_string(),
            min: format!("{:.1}", range.start()),
            max: format!("{:.1}", range.end()),
        });
        None
    }
}

fn check_flag(errors: &mut Vec<FieldError>, field: &'static str, value: i64) -> bool {
    match value {
        0 => false,
        1 => true,
        other => {
            errors.push(FieldError::InvalidFlag {
                field,
                value: other,
            });
            false
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Validated record
// ═══════════════════════════════════════════════════════════

/// Presence flags for the five reported symptoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Symptoms {
    pub headache: bool,
    pub chills: bool,
    pub fatigue: bool,
    pub vomiting: bool,
    pub appetite_loss: bool,
}

/// Validated patient attributes. Fields are private: the only way to
/// obtain a record is [`PatientInput::validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientRecord {
    age: u8,
    temperature_celsius: f64,
    region: Region,
    season: Season,
    lives_near_water: bool,
    uses_mosquito_net: bool,
    previous_malaria_cases: u8,
    days_of_fever: u8,
    symptoms: Symptoms,
    red_blood_cell_count: f64,
    white_blood_cell_count: f64,
}

/// A single model-facing column value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    Category(&'static str),
}

impl PatientRecord {
    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn temperature_celsius(&self) -> f64 {
        self.temperature_celsius
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn lives_near_water(&self) -> bool {
        self.lives_near_water
    }

    pub fn uses_mosquito_net(&self) -> bool {
        self.uses_mosquito_net
    }

    pub fn previous_malaria_cases(&self) -> u8 {
        self.previous_malaria_cases
    }

    pub fn days_of_fever(&self) -> u8 {
        self.days_of_fever
    }

    pub fn symptoms(&self) -> Symptoms {
        self.symptoms
    }

    pub fn red_blood_cell_count(&self) -> f64 {
        self.red_blood_cell_count
    }

    pub fn white_blood_cell_count(&self) -> f64 {
        self.white_blood_cell_count
    }

    /// Look up a column by its training name. Flags read as 0.0 / 1.0.
    pub fn feature(&self, name: &str) -> Option<FeatureValue> {
        let flag = |b: bool| FeatureValue::Numeric(if b { 1.0 } else { 0.0 });
        let value = match name {
            "age" => FeatureValue::Numeric(f64::from(self.age)),
            "temperature_celsius" => FeatureValue::Numeric(self.temperature_celsius),
            "region" => FeatureValue::Category(self.region.as_str()),
            "season" => FeatureValue::Category(self.season.as_str()),
            "lives_near_water" => flag(self.lives_near_water),
            "uses_mosquito_net" => flag(self.uses_mosquito_net),
            "previous_malaria_cases" => FeatureValue::Numeric(f64::from(self.previous_malaria_cases)),
            "days_of_fever" => FeatureValue::Numeric(f64::from(self.days_of_fever)),
            "has_headache" => flag(self.symptoms.headache),
            "has_chills" => flag(self.symptoms.chills),
            "has_fatigue" => flag(self.symptoms.fatigue),
            "has_vomiting" => flag(self.symptoms.vomiting),
            "appetite_loss" => flag(self.symptoms.appetite_loss),
            "red_blood_cell_count" => FeatureValue::Numeric(self.red_blood_cell_count),
            "white_blood_cell_count" => FeatureValue::Numeric(self.white_blood_cell_count),
            _ => return None,
        };
        Some(value)
    }

    /// All columns as numbers in `FEATURE_NAMES` order. Categories become
    /// their enumeration index.
    pub fn raw_features(&self) -> [f32; 15] {
        let mut out = [0.0f32; 15];
        for (slot, name) in out.iter_mut().zip(FEATURE_NAMES) {
            *slot = match self.feature(name) {
                Some(FeatureValue::Numeric(v)) => v as f32,
                Some(FeatureValue::Category(_)) => match name {
                    "region" => self.region.index() as f32,
                    _ => self.season.index() as f32,
                },
                None => 0.0,
            };
        }
        out
    }
}

impl TryFrom<PatientInput> for PatientRecord {
    type Error = ValidationErrors;

    fn try_from(input: PatientInput) -> Result<Self, Self::Error> {
        input.validate()
    }
}

impl TryFrom<&PatientInput> for PatientRecord {
    type Error = ValidationErrors;

    fn try_from(input: &PatientInput) -> Result<Self, Self::Error> {
        input.validate()
    }
}
