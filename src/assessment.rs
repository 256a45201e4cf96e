//! One prediction cycle: classifier verdict plus rule-based annotation
//! over the same record.

use serde::Serialize;

use crate::annotator::{annotate, RiskAnnotation};
use crate::classifier::{ClassifierError, Prediction, RiskClassifier};
use crate::models::PatientRecord;

/// Summary tiles use a lower bar than the annotator's high-fever rule.
const FEVER_DISPLAY_ABOVE: f64 = 37.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureStatus {
    Fever,
    Normal,
}

impl TemperatureStatus {
    pub fn from_celsius(t: f64) -> Self {
        if t > FEVER_DISPLAY_ABOVE {
            Self::Fever
        } else {
            Self::Normal
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Fever => "Fever",
            Self::Normal => "Normal",
        }
    }
}

/// Headline patient figures shown above the verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientSummary {
    pub age: u8,
    pub temperature_celsius: f64,
    pub temperature_status: TemperatureStatus,
    pub days_of_fever: u8,
    pub previous_malaria_cases: u8,
}

impl From<&PatientRecord> for PatientSummary {
    fn from(record: &PatientRecord) -> Self {
        Self {
            age: record.age(),
            temperature_celsius: record.temperature_celsius(),
            temperature_status: TemperatureStatus::from_celsius(record.temperature_celsius()),
            days_of_fever: record.days_of_fever(),
            previous_malaria_cases: record.previous_malaria_cases(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub summary: PatientSummary,
    pub prediction: Prediction,
    pub annotation: RiskAnnotation,
}

/// Run the classifier and the annotator on `record`.
///
/// The annotator cannot fail; only inference errors propagate.
pub fn assess(
    classifier: &dyn RiskClassifier,
    record: &PatientRecord,
) -> Result<Assessment, ClassifierError> {
    let prediction = classifier.predict(record)?;
    Ok(Assessment {
        summary: PatientSummary::from(record),
        prediction,
        annotation: annotate(record),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::{FEW_PROTECTIVE_FACTORS, NO_RISK_FACTORS};
    use crate::classifier::{MockClassifier, Verdict};
    use crate::models::PatientInput;

    #[test]
    fn combines_prediction_and_annotation() {
        let classifier = MockClassifier::new(Prediction::from_probability(0.91, 0.5));
        let record = PatientInput {
            temperature_celsius: 39.0,
            ..PatientInput::default()
        }
        .validate()
        .unwrap();

        let assessment = assess(&classifier, &record).unwrap();
        assert_eq!(assessment.prediction.label, Verdict::Positive);
        assert_eq!(assessment.annotation.risk_factors, vec!["High fever (39.0°C)"]);
        assert_eq!(assessment.summary.temperature_status, TemperatureStatus::Fever);
    }

    #[test]
    fn annotation_ignores_model_output() {
        // Same record, opposite verdicts: factor lists must not change.
        let record = PatientInput {
            temperature_celsius: 37.8,
            red_blood_cell_count: 4.2,
            ..PatientInput::default()
        }
        .validate()
        .unwrap();
        let pos = assess(
            &MockClassifier::new(Prediction::from_probability(0.99, 0.5)),
            &record,
        )
        .unwrap();
        let neg = assess(
            &MockClassifier::new(Prediction::from_probability(0.01, 0.5)),
            &record,
        )
        .unwrap();
        assert_eq!(pos.annotation, neg.annotation);
        assert_eq!(pos.annotation.risk_factors, vec![NO_RISK_FACTORS]);
        assert_eq!(pos.annotation.protective_factors, vec![FEW_PROTECTIVE_FACTORS]);
    }

    #[test]
    fn summary_fever_status_uses_display_threshold() {
        assert_eq!(TemperatureStatus::from_celsius(37.5), TemperatureStatus::Normal);
        assert_eq!(TemperatureStatus::from_celsius(37.6), TemperatureStatus::Fever);
    }
}
