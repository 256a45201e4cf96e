//! Rule-based risk factor analysis shown next to the model verdict.
//!
//! Reads the raw record only, never the classifier output. Rules are
//! evaluated in a fixed order and every match is kept; the order is the
//! display order.

use std::fmt;

use serde::Serialize;

use crate::models::{PatientRecord, Season};

/// Shown when no risk rule fires.
pub const NO_RISK_FACTORS: &str = "No significant risk factors";
/// Shown when no protective rule fires.
pub const FEW_PROTECTIVE_FACTORS: &str = "Few protective factors detected";

const HIGH_FEVER_ABOVE: f64 = 38.0;
const PROLONGED_FEVER_ABOVE_DAYS: u8 = 3;
const REPEAT_INFECTIONS_ABOVE: u8 = 2;
const LOW_RBC_BELOW: f64 = 4.0;
const NORMAL_TEMPERATURE_BELOW: f64 = 37.5;
const HEALTHY_RBC_FROM: f64 = 4.5;

// ═══════════════════════════════════════════════════════════
// Factors
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiskFactor {
    HighFever(f64),
    ProlongedFever(u8),
    RepeatInfections(u8),
    NearWater,
    RainySeason,
    LowRbc(f64),
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighFever(t) => write!(f, "High fever ({}°C)", reading(*t)),
            Self::ProlongedFever(days) => write!(f, "Prolonged fever ({days} days)"),
            Self::RepeatInfections(n) => write!(f, "Multiple previous infections ({n})"),
            Self::NearWater => write!(f, "Lives near water bodies"),
            Self::RainySeason => write!(f, "Rainy season (high transmission)"),
            Self::LowRbc(rbc) => write!(f, "Low RBC count ({})", reading(*rbc)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectiveFactor {
    UsesNet,
    NormalTemperature,
    HealthyRbc,
}

impl fmt::Display for ProtectiveFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UsesNet => write!(f, "Uses mosquito net"),
            Self::NormalTemperature => write!(f, "Normal temperature"),
            Self::HealthyRbc => write!(f, "Healthy RBC count"),
        }
    }
}

/// A measured value as the operator entered it: `39.0`, `38.01`, `3.5`.
pub fn reading(value: f64) -> String {
    format!("{value:?}")
}

// ═══════════════════════════════════════════════════════════
// Rules
// ═══════════════════════════════════════════════════════════

/// Risk rules that fire for `record`, in display order.
pub fn risk_factors(record: &PatientRecord) -> Vec<RiskFactor> {
    let mut factors = Vec::new();
    let temperature = record.temperature_celsius();
    let rbc = record.red_blood_cell_count();

    if temperature > HIGH_FEVER_ABOVE {
        factors.push(RiskFactor::HighFever(temperature));
    }
    if record.days_of_fever() > PROLONGED_FEVER_ABOVE_DAYS {
        factors.push(RiskFactor::ProlongedFever(record.days_of_fever()));
    }
    if record.previous_malaria_cases() > REPEAT_INFECTIONS_ABOVE {
        factors.push(RiskFactor::RepeatInfections(record.previous_malaria_cases()));
    }
    if record.lives_near_water() {
        factors.push(RiskFactor::NearWater);
    }
    if record.season() == Season::RainySeason {
        factors.push(RiskFactor::RainySeason);
    }
    if rbc < LOW_RBC_BELOW {
        factors.push(RiskFactor::LowRbc(rbc));
    }
    factors
}

/// Protective rules that fire for `record`, in display order.
///
/// Temperatures in [37.5, 38.0] match neither this module's fever rule
/// nor the normal-temperature rule.
pub fn protective_factors(record: &PatientRecord) -> Vec<ProtectiveFactor> {
    let mut factors = Vec::new();

    if record.uses_mosquito_net() {
        factors.push(ProtectiveFactor::UsesNet);
    }
    if record.temperature_celsius() < NORMAL_TEMPERATURE_BELOW {
        factors.push(ProtectiveFactor::NormalTemperature);
    }
    if record.red_blood_cell_count() >= HEALTHY_RBC_FROM {
        factors.push(ProtectiveFactor::HealthyRbc);
    }
    factors
}

/// Display-ready factor lists. Neither list is ever empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAnnotation {
    pub risk_factors: Vec<String>,
    pub protective_factors: Vec<String>,
}

/// Derive both factor lists, substituting the sentinel for an empty list.
pub fn annotate(record: &PatientRecord) -> RiskAnnotation {
    RiskAnnotation {
        risk_factors: labels_or(risk_factors(record), NO_RISK_FACTORS),
        protective_factors: labels_or(protective_factors(record), FEW_PROTECTIVE_FACTORS),
    }
}

fn labels_or<T: fmt::Display>(factors: Vec<T>, sentinel: &str) -> Vec<String> {
    if factors.is_empty() {
        vec![sentinel.to_string()]
    } else {
        factors.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatientInput;

    fn record(input: PatientInput) -> PatientRecord {
        input.validate().unwrap()
    }

    fn with_temperature(t: f64) -> PatientRecord {
        record(PatientInput {
            temperature_celsius: t,
            ..PatientInput::default()
        })
    }

    fn scenario_a() -> PatientRecord {
        record(PatientInput {
            temperature_celsius: 39.0,
            days_of_fever: 5,
            previous_malaria_cases: 3,
            lives_near_water: 1,
            season: "Rainy_Season".into(),
            red_blood_cell_count: 3.5,
            uses_mosquito_net: 0,
            ..PatientInput::default()
        })
    }

    fn scenario_b() -> PatientRecord {
        record(PatientInput {
            temperature_celsius: 36.8,
            days_of_fever: 0,
            previous_malaria_cases: 0,
            lives_near_water: 0,
            season: "Dry_Season".into(),
            red_blood_cell_count: 5.0,
            uses_mosquito_net: 1,
            ..PatientInput::default()
        })
    }

    #[test]
    fn all_risk_rules_fire_in_order() {
        let annotation = annotate(&scenario_a());
        assert_eq!(
            annotation.risk_factors,
            vec![
                "High fever (39.0°C)",
                "Prolonged fever (5 days)",
                "Multiple previous infections (3)",
                "Lives near water bodies",
                "Rainy season (high transmission)",
                "Low RBC count (3.5)",
            ]
        );
        assert_eq!(annotation.protective_factors, vec![FEW_PROTECTIVE_FACTORS]);
    }

    #[test]
    fn all_protective_rules_fire_in_order() {
        let annotation = annotate(&scenario_b());
        assert_eq!(annotation.risk_factors, vec![NO_RISK_FACTORS]);
        assert_eq!(
            annotation.protective_factors,
            vec!["Uses mosquito net", "Normal temperature", "Healthy RBC count"]
        );
    }

    #[test]
    fn fever_threshold_is_strict() {
        assert!(!risk_factors(&with_temperature(38.0))
            .iter()
            .any(|f| matches!(f, RiskFactor::HighFever(_))));
        assert_eq!(
            risk_factors(&with_temperature(38.01))[0],
            RiskFactor::HighFever(38.01)
        );
        assert_eq!(
            annotate(&with_temperature(38.01)).risk_factors[0],
            "High fever (38.01°C)"
        );
    }

    #[test]
    fn normal_temperature_threshold_is_strict() {
        assert!(!protective_factors(&with_temperature(37.5))
            .contains(&ProtectiveFactor::NormalTemperature));
        assert!(protective_factors(&with_temperature(37.49))
            .contains(&ProtectiveFactor::NormalTemperature));
    }

    #[test]
    fn borderline_temperatures_trigger_neither_rule() {
        for t in [37.5, 37.7, 38.0] {
            let r = with_temperature(t);
            assert!(!risk_factors(&r)
                .iter()
                .any(|f| matches!(f, RiskFactor::HighFever(_))));
            assert!(!protective_factors(&r).contains(&ProtectiveFactor::NormalTemperature));
        }
    }

    #[test]
    fn rbc_boundaries() {
        let at = |rbc: f64| {
            record(PatientInput {
                red_blood_cell_count: rbc,
                ..PatientInput::default()
            })
        };
        assert!(risk_factors(&at(3.9)).contains(&RiskFactor::LowRbc(3.9)));
        assert!(risk_factors(&at(4.0)).is_empty());
        assert!(!protective_factors(&at(4.4)).contains(&ProtectiveFactor::HealthyRbc));
        assert!(protective_factors(&at(4.5)).contains(&ProtectiveFactor::HealthyRbc));
    }

    #[test]
    fn count_thresholds_are_strict() {
        let r = record(PatientInput {
            days_of_fever: 3,
            previous_malaria_cases: 2,
            ..PatientInput::default()
        });
        assert!(risk_factors(&r).is_empty());
    }

    #[test]
    fn lists_never_empty() {
        // Borderline temperature, mid RBC, no net: nothing fires on either side.
        let r = record(PatientInput {
            temperature_celsius: 37.8,
            red_blood_cell_count: 4.2,
            ..PatientInput::default()
        });
        let annotation = annotate(&r);
        assert_eq!(annotation.risk_factors, vec![NO_RISK_FACTORS]);
        assert_eq!(annotation.protective_factors, vec![FEW_PROTECTIVE_FACTORS]);
    }

    #[test]
    fn annotation_is_deterministic() {
        let r = scenario_a();
        assert_eq!(annotate(&r), annotate(&r));
    }

    #[test]
    fn reading_keeps_one_decimal_for_whole_numbers() {
        assert_eq!(reading(39.0), "39.0");
        assert_eq!(reading(38.01), "38.01");
        assert_eq!(reading(2.0), "2.0");
    }
}
