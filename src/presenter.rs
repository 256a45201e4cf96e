//! Result rendering. Pure formatting: identical assessments render to
//! identical bytes.

use std::fmt::Write as _;

use crate::annotator::reading;
use crate::assessment::Assessment;
use crate::classifier::Verdict;

pub const DISCLAIMER: &str = "This tool is for screening purposes only. \
A positive prediction should be confirmed with laboratory testing (RDT or microscopy). \
Always consult a healthcare professional for diagnosis and treatment.";

const POSITIVE_ACTIONS: [&str; 5] = [
    "Perform confirmatory test (RDT or microscopy)",
    "If confirmed, start antimalarial treatment immediately",
    "Monitor temperature and symptoms closely",
    "Ensure adequate hydration",
    "Seek immediate medical attention if symptoms worsen",
];

const NEGATIVE_ACTIONS: [&str; 5] = [
    "Low malaria risk, but continue monitoring symptoms",
    "Continue using mosquito net",
    "Stay hydrated and rest",
    "Consult a doctor if symptoms persist or worsen",
    "Consider testing for other tropical diseases if fever continues",
];

pub fn headline(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Positive => "MALARIA POSITIVE (High Risk)",
        Verdict::Negative => "MALARIA NEGATIVE (Low Risk)",
    }
}

/// Title of the action list for each verdict.
pub fn actions_title(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Positive => "Recommended Actions",
        Verdict::Negative => "Recommendations",
    }
}

pub fn recommendations(verdict: Verdict) -> &'static [&'static str] {
    match verdict {
        Verdict::Positive => &POSITIVE_ACTIONS,
        Verdict::Negative => &NEGATIVE_ACTIONS,
    }
}

/// Closing line under the action list.
pub fn caution(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Positive => "This is a screening result. Laboratory confirmation is required.",
        Verdict::Negative => {
            "A negative prediction doesn't rule out malaria entirely. Clinical judgment is essential."
        }
    }
}

/// `0.873` → `87.3%`
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

// ═══════════════════════════════════════════════════════════
// Plain text
// ═══════════════════════════════════════════════════════════

pub fn render_text(assessment: &Assessment) -> String {
    let s = &assessment.summary;
    let verdict = assessment.prediction.label;
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Patient summary");
    let _ = writeln!(out, "  Age: {} years", s.age);
    let _ = writeln!(
        out,
        "  Temperature: {}°C ({})",
        reading(s.temperature_celsius),
        s.temperature_status.label()
    );
    let _ = writeln!(out, "  Days of fever: {}", s.days_of_fever);
    let _ = writeln!(out, "  Previous cases: {}", s.previous_malaria_cases);
    let _ = writeln!(out);

    let _ = writeln!(out, "Prediction result");
    let _ = writeln!(out, "  {}", headline(verdict));
    let _ = writeln!(
        out,
        "  Confidence: {}",
        format_confidence(assessment.prediction.confidence)
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "{}:", actions_title(verdict));
    for action in recommendations(verdict) {
        let _ = writeln!(out, "  - {action}");
    }
    let _ = writeln!(out, "  {}", caution(verdict));
    let _ = writeln!(out);

    let _ = writeln!(out, "Risk factor analysis");
    let _ = writeln!(out, "Risk factors:");
    for factor in &assessment.annotation.risk_factors {
        let _ = writeln!(out, "  - {factor}");
    }
    let _ = writeln!(out, "Protective factors:");
    for factor in &assessment.annotation.protective_factors {
        let _ = writeln!(out, "  - {factor}");
    }
    let _ = writeln!(out);
    let _ = write!(out, "Medical disclaimer: {DISCLAIMER}");
    out
}

// ═══════════════════════════════════════════════════════════
// HTML fragment
// ═══════════════════════════════════════════════════════════

/// Minimal escaping for text interpolated into HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn html_list(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("<li>{}</li>", escape_html(i)))
        .collect::<Vec<_>>()
        .join("")
}

/// Result section embedded in the form page after a submission.
pub fn render_html(assessment: &Assessment) -> String {
    let s = &assessment.summary;
    let verdict = assessment.prediction.label;
    let class = match verdict {
        Verdict::Positive => "positive-result",
        Verdict::Negative => "negative-result",
    };
    let actions: Vec<String> = recommendations(verdict)
        .iter()
        .map(|a| a.to_string())
        .collect();

    format!(
        r##"<section class="result">
<div class="metrics">
  <div class="metric"><span>Age</span><strong>{age} years</strong></div>
  <div class="metric"><span>Temperature</span><strong>{temp}°C</strong><em>{temp_status}</em></div>
  <div class="metric"><span>Days of Fever</span><strong>{days}</strong></div>
  <div class="metric"><span>Previous Cases</span><strong>{cases}</strong></div>
</div>
<h3>Prediction Result</h3>
<div class="{class}">
  <h2>{headline}</h2>
  <p class="confidence">Confidence: <strong>{confidence}</strong></p>
  <h3>{actions_title}:</h3>
  <ul>{actions}</ul>
  <p class="caution">{caution}</p>
</div>
<h3>Risk Factor Analysis</h3>
<div class="factors">
  <div><strong>Risk Factors:</strong><ul>{risk}</ul></div>
  <div><strong>Protective Factors:</strong><ul>{protective}</ul></div>
</div>
</section>"##,
        age = s.age,
        temp = reading(s.temperature_celsius),
        temp_status = s.temperature_status.label(),
        days = s.days_of_fever,
        cases = s.previous_malaria_cases,
        class = class,
        headline = headline(verdict),
        confidence = format_confidence(assessment.prediction.confidence),
        actions_title = actions_title(verdict),
        actions = html_list(&actions),
        caution = escape_html(caution(verdict)),
        risk = html_list(&assessment.annotation.risk_factors),
        protective = html_list(&assessment.annotation.protective_factors),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::assess;
    use crate::classifier::{MockClassifier, Prediction};
    use crate::models::PatientInput;

    fn assessment(probability: f64) -> Assessment {
        let record = PatientInput {
            temperature_celsius: 39.0,
            days_of_fever: 5,
            ..PatientInput::default()
        }
        .validate()
        .unwrap();
        assess(
            &MockClassifier::new(Prediction::from_probability(probability, 0.5)),
            &record,
        )
        .unwrap()
    }

    #[test]
    fn confidence_has_one_decimal() {
        assert_eq!(format_confidence(0.873), "87.3%");
        assert_eq!(format_confidence(1.0), "100.0%");
        assert_eq!(format_confidence(0.5), "50.0%");
    }

    #[test]
    fn positive_text_rendering() {
        let text = render_text(&assessment(0.9));
        assert!(text.contains("MALARIA POSITIVE (High Risk)"));
        assert!(text.contains("Confidence: 90.0%"));
        assert!(text.contains("Recommended Actions:"));
        assert!(text.contains("  - Perform confirmatory test (RDT or microscopy)"));
        assert!(text.contains("  - High fever (39.0°C)"));
        assert!(text.contains("  - Prolonged fever (5 days)"));
        assert!(text.contains("Temperature: 39.0°C (Fever)"));
        assert!(text.ends_with(DISCLAIMER));
    }

    #[test]
    fn negative_text_rendering() {
        let text = render_text(&assessment(0.2));
        assert!(text.contains("MALARIA NEGATIVE (Low Risk)"));
        assert!(text.contains("Confidence: 80.0%"));
        assert!(text.contains("Recommendations:"));
        assert!(text.contains("Clinical judgment is essential."));
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = assessment(0.7);
        assert_eq!(render_text(&a), render_text(&a));
        assert_eq!(render_html(&a), render_html(&a));
    }

    #[test]
    fn html_uses_verdict_class_and_escapes() {
        let html = render_html(&assessment(0.9));
        assert!(html.contains(r#"<div class="positive-result">"#));
        assert!(html.contains("<li>High fever (39.0°C)</li>"));
        // Apostrophe in the negative caution line gets escaped.
        let html = render_html(&assessment(0.1));
        assert!(html.contains("doesn&#39;t rule out"));
    }

    #[test]
    fn escape_html_handles_markup() {
        assert_eq!(
            escape_html(r#"<b>"x" & 'y'</b>"#),
            "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;"
        );
    }
}
