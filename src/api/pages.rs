//! HTML rendering — the self-contained form page (no external assets).
//!
//! The form mirrors the patient record bounds exactly, pre-fills the
//! last submitted values, and embeds the result section once a
//! prediction has been made.

use std::ops::RangeInclusive;

use crate::annotator::reading;
use crate::config;
use crate::models::patient::{
    AGE_RANGE, FEVER_DAYS_RANGE, PREVIOUS_CASES_RANGE, RBC_RANGE, TEMPERATURE_RANGE, WBC_RANGE,
};
use crate::models::{PatientInput, Region, Season, ValidationErrors};
use crate::presenter::{escape_html, DISCLAIMER};

const STYLE: &str = r#"
*,*::before,*::after{box-sizing:border-box}
body{margin:0;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:#fafaf9;color:#1c1917;display:flex;min-height:100vh}
aside{width:320px;background:#f5f5f4;padding:24px;border-right:1px solid #e7e5e4}
main{flex:1;padding:32px;max-width:960px}
h1.main-title{font-size:2.5rem;color:#D32F2F;text-align:center;margin:0}
p.subtitle{font-size:1.1rem;color:#555;text-align:center;margin-bottom:2rem}
aside h2{font-size:1rem;margin:20px 0 8px}
label{display:block;font-size:.875rem;margin:8px 0 4px}
input[type=number],select{width:100%;padding:6px}
.choice label{display:inline;margin-right:12px}
.field-error{color:#D32F2F;font-size:.8rem}
button{width:100%;padding:12px;margin-top:20px;background:#D32F2F;color:#fff;border:none;border-radius:8px;font-weight:600;cursor:pointer}
.warning-box{background:#fff3e0;padding:1rem;border-radius:5px;border-left:4px solid #FF9800;margin:1rem 0}
.info-box{background:#e3f2fd;padding:1rem;border-radius:5px;margin:1rem 0}
.positive-result{background:#ffebee;padding:2rem;border-radius:10px;border-left:5px solid #D32F2F;margin:1rem 0}
.negative-result{background:#e8f5e9;padding:2rem;border-radius:10px;border-left:5px solid #4CAF50;margin:1rem 0}
.metrics,.factors,.facts{display:flex;gap:16px}
.metrics .metric{flex:1;background:#fff;padding:12px;border-radius:8px}
.metric span{display:block;font-size:.8rem;color:#78716c}
.metric em{display:block;font-size:.8rem}
.factors>div,.facts>div{flex:1}
footer{text-align:center;color:#666;margin-top:2rem}
"#;

const ABOUT_SECTION: &str = r#"<h3>About Malaria in Nigeria</h3>
<div class="facts">
  <div><strong>Key Facts:</strong><ul>
    <li>Nigeria accounts for 27% of global malaria cases</li>
    <li>97% of population at risk of malaria</li>
    <li>Peak transmission during rainy season</li>
    <li>Children under 5 most vulnerable</li>
  </ul></div>
  <div><strong>Prevention:</strong><ul>
    <li>Sleep under treated mosquito nets</li>
    <li>Use insect repellent</li>
    <li>Eliminate stagnant water</li>
    <li>Take antimalarial prophylaxis when traveling</li>
  </ul></div>
</div>"#;

/// What the main panel shows below the disclaimer.
pub enum PageBody<'a> {
    /// Nothing submitted yet.
    Welcome,
    /// Rendered result section from the presenter.
    Result(&'a str),
    /// Submission rejected; the sidebar shows per-field messages.
    Rejected(&'a ValidationErrors),
    /// Body could not be parsed at all.
    Malformed(&'a str),
}

pub fn render_page(input: &PatientInput, body: PageBody<'_>) -> String {
    let errors = match &body {
        PageBody::Rejected(errors) => Some(*errors),
        _ => None,
    };
    let main = match body {
        PageBody::Welcome => format!(
            r#"<div class="info-box">Fill in the patient details in the sidebar and click "Predict Malaria Risk" to get started!</div>
{ABOUT_SECTION}"#
        ),
        PageBody::Result(section) => section.to_string(),
        PageBody::Rejected(_) => r#"<div class="warning-box">Some patient details are outside the accepted ranges. Correct the highlighted fields and submit again.</div>"#.to_string(),
        PageBody::Malformed(detail) => format!(
            r#"<div class="warning-box">The submission could not be read: {}</div>"#,
            escape_html(detail)
        ),
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<aside>
<form method="post" action="/predict">
{form}
<button type="submit">Predict Malaria Risk</button>
</form>
</aside>
<main>
<h1 class="main-title">{title}</h1>
<p class="subtitle">AI-Powered Malaria Screening for Nigerian Healthcare</p>
<div class="warning-box"><strong>Medical Disclaimer:</strong> {disclaimer}</div>
{main}
<footer>v{version}</footer>
</main>
</body>
</html>"##,
        title = config::APP_NAME,
        style = STYLE,
        form = render_form(input, errors),
        disclaimer = DISCLAIMER,
        main = main,
        version = config::APP_VERSION,
    )
}

// ═══════════════════════════════════════════════════════════
// Form controls
// ═══════════════════════════════════════════════════════════

fn render_form(input: &PatientInput, errors: Option<&ValidationErrors>) -> String {
    let err = |field: &str| -> String {
        errors
            .and_then(|e| e.for_field(field))
            .map(|e| format!(r#"<div class="field-error">{}</div>"#, escape_html(&e.to_string())))
            .unwrap_or_default()
    };

    let mut html = String::new();

    html.push_str("<h2>Patient Information</h2>");
    html.push_str(&int_input("age", "Age (years)", input.age, &AGE_RANGE));
    html.push_str(&err("age"));
    html.push_str(&real_input(
        "temperature_celsius",
        "Body Temperature (°C)",
        input.temperature_celsius,
        &TEMPERATURE_RANGE,
    ));
    html.push_str(&err("temperature_celsius"));
    html.push_str(&region_select(&input.region));
    html.push_str(&err("region"));
    html.push_str(&season_radio(&input.season));
    html.push_str(&err("season"));

    html.push_str("<h2>Environmental Factors</h2>");
    html.push_str(&yes_no(
        "lives_near_water",
        "Lives near stagnant water/swamp?",
        input.lives_near_water,
    ));
    html.push_str(&err("lives_near_water"));
    html.push_str(&yes_no("uses_mosquito_net", "Uses mosquito net?", input.uses_mosquito_net));
    html.push_str(&err("uses_mosquito_net"));
    html.push_str(&int_input(
        "previous_malaria_cases",
        "Previous malaria infections",
        input.previous_malaria_cases,
        &PREVIOUS_CASES_RANGE,
    ));
    html.push_str(&err("previous_malaria_cases"));

    html.push_str("<h2>Clinical Symptoms</h2>");
    html.push_str(&int_input(
        "days_of_fever",
        "Days of fever",
        input.days_of_fever,
        &FEVER_DAYS_RANGE,
    ));
    html.push_str(&err("days_of_fever"));
    html.push_str(&checkbox("has_headache", "Headache", input.has_headache));
    html.push_str(&checkbox("has_chills", "Chills/Rigors", input.has_chills));
    html.push_str(&checkbox("has_fatigue", "Fatigue/Weakness", input.has_fatigue));
    html.push_str(&checkbox("has_vomiting", "Vomiting/Nausea", input.has_vomiting));
    html.push_str(&checkbox("appetite_loss", "Loss of appetite", input.appetite_loss));

    html.push_str("<h2>Laboratory Results</h2>");
    html.push_str(&real_input(
        "red_blood_cell_count",
        "Red Blood Cell Count (million/µL)",
        input.red_blood_cell_count,
        &RBC_RANGE,
    ));
    html.push_str(&err("red_blood_cell_count"));
    html.push_str(&real_input(
        "white_blood_cell_count",
        "White Blood Cell Count (thousand/µL)",
        input.white_blood_cell_count,
        &WBC_RANGE,
    ));
    html.push_str(&err("white_blood_cell_count"));
    html
}

fn int_input(name: &str, label: &str, value: i64, range: &RangeInclusive<i64>) -> String {
    format!(
        r#"<label for="{name}">{label}</label><input type="number" id="{name}" name="{name}" min="{min}" max="{max}" step="1" value="{value}" required>"#,
        min = range.start(),
        max = range.end(),
    )
}

fn real_input(name: &str, label: &str, value: f64, range: &RangeInclusive<f64>) -> String {
    format!(
        r#"<label for="{name}">{label}</label><input type="number" id="{name}" name="{name}" min="{min:.1}" max="{max:.1}" step="0.1" value="{value}" required>"#,
        label = escape_html(label),
        min = range.start(),
        max = range.end(),
        value = reading(value),
    )
}

fn region_select(selected: &str) -> String {
    let options: String = Region::ALL
        .iter()
        .map(|r| {
            format!(
                r#"<option value="{value}"{sel}>{label}</option>"#,
                value = r.as_str(),
                sel = if r.as_str() == selected { " selected" } else { "" },
                label = r.label(),
            )
        })
        .collect();
    format!(
        r#"<label for="region">Region in Nigeria</label><select id="region" name="region">{options}</select>"#
    )
}

fn season_radio(selected: &str) -> String {
    let options: String = Season::ALL
        .iter()
        .map(|s| {
            format!(
                r#"<label><input type="radio" name="season" value="{value}"{checked}> {label}</label>"#,
                value = s.as_str(),
                checked = if s.as_str() == selected { " checked" } else { "" },
                label = s.label(),
            )
        })
        .collect();
    format!(r#"<label>Current Season</label><div class="choice">{options}</div>"#)
}

fn yes_no(name: &str, label: &str, value: i64) -> String {
    let checked = |v: i64| if value == v { " checked" } else { "" };
    format!(
        r#"<label>{label}</label><div class="choice"><label><input type="radio" name="{name}" value="0"{no}> No</label><label><input type="radio" name="{name}" value="1"{yes}> Yes</label></div>"#,
        no = checked(0),
        yes = checked(1),
    )
}

fn checkbox(name: &str, label: &str, value: i64) -> String {
    format!(
        r#"<label><input type="checkbox" name="{name}" value="1"{checked}> {label}</label>"#,
        checked = if value == 1 { " checked" } else { "" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_page_has_form_bounds_and_about() {
        let html = render_page(&PatientInput::default(), PageBody::Welcome);
        assert!(html.contains(r#"name="age" min="1" max="100" step="1" value="25""#));
        assert!(html.contains(
            r#"name="temperature_celsius" min="35.0" max="42.0" step="0.1" value="37.0""#
        ));
        assert!(html.contains(r#"name="white_blood_cell_count" min="2.0" max="15.0""#));
        assert!(html.contains("About Malaria in Nigeria"));
        assert!(html.contains(DISCLAIMER));
    }

    #[test]
    fn all_regions_and_seasons_offered() {
        let html = render_page(&PatientInput::default(), PageBody::Welcome);
        for region in Region::ALL {
            assert!(html.contains(&format!(r#"value="{}""#, region.as_str())));
        }
        assert!(html.contains(r#"value="South_South" selected"#));
        assert!(html.contains(r#"value="Dry_Season" checked"#));
        assert!(html.contains(r#"value="Rainy_Season">"#));
    }

    #[test]
    fn submitted_values_are_kept() {
        let input = PatientInput {
            season: "Rainy_Season".into(),
            has_chills: 1,
            uses_mosquito_net: 1,
            ..PatientInput::default()
        };
        let html = render_page(&input, PageBody::Result("<section>ok</section>"));
        assert!(html.contains(r#"value="Rainy_Season" checked"#));
        assert!(html.contains(r#"name="has_chills" value="1" checked"#));
        assert!(html.contains(r#"name="uses_mosquito_net" value="1" checked"#));
        assert!(html.contains("<section>ok</section>"));
        assert!(!html.contains("About Malaria in Nigeria"));
    }

    #[test]
    fn rejected_page_shows_field_errors() {
        let input = PatientInput {
            age: 150,
            ..PatientInput::default()
        };
        let errors = input.validate().unwrap_err();
        let html = render_page(&input, PageBody::Rejected(&errors));
        assert!(html.contains(r#"<div class="field-error">age = 150 is outside [1, 100]</div>"#));
    }

    #[test]
    fn malformed_detail_is_escaped() {
        let html = render_page(&PatientInput::default(), PageBody::Malformed("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("could not be read: <script>"));
    }
}
