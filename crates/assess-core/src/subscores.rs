//! Structured sub-field extraction for ELA and Mathematics families.
//!
//! A sub-component is included only when at least one constituent value is
//! present; absent components are omitted rather than zero-filled. Family
//! columns no rule recognizes are tagged into the unprocessed map for
//! traceability.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde_json::{Map, Value, json};

use assess_model::{AssessmentSourceFormat, CellValue, DataRow};

use crate::family::AssessmentFamily;

/// ELA named sub-components reported with level/scaled/percent triples.
const ELA_COMPONENTS: &[&str] = &[
    "Literary Text",
    "Informational Text",
    "Vocabulary",
    "Expression",
    "Conventions",
];

/// Start Strong components reported as percent/raw pairs.
const START_STRONG_COMPONENTS: &[&str] = &["Literature", "Informational"];

/// Mathematics named sub-components.
const MATH_COMPONENTS: &[&str] = &[
    "Major Content",
    "Additional and Supporting Content",
    "Modeling and Application",
    "Expressing Mathematical Reasoning",
    "Number and Operations",
];

/// Mathematics concept strands reported as percentages.
const MATH_CONCEPTS: &[&str] = &[
    "Operations and Algebraic Thinking",
    "Number and Operations in Base Ten",
    "Number and Operations - Fractions",
    "Ratios and Proportional Relationships",
    "Expressions and Equations",
    "Measurement and Data",
    "Statistics and Probability",
    "Geometry",
];

const QUESTION_TYPES: &[&str] = &[
    "Multiple Choice",
    "Open Ended",
    "Constructed Response",
    "Technology Enhanced",
];

/// Suffixes the score-resolution layer already consumes; they never land
/// in the unprocessed map.
const CORE_SUFFIXES: &[&str] = &[
    "Scaled",
    "Scale Score",
    "Scale Score (Scaled)",
    "Percent",
    "Raw",
    "Level",
    "Average",
    "Result Date",
    "SGP",
    "Student Growth Percentile",
];

/// ELA standards-code prefixes captured verbatim (LinkIt Form A exports).
static ELA_STANDARDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:L|RI|RL|RF|W|SL)\.").expect("ela standards regex"));

/// Math standards codes, e.g. `3.OA.A.1`.
static MATH_STANDARDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d\.[A-Z]{2,3}\.[A-Z]\.\d").expect("math standards regex"));

static DOK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDOK\s*(\d)\b").expect("dok regex"));

/// Output of subscore extraction for one (row, family) pair.
#[derive(Debug, Clone, Default)]
pub struct SubscoreExtraction {
    pub subscores: BTreeMap<String, Value>,
    pub unprocessed: BTreeMap<String, Value>,
}

/// Stable, collision-resistant key from an original field label.
pub fn normalize_key(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending = false;
    for ch in label.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending && !out.is_empty() {
                out.push('_');
            }
            pending = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending = true;
        }
    }
    out
}

/// Extracts structured subscores for one family, tagging anything
/// unrecognized into `unprocessed`.
pub fn extract_subscores(
    row: &DataRow,
    family: &AssessmentFamily,
    format: AssessmentSourceFormat,
) -> SubscoreExtraction {
    let mut extraction = SubscoreExtraction::default();
    let mut consumed: BTreeSet<String> = BTreeSet::new();

    let subject_lower = family.subject.to_lowercase();
    if subject_lower == "ela" {
        extract_ela(row, family, &mut extraction, &mut consumed);
    } else if subject_lower.contains("math") {
        extract_math(row, family, &mut extraction, &mut consumed);
    }

    collect_unprocessed(row, family, &consumed, &mut extraction);

    extraction.subscores.insert(
        "_metadata".to_string(),
        json!({
            "subject": family.subject,
            "column_prefix": family.prefix,
            "extracted_at": Utc::now().to_rfc3339(),
            "format": format.as_str(),
        }),
    );
    extraction
}

fn extract_ela(
    row: &DataRow,
    family: &AssessmentFamily,
    extraction: &mut SubscoreExtraction,
    consumed: &mut BTreeSet<String>,
) {
    for (suffix, key) in [
        ("Reading Scale Score (Scaled)", "reading_scale_score"),
        ("Writing Scale Score (Scaled)", "writing_scale_score"),
    ] {
        if let Some(value) = read_int(row, family, suffix, consumed) {
            extraction.subscores.insert(key.to_string(), json!(value));
        }
    }
    for (suffix, key) in [("Percent", "percent_score"), ("Raw", "raw_score")] {
        if let Some(value) = read_int(row, family, suffix, consumed) {
            extraction.subscores.insert(key.to_string(), json!(value));
        }
    }

    for component in ELA_COMPONENTS {
        if let Some(value) = component_triple(row, family, component, consumed) {
            extraction
                .subscores
                .insert(normalize_key(component), value);
        }
    }

    for component in START_STRONG_COMPONENTS {
        let percent = read_int(row, family, &format!("{component} (Percent)"), consumed);
        let raw = read_int(row, family, &format!("{component} (Raw)"), consumed);
        if percent.is_some() || raw.is_some() {
            let mut object = Map::new();
            if let Some(value) = percent {
                object.insert("percent_score".to_string(), json!(value));
            }
            if let Some(value) = raw {
                object.insert("raw_score".to_string(), json!(value));
            }
            extraction
                .subscores
                .insert(normalize_key(component), Value::Object(object));
        }
    }

    // Standards-aligned columns are kept verbatim under normalized keys.
    capture_matching(row, family, extraction, consumed, |suffix| {
        ELA_STANDARDS_RE.is_match(suffix) || suffix.to_uppercase().contains("DOK")
    });
}

fn extract_math(
    row: &DataRow,
    family: &AssessmentFamily,
    extraction: &mut SubscoreExtraction,
    consumed: &mut BTreeSet<String>,
) {
    for component in MATH_COMPONENTS {
        if let Some(value) = component_triple(row, family, component, consumed) {
            extraction
                .subscores
                .insert(normalize_key(component), value);
        }
    }

    for concept in MATH_CONCEPTS {
        if let Some(value) = read_int(row, family, &format!("{concept} (Percent)"), consumed) {
            extraction
                .subscores
                .insert(format!("{}_percent", normalize_key(concept)), json!(value));
        }
    }

    for dok in 1..=4 {
        if let Some(value) = read_int(row, family, &format!("DOK {dok} (Percent)"), consumed) {
            extraction
                .subscores
                .insert(format!("dok_{dok}_percent"), json!(value));
        }
    }

    for question_type in QUESTION_TYPES {
        if let Some(value) = read_int(row, family, &format!("{question_type} (Percent)"), consumed)
        {
            extraction.subscores.insert(
                format!("{}_percent", normalize_key(question_type)),
                json!(value),
            );
        }
    }

    capture_matching(row, family, extraction, consumed, |suffix| {
        MATH_STANDARDS_RE.is_match(suffix) || DOK_RE.is_match(suffix)
    });
}

/// Reads one family column as an integer. The suffix is marked consumed
/// only when a value was actually extracted, so a present-but-unparseable
/// cell still reaches the unprocessed map.
fn read_int(
    row: &DataRow,
    family: &AssessmentFamily,
    suffix: &str,
    consumed: &mut BTreeSet<String>,
) -> Option<i64> {
    let value = row
        .first_present(&family.keys(suffix))
        .and_then(CellValue::as_int);
    if value.is_some() {
        consumed.insert(suffix.to_string());
    }
    value
}

fn read_text(
    row: &DataRow,
    family: &AssessmentFamily,
    suffix: &str,
    consumed: &mut BTreeSet<String>,
) -> Option<String> {
    consumed.insert(suffix.to_string());
    row.text(&family.keys(suffix))
}

/// Builds a `{level, scaled_score, percent_score}` object when any of the
/// three is present.
fn component_triple(
    row: &DataRow,
    family: &AssessmentFamily,
    component: &str,
    consumed: &mut BTreeSet<String>,
) -> Option<Value> {
    let level = read_text(row, family, &format!("{component} (Level)"), consumed)
        .or_else(|| read_text(row, family, &format!("{component} Level"), consumed));
    let scaled = read_int(row, family, &format!("{component} (Scaled)"), consumed)
        .or_else(|| read_int(row, family, &format!("{component} Scaled"), consumed));
    let percent = read_int(row, family, &format!("{component} (Percent)"), consumed)
        .or_else(|| read_int(row, family, &format!("{component} Percent"), consumed));

    if level.is_none() && scaled.is_none() && percent.is_none() {
        return None;
    }
    let mut object = Map::new();
    if let Some(value) = level {
        object.insert("level".to_string(), json!(value));
    }
    if let Some(value) = scaled {
        object.insert("scaled_score".to_string(), json!(value));
    }
    if let Some(value) = percent {
        object.insert("percent_score".to_string(), json!(value));
    }
    Some(Value::Object(object))
}

/// Captures family columns whose suffix matches `pred`, verbatim.
fn capture_matching(
    row: &DataRow,
    family: &AssessmentFamily,
    extraction: &mut SubscoreExtraction,
    consumed: &mut BTreeSet<String>,
    pred: impl Fn(&str) -> bool,
) {
    let prefixed = format!("{} - ", family.prefix);
    for (key, value) in row.iter() {
        let Some(suffix) = key.strip_prefix(prefixed.as_str()) else {
            continue;
        };
        if !pred(suffix) || value.is_empty() || consumed.contains(suffix) {
            continue;
        }
        consumed.insert(suffix.to_string());
        extraction
            .subscores
            .insert(normalize_key(suffix), json!(value.display()));
    }
}

fn collect_unprocessed(
    row: &DataRow,
    family: &AssessmentFamily,
    consumed: &BTreeSet<String>,
    extraction: &mut SubscoreExtraction,
) {
    let prefixed = format!("{} - ", family.prefix);
    for (key, value) in row.iter() {
        let Some(suffix) = key.strip_prefix(prefixed.as_str()) else {
            continue;
        };
        if value.is_empty()
            || consumed.contains(suffix)
            || CORE_SUFFIXES.contains(&suffix)
        {
            continue;
        }
        extraction
            .unprocessed
            .insert(normalize_key(suffix), json!(value.display()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_key_is_stable() {
        assert_eq!(normalize_key("Literary Text"), "literary_text");
        assert_eq!(normalize_key("  DOK 2 (Percent) "), "dok_2_percent");
        assert_eq!(normalize_key("L.RF.3"), "l_rf_3");
    }

    #[test]
    fn absent_components_are_omitted() {
        let family = AssessmentFamily::parse("Gr 3 ELA NJSLS Form A");
        let row: DataRow = [("Gr 3 ELA NJSLS Form A - Vocabulary (Percent)", 68i64)]
            .into_iter()
            .collect();
        let extraction =
            extract_subscores(&row, &family, AssessmentSourceFormat::LinkItNjslsFormA);
        assert!(extraction.subscores.contains_key("vocabulary"));
        assert!(!extraction.subscores.contains_key("conventions"));
        let vocab = &extraction.subscores["vocabulary"];
        assert_eq!(vocab["percent_score"], json!(68));
        assert!(vocab.get("level").is_none());
    }

    #[test]
    fn metadata_always_present() {
        let family = AssessmentFamily::parse("Start Strong Math");
        let extraction = extract_subscores(
            &DataRow::new(),
            &family,
            AssessmentSourceFormat::StartStrong,
        );
        let metadata = &extraction.subscores["_metadata"];
        assert_eq!(metadata["subject"], json!("Mathematics"));
        assert_eq!(metadata["column_prefix"], json!("Start Strong Math"));
        assert_eq!(metadata["format"], json!("Start Strong"));
    }

    #[test]
    fn standards_codes_captured_verbatim() {
        let family = AssessmentFamily::parse("Gr 3 ELA NJSLS Form A");
        let row: DataRow = [("Gr 3 ELA NJSLS Form A - RL.2.1", "3/4")]
            .into_iter()
            .collect();
        let extraction =
            extract_subscores(&row, &family, AssessmentSourceFormat::LinkItNjslsFormA);
        assert_eq!(extraction.subscores["rl_2_1"], json!("3/4"));
    }

    #[test]
    fn unrecognized_columns_are_tagged() {
        let family = AssessmentFamily::parse("Gr 3 ELA NJSLS Form A");
        let row: DataRow = [("Gr 3 ELA NJSLS Form A - Teacher Comment", "promote")]
            .into_iter()
            .collect();
        let extraction =
            extract_subscores(&row, &family, AssessmentSourceFormat::LinkItNjslsFormA);
        assert_eq!(extraction.unprocessed["teacher_comment"], json!("promote"));
        assert!(!extraction.subscores.contains_key("teacher_comment"));
    }

    #[test]
    fn unparseable_component_values_stay_traceable() {
        let family = AssessmentFamily::parse("Gr 3 ELA NJSLS Form A");
        let row: DataRow = [("Gr 3 ELA NJSLS Form A - Vocabulary (Percent)", "N/A")]
            .into_iter()
            .collect();
        let extraction =
            extract_subscores(&row, &family, AssessmentSourceFormat::LinkItNjslsFormA);
        assert!(!extraction.subscores.contains_key("vocabulary"));
        assert_eq!(extraction.unprocessed["vocabulary_percent"], json!("N/A"));
    }

    #[test]
    fn math_dok_percentages() {
        let family = AssessmentFamily::parse("Gr 6 Math NJSLS Form B");
        let row: DataRow = [
            ("Gr 6 Math NJSLS Form B - DOK 2 (Percent)", "55"),
            ("Gr 6 Math NJSLS Form B - Geometry (Percent)", "70"),
            ("Gr 6 Math NJSLS Form B - Major Content (Level)", "Proficient"),
        ]
        .into_iter()
        .collect();
        let extraction =
            extract_subscores(&row, &family, AssessmentSourceFormat::LinkItNjslsFormB);
        assert_eq!(extraction.subscores["dok_2_percent"], json!(55));
        assert_eq!(extraction.subscores["geometry_percent"], json!(70));
        assert_eq!(
            extraction.subscores["major_content"]["level"],
            json!("Proficient")
        );
        assert!(extraction.unprocessed.is_empty());
    }
}
