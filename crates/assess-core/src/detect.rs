//! Assessment source-format detection.
//!
//! Formats are not mutually exclusive in raw column presence, so detection
//! is an ordered list of `(rule, outcome)` pairs evaluated first-match-wins.
//! The ordering is load-bearing: an NJSLA export also carries generic
//! `Percent`/`Level` markers that would otherwise read as a LinkIt file.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use assess_model::{AssessmentSourceFormat, DataRow};

/// Fine-grained standards code, e.g. `L.RF.3` or `SL.PE.1` (letter group,
/// dot, letter group, dot, optional letter, digit).
static STANDARDS_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z]{1,2}\.[A-Za-z]{1,3}\.(?:[A-Za-z]\.)?\d").expect("standards regex")
});

static GRADE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bgr\s*\d+|\bgrade\s*\d+").expect("grade token regex"));

static SUBJECT_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bela\b|math|science").expect("subject token regex"));

const GENERIC_MARKERS: &[&str] = &["result date", "level", "scaled", "scale score"];

/// True when a header belongs to an assessment column family rather than a
/// roster/demographic column.
pub fn is_assessment_header(header: &str) -> bool {
    let lower = header.to_lowercase();
    if lower.contains("njsla") || lower.contains("assessment") || lower.contains("test") {
        return true;
    }
    if GRADE_TOKEN_RE.is_match(header) && SUBJECT_TOKEN_RE.is_match(header) {
        return true;
    }
    GENERIC_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Distinct assessment family prefixes, in first-seen header order.
///
/// The prefix is the text before the first `" - "` separator; duplicate
/// prefixes collapse into one family.
pub fn assessment_families(headers: &[String]) -> Vec<String> {
    let mut families: Vec<String> = Vec::new();
    for header in headers {
        if !is_assessment_header(header) {
            continue;
        }
        let prefix = header
            .split_once(" - ")
            .map_or(header.trim(), |(prefix, _)| prefix.trim());
        if prefix.is_empty() {
            continue;
        }
        if !families.iter().any(|known| known == prefix) {
            families.push(prefix.to_string());
        }
    }
    families
}

/// One row's columns viewed through a family prefix.
struct FamilyView<'a> {
    row: &'a DataRow,
    prefix: &'a str,
}

impl FamilyView<'_> {
    /// Column presence, by prefixed key or bare suffix.
    fn has(&self, suffix: &str) -> bool {
        self.row
            .contains_key(&format!("{} - {}", self.prefix, suffix))
            || self.row.contains_key(suffix)
    }

    /// Suffixes of all columns under this family's prefix.
    fn suffixes(&self) -> impl Iterator<Item = &str> {
        let prefixed = format!("{} - ", self.prefix);
        self.row.keys().filter_map(move |key| {
            key.strip_prefix(prefixed.as_str())
        })
    }

    fn any_suffix(&self, pred: impl Fn(&str) -> bool) -> bool {
        self.suffixes().any(|suffix| pred(suffix))
    }
}

type FormatRule = fn(&FamilyView<'_>) -> Option<AssessmentSourceFormat>;

/// Detection rules in precedence order; the first that yields an outcome
/// wins.
const RULES: &[(&str, FormatRule)] = &[
    ("njsla-scale-scores", njsla_rule),
    ("start-strong-components", start_strong_rule),
    ("form-a-standards-codes", form_a_rule),
    ("form-b-markers", form_b_rule),
    ("generic-markers", generic_marker_rule),
];

fn njsla_rule(view: &FamilyView<'_>) -> Option<AssessmentSourceFormat> {
    if view.has("Reading Scale Score (Scaled)")
        || view.has("Writing Scale Score (Scaled)")
        || view.has("Reading Scale Score")
        || view.has("Writing Scale Score")
    {
        return Some(AssessmentSourceFormat::Njsla);
    }
    None
}

fn start_strong_rule(view: &FamilyView<'_>) -> Option<AssessmentSourceFormat> {
    for component in ["Literature", "Informational"] {
        for kind in ["Percent", "Raw"] {
            if view.has(&format!("{component} ({kind})")) {
                return Some(AssessmentSourceFormat::StartStrong);
            }
        }
    }
    None
}

fn form_a_rule(view: &FamilyView<'_>) -> Option<AssessmentSourceFormat> {
    if view.any_suffix(|suffix| STANDARDS_CODE_RE.is_match(suffix)) {
        return Some(AssessmentSourceFormat::LinkItNjslsFormA);
    }
    None
}

fn form_b_rule(view: &FamilyView<'_>) -> Option<AssessmentSourceFormat> {
    let has_percent = view.has("Percent");
    let has_raw = view.has("Raw");
    if !has_percent && !has_raw {
        return None;
    }
    let has_indicator = view.any_suffix(|suffix| {
        let lower = suffix.to_lowercase();
        lower.contains("form b") || lower.contains("njsls")
    }) || (has_percent && has_raw);
    if has_indicator {
        return Some(AssessmentSourceFormat::LinkItNjslsFormB);
    }
    None
}

fn generic_marker_rule(view: &FamilyView<'_>) -> Option<AssessmentSourceFormat> {
    let has_marker = ["Result Date", "Level", "Average", "Percent", "Scaled"]
        .iter()
        .any(|marker| view.has(marker));
    if !has_marker {
        return None;
    }
    // Weak signals only: let the prefix text itself disambiguate.
    let prefix = view.prefix.to_lowercase();
    if prefix.contains("form a") {
        return Some(AssessmentSourceFormat::LinkItNjslsFormA);
    }
    if prefix.contains("form b") {
        return Some(AssessmentSourceFormat::LinkItNjslsFormB);
    }
    if prefix.contains("start strong") {
        return Some(AssessmentSourceFormat::StartStrong);
    }
    if prefix.contains("njsla") {
        return Some(AssessmentSourceFormat::Njsla);
    }
    Some(AssessmentSourceFormat::LinkItNjsls)
}

/// Detects which source format produced the columns of one family.
///
/// Deterministic: the same header set with the same prefix always yields
/// the same format.
pub fn detect_format(row: &DataRow, prefix: &str) -> AssessmentSourceFormat {
    let view = FamilyView { row, prefix };
    for (name, rule) in RULES {
        if let Some(format) = rule(&view) {
            debug!(rule = name, prefix, %format, "assessment format detected");
            return format;
        }
    }
    AssessmentSourceFormat::Generic
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_with(keys: &[&str]) -> DataRow {
        keys.iter().map(|key| (*key, "1")).collect()
    }

    #[test]
    fn njsla_beats_generic_markers() {
        let row = row_with(&[
            "2023-24 Gr 4 ELA NJSLA - Reading Scale Score (Scaled)",
            "2023-24 Gr 4 ELA NJSLA - Level",
            "2023-24 Gr 4 ELA NJSLA - Percent",
        ]);
        assert_eq!(
            detect_format(&row, "2023-24 Gr 4 ELA NJSLA"),
            AssessmentSourceFormat::Njsla
        );
    }

    #[test]
    fn start_strong_from_component_columns() {
        let row = row_with(&["Start Strong ELA - Literature (Raw)"]);
        assert_eq!(
            detect_format(&row, "Start Strong ELA"),
            AssessmentSourceFormat::StartStrong
        );
    }

    #[test]
    fn standards_codes_mean_form_a() {
        let row = row_with(&[
            "Gr 3 ELA NJSLS - L.RF.3",
            "Gr 3 ELA NJSLS - Percent",
        ]);
        assert_eq!(
            detect_format(&row, "Gr 3 ELA NJSLS"),
            AssessmentSourceFormat::LinkItNjslsFormA
        );
    }

    #[test]
    fn percent_plus_raw_means_form_b() {
        let row = row_with(&["Gr 6 Math Test - Percent", "Gr 6 Math Test - Raw"]);
        assert_eq!(
            detect_format(&row, "Gr 6 Math Test"),
            AssessmentSourceFormat::LinkItNjslsFormB
        );
    }

    #[test]
    fn prefix_text_disambiguates_weak_signals() {
        let row = row_with(&["Gr 5 ELA Form A Benchmark - Level"]);
        assert_eq!(
            detect_format(&row, "Gr 5 ELA Form A Benchmark"),
            AssessmentSourceFormat::LinkItNjslsFormA
        );

        let row = row_with(&["Gr 5 ELA Assessment - Level"]);
        assert_eq!(
            detect_format(&row, "Gr 5 ELA Assessment"),
            AssessmentSourceFormat::LinkItNjsls
        );
    }

    #[test]
    fn no_assessment_columns_is_generic() {
        let row = row_with(&["First Name", "Last Name"]);
        assert_eq!(
            detect_format(&row, "Gr 5 ELA Assessment"),
            AssessmentSourceFormat::Generic
        );
    }

    #[test]
    fn families_group_by_prefix() {
        let headers: Vec<String> = [
            "Student ID",
            "2023-24 Gr 4 ELA NJSLA - Scaled",
            "2023-24 Gr 4 ELA NJSLA - Level",
            "2023-24 Gr 4 Math NJSLA - Scaled",
        ]
        .iter()
        .map(|h| (*h).to_string())
        .collect();
        let families = assessment_families(&headers);
        assert_eq!(
            families,
            vec![
                "2023-24 Gr 4 ELA NJSLA".to_string(),
                "2023-24 Gr 4 Math NJSLA".to_string(),
            ]
        );
    }

    #[test]
    fn detection_is_deterministic() {
        let row = row_with(&["Gr 6 Math Test - Percent", "Gr 6 Math Test - Raw"]);
        let first = detect_format(&row, "Gr 6 Math Test");
        let second = detect_format(&row, "Gr 6 Math Test");
        assert_eq!(first, second);
    }
}
