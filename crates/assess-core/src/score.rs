//! Primary-score extraction and score-range resolution.
//!
//! Score range resolution is an ordered chain: percent-based subject list,
//! benchmark form override, Start Strong descriptive bounds, matched
//! config, grade/subject table, then the 0-0 default.

use serde::Serialize;

use assess_model::{
    AssessmentConfig, AssessmentSourceFormat, DataRow, ScoreType, ScoringMethod,
    grade_subject_range, is_percent_based_subject,
};

use crate::family::AssessmentFamily;

/// Start Strong reports performance levels only; its bounds are
/// descriptive text rather than numbers.
pub const NO_NUMERIC_RANGE: &str = "Not scored with numerical values";

/// Resolved primary score for one (row, family) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResolution {
    /// Primary score. Falls back to percent or raw when the format has no
    /// true scale score; absent and zero are indistinguishable here.
    pub scale_score: i64,
    /// Raw score, extracted independently of primary-score selection.
    pub raw_score: Option<i64>,
    pub percent_score: Option<i64>,
    pub score_type: ScoreType,
    pub min_possible_score: String,
    pub max_possible_score: String,
    /// Vendor performance label, verbatim. Never re-derived from the score.
    pub performance_level_text: String,
}

fn scaled_keys(family: &AssessmentFamily) -> Vec<String> {
    let mut keys = Vec::new();
    for suffix in ["Scaled", "Scale Score (Scaled)", "Scale Score"] {
        keys.extend(family.keys(suffix));
    }
    keys
}

fn percent_keys(family: &AssessmentFamily) -> Vec<String> {
    family.keys("Percent").to_vec()
}

fn raw_keys(family: &AssessmentFamily) -> Vec<String> {
    family.keys("Raw").to_vec()
}

/// Raw-score candidates for the percent-score fallback. Start Strong files
/// carry raw counts only on their component columns.
fn raw_fallback_keys(family: &AssessmentFamily) -> Vec<String> {
    let mut keys = raw_keys(family);
    keys.extend(family.keys("Literature (Raw)"));
    keys.extend(family.keys("Informational (Raw)"));
    keys
}

/// Resolves the primary score, independent raw/percent reads, score range,
/// and performance label for one family on one row.
pub fn resolve_score(
    row: &DataRow,
    family: &AssessmentFamily,
    config: Option<&AssessmentConfig>,
    format: AssessmentSourceFormat,
) -> ScoreResolution {
    let scaled = scaled_keys(family);
    let percent = percent_keys(family);
    let raw = raw_keys(family);

    let (scale_score, score_type) = match config.map(|c| c.scoring_method) {
        Some(ScoringMethod::PercentScore) => {
            // Start Strong special case: raw substitutes for percent when
            // no percent column exists.
            let value = if row.first_present(&percent).is_some() {
                row.int_or_zero(&percent)
            } else {
                row.int_or_zero(&raw_fallback_keys(family))
            };
            (value, ScoreType::PercentScore)
        }
        Some(ScoringMethod::ScaleScore) => (row.int_or_zero(&scaled), ScoreType::ScaleScore),
        Some(ScoringMethod::Mixed) => {
            if row.first_present(&scaled).is_some() {
                (row.int_or_zero(&scaled), ScoreType::ScaleScore)
            } else {
                (row.int_or_zero(&percent), ScoreType::PercentScore)
            }
        }
        None => {
            let scaled_value = row.int_or_zero(&scaled);
            let percent_value = row.int_or_zero(&percent);
            let raw_value = row.int_or_zero(&raw);
            if scaled_value != 0 {
                (scaled_value, ScoreType::ScaleScore)
            } else if percent_value != 0 {
                (percent_value, ScoreType::PercentScore)
            } else if raw_value != 0 {
                (raw_value, ScoreType::RawScore)
            } else {
                (0, ScoreType::ScaleScore)
            }
        }
    };

    let (min_possible_score, max_possible_score) =
        resolve_range(config, format, &family.subject, &family.grade);

    ScoreResolution {
        scale_score,
        raw_score: row.int_opt(&raw),
        percent_score: row.int_opt(&percent),
        score_type,
        min_possible_score,
        max_possible_score,
        performance_level_text: row
            .text(&level_keys(family))
            .unwrap_or_default(),
    }
}

fn level_keys(family: &AssessmentFamily) -> Vec<String> {
    let mut keys = family.keys("Level").to_vec();
    keys.extend(family.keys("Average"));
    keys
}

fn resolve_range(
    config: Option<&AssessmentConfig>,
    format: AssessmentSourceFormat,
    subject: &str,
    grade: &str,
) -> (String, String) {
    if is_percent_based_subject(subject) {
        return ("0".to_string(), "100".to_string());
    }
    if format.is_benchmark_form() {
        return ("0".to_string(), "100".to_string());
    }
    if format == AssessmentSourceFormat::StartStrong {
        return (NO_NUMERIC_RANGE.to_string(), NO_NUMERIC_RANGE.to_string());
    }
    if let Some(config) = config {
        return (
            config.score_range.min.to_string(),
            config.score_range.max.to_string(),
        );
    }
    if let Some(range) = grade_subject_range(grade, subject) {
        return (range.min.to_string(), range.max.to_string());
    }
    ("0".to_string(), "0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_model::config_for;

    fn family(prefix: &str) -> AssessmentFamily {
        AssessmentFamily::parse(prefix)
    }

    #[test]
    fn raw_substitutes_for_missing_percent() {
        let family = family("Start Strong ELA");
        let row: DataRow = [("Start Strong ELA - Literature (Raw)", 18i64)]
            .into_iter()
            .collect();
        let config = config_for(&family.grade, &family.subject, AssessmentSourceFormat::StartStrong);
        let resolution = resolve_score(
            &row,
            &family,
            config.as_ref(),
            AssessmentSourceFormat::StartStrong,
        );
        assert_eq!(resolution.scale_score, 18);
        assert_eq!(resolution.score_type, ScoreType::PercentScore);
        assert_eq!(resolution.min_possible_score, NO_NUMERIC_RANGE);
        assert_eq!(resolution.max_possible_score, NO_NUMERIC_RANGE);
    }

    #[test]
    fn percent_preferred_when_present() {
        let family = family("Start Strong Math");
        let row: DataRow = [
            ("Start Strong Math - Percent", 64i64),
            ("Start Strong Math - Raw", 16i64),
        ]
        .into_iter()
        .collect();
        let config = config_for(&family.grade, &family.subject, AssessmentSourceFormat::StartStrong);
        let resolution = resolve_score(
            &row,
            &family,
            config.as_ref(),
            AssessmentSourceFormat::StartStrong,
        );
        assert_eq!(resolution.scale_score, 64);
        assert_eq!(resolution.raw_score, Some(16));
    }

    #[test]
    fn mixed_falls_back_to_percent() {
        let family = family("Gr 4 Math NJSLS Form B");
        let row: DataRow = [("Gr 4 Math NJSLS Form B - Percent", 72i64)]
            .into_iter()
            .collect();
        let config = config_for("4", "Mathematics", AssessmentSourceFormat::LinkItNjslsFormB);
        let resolution = resolve_score(
            &row,
            &family,
            config.as_ref(),
            AssessmentSourceFormat::LinkItNjslsFormB,
        );
        assert_eq!(resolution.scale_score, 72);
        assert_eq!(resolution.score_type, ScoreType::PercentScore);
        assert_eq!(resolution.min_possible_score, "0");
        assert_eq!(resolution.max_possible_score, "100");
    }

    #[test]
    fn no_config_prefers_scaled_then_percent_then_raw() {
        let family = family("Gr 4 ELA NJSLA");
        let row: DataRow = [("Gr 4 ELA NJSLA - Raw", 31i64)].into_iter().collect();
        let resolution =
            resolve_score(&row, &family, None, AssessmentSourceFormat::LinkItNjsls);
        assert_eq!(resolution.scale_score, 31);
        assert_eq!(resolution.score_type, ScoreType::RawScore);
    }

    #[test]
    fn percent_subject_forces_percent_range() {
        let family = family("2023-24 Gr 7 Art Benchmark");
        assert_eq!(family.subject, "Art");
        let row = DataRow::new();
        let resolution = resolve_score(&row, &family, None, AssessmentSourceFormat::LinkItNjsls);
        assert_eq!(resolution.min_possible_score, "0");
        assert_eq!(resolution.max_possible_score, "100");
    }

    #[test]
    fn replacement_math_forces_percent_range() {
        let family = family("2023-24 Gr 7 Replacement Mathematics Benchmark");
        assert_eq!(family.subject, "Replacement Mathematics");
        let resolution =
            resolve_score(&DataRow::new(), &family, None, AssessmentSourceFormat::LinkItNjsls);
        assert_eq!(resolution.min_possible_score, "0");
        assert_eq!(resolution.max_possible_score, "100");
    }

    #[test]
    fn performance_level_passed_through_verbatim() {
        let family = family("Gr 4 ELA NJSLA");
        let row: DataRow = [
            ("Gr 4 ELA NJSLA - Scaled", "742"),
            ("Gr 4 ELA NJSLA - Level", "Met Expectations "),
        ]
        .into_iter()
        .collect();
        let config = config_for("4", "ELA", AssessmentSourceFormat::Njsla);
        let resolution =
            resolve_score(&row, &family, config.as_ref(), AssessmentSourceFormat::Njsla);
        assert_eq!(resolution.performance_level_text, "Met Expectations");
        assert_eq!(resolution.scale_score, 742);
        assert_eq!(resolution.min_possible_score, "650");
        assert_eq!(resolution.max_possible_score, "850");
    }
}
