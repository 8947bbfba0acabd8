//! Static assessment scoring reference data.
//!
//! These tables are read-only: built once, never mutated at runtime, and
//! passed into the scoring engine rather than consulted as ambient state.

use serde::{Deserialize, Serialize};

use crate::format::AssessmentSourceFormat;

/// How the primary score for an administration is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    ScaleScore,
    PercentScore,
    /// Scale score preferred, percent accepted as fallback.
    Mixed,
}

/// Which score ended up as the primary `scaleScore` of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreType {
    ScaleScore,
    PercentScore,
    RawScore,
}

/// Inclusive numeric score bounds for an administration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: i64,
    pub max: i64,
}

/// Scoring configuration for one (grade, subject, form) combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentConfig {
    pub display_name: String,
    pub scoring_method: ScoringMethod,
    pub score_range: ScoreRange,
    pub format: AssessmentSourceFormat,
}

/// Subjects that are always graded on a 0-100 percent basis, regardless of
/// any config in play.
const PERCENT_BASED_SUBJECTS: &[&str] = &[
    "Spanish",
    "Technology Education",
    "Social Studies",
    "Physical Education",
    "Music",
    "Health",
    "Art",
    "Band",
    "SEL",
    "LA",
    "Replacement Mathematics",
    "Replacement Language Arts",
];

/// True when the subject is on the fixed percent-based list.
pub fn is_percent_based_subject(subject: &str) -> bool {
    let trimmed = subject.trim();
    PERCENT_BASED_SUBJECTS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(trimmed))
}

/// Static grade/subject score-range table for state administrations.
///
/// NJSLA ELA and Mathematics report on the 650-850 scale for all tested
/// grades; NJSLA Science reports on 100-300.
pub fn grade_subject_range(_grade: &str, subject: &str) -> Option<ScoreRange> {
    let subject = subject.trim().to_lowercase();
    if subject.contains("ela") || subject.contains("math") {
        return Some(ScoreRange { min: 650, max: 850 });
    }
    if subject.contains("science") {
        return Some(ScoreRange { min: 100, max: 300 });
    }
    None
}

/// Looks up the scoring configuration for a detected (grade, subject, form)
/// combination. Returns `None` when the format carries no known config.
pub fn config_for(
    grade: &str,
    subject: &str,
    format: AssessmentSourceFormat,
) -> Option<AssessmentConfig> {
    let (scoring_method, score_range) = match format {
        AssessmentSourceFormat::Njsla => {
            let range = grade_subject_range(grade, subject)?;
            (ScoringMethod::ScaleScore, range)
        }
        AssessmentSourceFormat::StartStrong => {
            (ScoringMethod::PercentScore, ScoreRange { min: 0, max: 100 })
        }
        AssessmentSourceFormat::LinkItNjslsFormA
        | AssessmentSourceFormat::LinkItNjslsFormB
        | AssessmentSourceFormat::LinkItNjsls => {
            (ScoringMethod::Mixed, ScoreRange { min: 0, max: 100 })
        }
        AssessmentSourceFormat::Generic => return None,
    };
    Some(AssessmentConfig {
        display_name: format!("{} {} Grade {}", format.as_str(), subject.trim(), grade.trim()),
        scoring_method,
        score_range,
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_subjects_match_case_insensitively() {
        assert!(is_percent_based_subject("art"));
        assert!(is_percent_based_subject(" Physical Education "));
        assert!(!is_percent_based_subject("ELA"));
    }

    #[test]
    fn njsla_config_uses_scale_range() {
        let config = config_for("4", "ELA", AssessmentSourceFormat::Njsla).unwrap();
        assert_eq!(config.scoring_method, ScoringMethod::ScaleScore);
        assert_eq!(config.score_range, ScoreRange { min: 650, max: 850 });
    }

    #[test]
    fn science_scale_differs() {
        let range = grade_subject_range("5", "Science").unwrap();
        assert_eq!(range, ScoreRange { min: 100, max: 300 });
    }

    #[test]
    fn generic_has_no_config() {
        assert!(config_for("4", "ELA", AssessmentSourceFormat::Generic).is_none());
    }
}
