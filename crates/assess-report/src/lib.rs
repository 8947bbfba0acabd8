//! Summary aggregation over assembled assessment records.
//!
//! Consumed by the operator-review surface after a batch completes.
//! Statistics are only meaningful over the full assessment set, so callers
//! aggregate once per completed batch, never incrementally.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use assess_model::AssessmentRecord;

/// Aggregate shape shared by the overall summary and every subject/grade
/// subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreAggregate {
    pub count: usize,
    pub average_scale_score: f64,
    /// Buckets keyed by the verbatim performance label; differently-cased
    /// labels are distinct buckets. Empty labels are skipped.
    pub performance_level_distribution: BTreeMap<String, usize>,
}

/// Roll-up statistics for one processed batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Distinct students among the assessments; a parsed student with zero
    /// assessments does not count.
    pub total_students: usize,
    pub total_assessments: usize,
    pub average_scale_score: f64,
    pub performance_level_distribution: BTreeMap<String, usize>,
    pub subject_breakdown: BTreeMap<String, ScoreAggregate>,
    pub grade_breakdown: BTreeMap<String, ScoreAggregate>,
}

/// Rounds to two decimal places, the precision shown to operators.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn aggregate<'a, I>(records: I) -> ScoreAggregate
where
    I: IntoIterator<Item = &'a AssessmentRecord>,
{
    let mut count = 0usize;
    let mut total = 0i64;
    let mut distribution: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        count += 1;
        total += record.scale_score;
        if !record.performance_level_text.is_empty() {
            *distribution
                .entry(record.performance_level_text.clone())
                .or_insert(0) += 1;
        }
    }
    let average = if count == 0 {
        0.0
    } else {
        round2(total as f64 / count as f64)
    };
    ScoreAggregate {
        count,
        average_scale_score: average,
        performance_level_distribution: distribution,
    }
}

/// Computes the batch summary over the full assessment set.
pub fn summarize(assessments: &[AssessmentRecord]) -> ImportSummary {
    let students: BTreeSet<&str> = assessments
        .iter()
        .map(|record| record.student_id.as_str())
        .filter(|id| !id.is_empty())
        .collect();

    let overall = aggregate(assessments.iter());

    let mut subjects: BTreeSet<&str> = BTreeSet::new();
    let mut grades: BTreeSet<&str> = BTreeSet::new();
    for record in assessments {
        subjects.insert(record.subject.as_str());
        grades.insert(record.grade_level.as_str());
    }

    let subject_breakdown = subjects
        .into_iter()
        .map(|subject| {
            let subset = assessments.iter().filter(|r| r.subject == subject);
            (subject.to_string(), aggregate(subset))
        })
        .collect();
    let grade_breakdown = grades
        .into_iter()
        .map(|grade| {
            let subset = assessments.iter().filter(|r| r.grade_level == grade);
            (grade.to_string(), aggregate(subset))
        })
        .collect();

    ImportSummary {
        total_students: students.len(),
        total_assessments: assessments.len(),
        average_scale_score: overall.average_scale_score,
        performance_level_distribution: overall.performance_level_distribution,
        subject_breakdown,
        grade_breakdown,
    }
}
