use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One canonical assessment result for a student on one test administration.
///
/// `scale_score` is always populated: when the source format has no true
/// scale score, the percent or raw score stands in. The score bounds are
/// always populated too, using descriptive text when the format has no
/// numeric ceiling (Start Strong).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub student_id: String,
    /// Derived from `(assessment_type, grade_level, student_id)`; stable
    /// across re-imports of the same file so callers can detect duplicates.
    pub assessment_id: String,
    /// Uppercase categorical tag, e.g. `LINKIT_NJSLS_MATH_FORM_A`.
    pub assessment_type: String,
    pub subject: String,
    pub grade_level: String,
    pub school_year: Option<String>,
    pub test_date: Option<String>,
    pub raw_score: Option<i64>,
    pub scale_score: i64,
    /// Vendor-assigned performance label, passed through verbatim.
    pub performance_level_text: String,
    pub min_possible_score: String,
    pub max_possible_score: String,
    pub student_growth_percentile: Option<i64>,
    pub subscores: BTreeMap<String, serde_json::Value>,
    /// Family columns no extraction rule recognized, kept for traceability.
    pub unprocessed_data: BTreeMap<String, serde_json::Value>,
    pub completed_at: DateTime<Utc>,
}

/// Deterministic assessment identifier for idempotent re-import detection.
///
/// Not globally unique across repeated imports by design; deduplication is
/// the persistence layer's responsibility.
pub fn assessment_id(assessment_type: &str, grade_level: &str, student_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(assessment_type.as_bytes());
    hasher.update(b":");
    hasher.update(grade_level.as_bytes());
    hasher.update(b":");
    hasher.update(student_id.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assessment_id_is_stable() {
        let a = assessment_id("NJSLA_ELA", "4", "S-100");
        let b = assessment_id("NJSLA_ELA", "4", "S-100");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn assessment_id_varies_by_component() {
        let base = assessment_id("NJSLA_ELA", "4", "S-100");
        assert_ne!(base, assessment_id("NJSLA_MATH", "4", "S-100"));
        assert_ne!(base, assessment_id("NJSLA_ELA", "5", "S-100"));
        assert_ne!(base, assessment_id("NJSLA_ELA", "4", "S-101"));
    }
}
