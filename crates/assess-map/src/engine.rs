//! Column matching engine.
//!
//! Matching runs one tier at a time per source column, first match wins:
//! school-identifier override, exact/alias hit, then scored comparison
//! against every target (alias containment, substring containment, shared
//! token, generic string similarity).

use tracing::debug;

use assess_model::ColumnMapping;

use crate::aliases::AliasTable;
use crate::utils::{dice_similarity, normalize_name, share_token};

/// Default minimum confidence for a mapping to count as matched.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Target field that school-shaped columns are always forced onto.
pub const SCHOOL_TARGET: &str = "school_id";

const ALIAS_CONTAINMENT_SCORE: f64 = 0.9;
const SUBSTRING_SCORE: f64 = 0.85;
const SHARED_TOKEN_SCORE: f64 = 0.7;

/// Normalized column names that always denote the school identifier, even
/// without a "school"/"campus" token.
const SCHOOL_FIELDS: &[&str] = &["building", "site", "campus_name", "attending_school"];

/// Matches source columns against canonical target fields.
///
/// Pure over its inputs: the alias table is fixed at construction and the
/// matcher holds no other state, so repeated calls with identical inputs
/// return identical mappings.
#[derive(Debug, Clone)]
pub struct ColumnMatcher {
    aliases: AliasTable,
    threshold: f64,
}

impl ColumnMatcher {
    pub fn new(aliases: AliasTable) -> Self {
        Self {
            aliases,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Produces exactly one mapping per source column, never more, never
    /// fewer.
    ///
    /// Callers must pre-filter `targets` to the relevant entity type; with
    /// an empty target list every mapping comes back unmatched.
    pub fn match_columns(&self, source: &[String], targets: &[String]) -> Vec<ColumnMapping> {
        let mappings: Vec<ColumnMapping> = source
            .iter()
            .map(|column| self.match_one(column, targets))
            .collect();
        debug!(
            columns = source.len(),
            matched = mappings.iter().filter(|m| m.matched).count(),
            "column matching complete"
        );
        mappings
    }

    fn match_one(&self, column: &str, targets: &[String]) -> ColumnMapping {
        let normalized = normalize_name(column);

        // An empty target list yields no matches at all, school columns
        // included.
        if targets.is_empty() {
            return ColumnMapping::unmatched(column.trim());
        }

        // School assignment is structural, not data-driven: it bypasses
        // fuzzy scoring entirely.
        if is_school_column(&normalized) {
            return ColumnMapping {
                source_column: column.trim().to_string(),
                target_field: SCHOOL_TARGET.to_string(),
                confidence: 1.0,
                matched: true,
                manual: false,
            };
        }

        if let Some(target) = self.exact_or_alias(&normalized, targets) {
            return ColumnMapping {
                source_column: column.trim().to_string(),
                target_field: target,
                confidence: 1.0,
                matched: true,
                manual: false,
            };
        }

        let mut best_target = targets[0].clone();
        let mut best_score = f64::MIN;
        for target in targets {
            let score = self.similarity(column, &normalized, target);
            // Strict comparison keeps first occurrence on ties.
            if score > best_score {
                best_score = score;
                best_target = target.clone();
            }
        }

        ColumnMapping {
            source_column: column.trim().to_string(),
            target_field: best_target,
            confidence: best_score.clamp(0.0, 1.0),
            matched: best_score >= self.threshold,
            manual: false,
        }
    }

    fn exact_or_alias(&self, normalized: &str, targets: &[String]) -> Option<String> {
        for target in targets {
            let target_norm = normalize_name(target);
            if normalized == target_norm {
                return Some(target.clone());
            }
            for alias in self.aliases.aliases_for(target) {
                let alias_norm = normalize_name(alias);
                if alias_norm.is_empty() {
                    continue;
                }
                if normalized == alias_norm
                    || normalized.contains(&alias_norm)
                    || alias_norm.contains(normalized)
                {
                    return Some(target.clone());
                }
            }
        }
        None
    }

    fn similarity(&self, column: &str, normalized: &str, target: &str) -> f64 {
        let column_lower = column.trim().to_lowercase();

        for alias in self.aliases.aliases_for(target) {
            let alias_lower = alias.to_lowercase();
            if column_lower.contains(&alias_lower) || alias_lower.contains(&column_lower) {
                return ALIAS_CONTAINMENT_SCORE;
            }
        }

        let target_norm = normalize_name(target);
        let target_lower = target.trim().to_lowercase();
        if normalized.contains(&target_norm)
            || target_norm.contains(normalized)
            || column_lower.contains(&target_lower)
            || target_lower.contains(&column_lower)
        {
            return SUBSTRING_SCORE;
        }

        if share_token(normalized, &target_norm) {
            return SHARED_TOKEN_SCORE;
        }

        dice_similarity(normalized, &target_norm)
    }
}

fn is_school_column(normalized: &str) -> bool {
    normalized.contains("school")
        || normalized.contains("campus")
        || SCHOOL_FIELDS.contains(&normalized)
}

/// Overlays operator-entered manual mappings onto an automatic run.
///
/// Manual mappings are preserved verbatim and take precedence over any
/// re-matched suggestion for the same source column.
pub fn merge_manual(auto: Vec<ColumnMapping>, manual: &[ColumnMapping]) -> Vec<ColumnMapping> {
    auto.into_iter()
        .map(|mapping| {
            manual
                .iter()
                .find(|m| m.manual && m.source_column == mapping.source_column)
                .cloned()
                .unwrap_or(mapping)
        })
        .collect()
}

/// Required target fields that no source column matched.
///
/// Surfaced before any row processing begins so structural problems fail
/// fast.
pub fn unmapped_required(mappings: &[ColumnMapping], required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|target| {
            !mappings
                .iter()
                .any(|mapping| mapping.matched && mapping.target_field == **target)
        })
        .map(|target| (*target).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_matcher() -> ColumnMatcher {
        ColumnMatcher::new(AliasTable::builtin_student())
    }

    fn targets(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn school_columns_bypass_scoring() {
        let matcher = student_matcher();
        let mappings =
            matcher.match_columns(&["Home School".to_string()], &targets(&["first_name"]));
        assert_eq!(mappings[0].target_field, SCHOOL_TARGET);
        assert_eq!(mappings[0].confidence, 1.0);
        assert!(mappings[0].matched);
    }

    #[test]
    fn empty_targets_yield_unmatched() {
        let matcher = student_matcher();
        let mappings = matcher.match_columns(&["First Name".to_string()], &[]);
        assert!(!mappings[0].matched);
        assert!(mappings[0].target_field.is_empty());
    }

    #[test]
    fn school_override_requires_targets() {
        let matcher = student_matcher();
        let mappings = matcher.match_columns(&["Home School".to_string()], &[]);
        assert!(!mappings[0].matched);
        assert!(mappings[0].target_field.is_empty());
    }

    #[test]
    fn manual_overrides_survive_rematching() {
        let auto = student_matcher().match_columns(
            &["Misc".to_string()],
            &targets(&["first_name", "last_name"]),
        );
        let manual = vec![ColumnMapping {
            source_column: "Misc".to_string(),
            target_field: "ethnicity".to_string(),
            confidence: 1.0,
            matched: true,
            manual: true,
        }];
        let merged = merge_manual(auto, &manual);
        assert_eq!(merged[0].target_field, "ethnicity");
        assert!(merged[0].manual);
    }

    #[test]
    fn unmapped_required_reports_missing_targets() {
        let mappings = vec![ColumnMapping {
            source_column: "First Name".to_string(),
            target_field: "first_name".to_string(),
            confidence: 1.0,
            matched: true,
            manual: false,
        }];
        let missing = unmapped_required(&mappings, &["first_name", "school_student_id"]);
        assert_eq!(missing, vec!["school_student_id".to_string()]);
    }
}
