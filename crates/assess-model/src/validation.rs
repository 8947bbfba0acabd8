use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Counts describing one processed batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_records: usize,
    /// Rows that produced a student with a non-empty external id.
    pub valid_records: usize,
    pub invalid_records: usize,
    pub students_found: usize,
    pub assessments_found: usize,
    pub subjects_found: BTreeSet<String>,
    pub grades_found: BTreeSet<String>,
}

/// Accumulated outcome of validating one import batch.
///
/// Errors block proceeding; warnings are advisory and never halt
/// processing. Nothing is swallowed without appearing in one of the two
/// lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub summary: ValidationSummary,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            summary: ValidationSummary::default(),
        }
    }

    pub fn push_error(&mut self, message: String) {
        self.errors.push(message);
        self.is_valid = false;
    }

    pub fn push_warning(&mut self, message: String) {
        self.warnings.push(message);
    }
}
