use serde::{Deserialize, Serialize};

/// A proposed or confirmed mapping from one source column to a canonical
/// target field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Source column header as it appeared in the file (trimmed).
    pub source_column: String,
    /// Canonical target field name; empty when nothing matched.
    pub target_field: String,
    /// Match confidence in `[0, 1]`. Exact and alias hits are forced to 1.0.
    pub confidence: f64,
    /// True when `confidence` met the matching threshold.
    pub matched: bool,
    /// True for operator-entered overrides, which re-matching must preserve.
    pub manual: bool,
}

impl ColumnMapping {
    /// An unmatched placeholder for a source column.
    pub fn unmatched(source_column: impl Into<String>) -> Self {
        Self {
            source_column: source_column.into(),
            target_field: String::new(),
            confidence: 0.0,
            matched: false,
            manual: false,
        }
    }
}
