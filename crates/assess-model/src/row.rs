//! Loosely-typed row representation shared by the ingest and processing crates.
//!
//! Source files arrive as wide, string-keyed records whose cells may hold
//! text, numbers, or nothing. `DataRow` wraps that shape and formalizes the
//! "try this header variant, then that one" lookup into a single accessor
//! that takes a sequence of candidate keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single cell value from a parsed source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// True when the cell carries no usable value.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Number(_) => false,
            CellValue::Text(text) => text.trim().is_empty(),
        }
    }

    /// The cell rendered as display text. Numbers drop trailing zeros so
    /// that `85.0` and `85` produce the same string.
    pub fn display(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Number(value) => {
                let s = format!("{value}");
                s.trim_end_matches('0').trim_end_matches('.').to_string()
            }
            CellValue::Text(text) => text.trim().to_string(),
        }
    }

    /// Lenient integer read: numbers truncate, text parses as an integer or
    /// a float truncated toward zero. Anything else yields `None`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CellValue::Null => None,
            CellValue::Number(value) => Some(*value as i64),
            CellValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return None;
                }
                if let Ok(value) = trimmed.parse::<i64>() {
                    return Some(value);
                }
                trimmed.parse::<f64>().ok().map(|value| value as i64)
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

/// One parsed input row, keyed by source column header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    cells: BTreeMap<String, CellValue>,
}

impl DataRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }

    /// Iterates keys in deterministic (sorted) order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the first present, non-empty value among the candidate keys.
    ///
    /// This is the row-access primitive for vendor files where the same
    /// field appears under several header variants.
    pub fn first_present<S: AsRef<str>>(&self, candidates: &[S]) -> Option<&CellValue> {
        candidates
            .iter()
            .filter_map(|key| self.cells.get(key.as_ref()))
            .find(|value| !value.is_empty())
    }

    /// First present candidate rendered as trimmed text, when non-empty.
    pub fn text<S: AsRef<str>>(&self, candidates: &[S]) -> Option<String> {
        self.first_present(candidates).map(CellValue::display)
    }

    /// Lenient integer read over the candidate keys.
    ///
    /// Absent or unparseable values yield 0, matching the scoring layer's
    /// contract where a missing field and a true zero are indistinguishable.
    pub fn int_or_zero<S: AsRef<str>>(&self, candidates: &[S]) -> i64 {
        self.first_present(candidates)
            .and_then(CellValue::as_int)
            .unwrap_or(0)
    }

    /// Integer read that preserves absence for optional fields.
    pub fn int_opt<S: AsRef<str>>(&self, candidates: &[S]) -> Option<i64> {
        self.first_present(candidates).and_then(CellValue::as_int)
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for DataRow {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut row = DataRow::new();
        for (key, value) in iter {
            row.insert(key, value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_present_skips_empty_candidates() {
        let row: DataRow = [
            ("Student ID", CellValue::Text("  ".to_string())),
            ("State ID", CellValue::Text("NJ123".to_string())),
        ]
        .into_iter()
        .collect();
        let value = row.first_present(&["Student ID", "State ID"]).unwrap();
        assert_eq!(value.display(), "NJ123");
    }

    #[test]
    fn int_or_zero_on_unparseable() {
        let row: DataRow = [("Scaled", "n/a")].into_iter().collect();
        assert_eq!(row.int_or_zero(&["Scaled"]), 0);
    }

    #[test]
    fn int_truncates_float_text() {
        let row: DataRow = [("Percent", "85.7")].into_iter().collect();
        assert_eq!(row.int_or_zero(&["Percent"]), 85);
    }

    #[test]
    fn number_display_drops_trailing_zeros() {
        assert_eq!(CellValue::Number(85.0).display(), "85");
        assert_eq!(CellValue::Number(85.5).display(), "85.5");
    }
}
