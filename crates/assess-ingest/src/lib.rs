//! File parsing for assessment imports.
//!
//! Both readers produce the same in-memory shape, a header list plus
//! string-keyed [`DataRow`]s, so everything downstream is format-agnostic.
//! Vendor exports often stack title and date banners above the real header
//! row; [`csv_table::read_csv_table`] locates the header with row-shape
//! heuristics unless the caller pins an explicit row.

pub mod csv_table;
pub mod xlsx_table;

use std::path::Path;

use anyhow::{Result, bail};

use assess_model::DataRow;

/// One parsed source file: ordered headers plus keyed rows.
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<DataRow>,
}

/// Explicit header placement, when the operator knows the file layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Zero-based header row index; `None` enables heuristic detection.
    pub header_row: Option<usize>,
}

/// Reads a source file, dispatching on extension.
pub fn load_table(path: &Path, options: ReadOptions) -> Result<SourceTable> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" | "txt" => csv_table::read_csv_table(path, options),
        "xlsx" | "xls" | "xlsm" => xlsx_table::read_xlsx_table(path, options),
        other => bail!("unsupported file extension '{other}': {}", path.display()),
    }
}

/// Builds keyed rows from positional cells, dropping fully-empty rows.
pub(crate) fn keyed_rows(headers: &[String], raw_rows: Vec<Vec<String>>) -> Vec<DataRow> {
    let mut rows = Vec::with_capacity(raw_rows.len());
    for raw in raw_rows {
        if raw.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let mut row = DataRow::new();
        for (index, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = raw.get(index).map(String::as_str).unwrap_or("");
            if value.trim().is_empty() {
                continue;
            }
            row.insert(header.clone(), value);
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_extension_is_rejected() {
        let error = load_table(Path::new("scores.pdf"), ReadOptions::default()).unwrap_err();
        assert!(error.to_string().contains("unsupported file extension"));
    }

    #[test]
    fn keyed_rows_skip_blank_headers_and_rows() {
        let headers = vec!["Student ID".to_string(), String::new()];
        let rows = keyed_rows(
            &headers,
            vec![
                vec!["S-1".to_string(), "noise".to_string()],
                vec![String::new(), String::new()],
            ],
        );
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains_key("Student ID"));
        assert_eq!(rows[0].keys().count(), 1);
    }
}
