use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::debug;

use crate::{ReadOptions, SourceTable, keyed_rows};

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

#[derive(Debug, Default, Clone, Copy)]
struct RowStats {
    total: usize,
    non_empty: usize,
    numeric: usize,
    alpha: usize,
}

impl RowStats {
    fn non_empty_ratio(self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.non_empty as f64 / self.total as f64
        }
    }

    fn numeric_ratio(self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.numeric as f64 / self.total as f64
        }
    }

    fn alpha_ratio(self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.alpha as f64 / self.total as f64
        }
    }
}

fn row_stats(row: &[String]) -> RowStats {
    let mut stats = RowStats {
        total: row.len(),
        ..RowStats::default()
    };
    for cell in row {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            continue;
        }
        stats.non_empty += 1;
        if trimmed.parse::<f64>().is_ok() {
            stats.numeric += 1;
        }
        if trimmed.chars().any(|ch| ch.is_ascii_alphabetic()) {
            stats.alpha += 1;
        }
    }
    stats
}

fn is_data_like(stats: RowStats) -> bool {
    stats.numeric_ratio() >= 0.2
}

fn is_header_like(stats: RowStats) -> bool {
    stats.non_empty_ratio() >= 0.8 && stats.alpha_ratio() >= 0.5 && stats.numeric_ratio() <= 0.1
}

/// Picks the header row: the last header-like row above the first
/// data-like row. Vendor exports stack title banners above the header, so
/// row zero is only the fallback.
pub(crate) fn detect_header_row(rows: &[Vec<String>]) -> usize {
    if rows.is_empty() {
        return 0;
    }
    let probe = rows.len().min(5);
    let stats: Vec<RowStats> = rows.iter().take(probe).map(|row| row_stats(row)).collect();
    let data_index = stats.iter().position(|stat| is_data_like(*stat));
    let search_end = data_index.unwrap_or(1).max(1);
    let mut candidate = 0usize;
    for (idx, stat) in stats.iter().enumerate().take(search_end) {
        if is_header_like(*stat) {
            candidate = idx;
        }
    }
    candidate
}

pub fn read_csv_table(path: &Path, options: ReadOptions) -> Result<SourceTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    if raw_rows.is_empty() {
        return Ok(SourceTable::default());
    }

    let header_index = options
        .header_row
        .unwrap_or_else(|| detect_header_row(&raw_rows))
        .min(raw_rows.len() - 1);
    debug!(path = %path.display(), header_index, "csv header row selected");

    let headers: Vec<String> = raw_rows[header_index]
        .iter()
        .map(|value| normalize_header(value))
        .collect();
    let rows = keyed_rows(&headers, raw_rows.split_off(header_index + 1));
    Ok(SourceTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn plain_header_on_first_row() {
        let file = write_csv("Student ID,First Name\nS-1,Ada\nS-2,Grace\n");
        let table = read_csv_table(file.path(), ReadOptions::default()).unwrap();
        assert_eq!(table.headers, vec!["Student ID", "First Name"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].text(&["Student ID"]).as_deref(), Some("S-1"));
    }

    #[test]
    fn banner_rows_above_header_are_skipped() {
        let file = write_csv(
            "District Export,,\nSpring 2024,,\nStudent ID,First Name,Scaled\nS-1,Ada,742\n",
        );
        let table = read_csv_table(file.path(), ReadOptions::default()).unwrap();
        assert_eq!(table.headers, vec!["Student ID", "First Name", "Scaled"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].int_or_zero(&["Scaled"]), 742);
    }

    #[test]
    fn explicit_header_row_wins_over_heuristic() {
        let file = write_csv("Student ID,First Name\nS-1,Ada\n");
        let table = read_csv_table(
            file.path(),
            ReadOptions {
                header_row: Some(0),
            },
        )
        .unwrap();
        assert_eq!(table.headers[0], "Student ID");
    }

    #[test]
    fn empty_cells_are_omitted_from_rows() {
        let file = write_csv("Student ID,Level\nS-1,\n");
        let table = read_csv_table(file.path(), ReadOptions::default()).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert!(!table.rows[0].contains_key("Level"));
    }

    #[test]
    fn empty_file_yields_empty_table() {
        let file = write_csv("");
        let table = read_csv_table(file.path(), ReadOptions::default()).unwrap();
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }
}
