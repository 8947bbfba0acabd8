use std::path::Path;

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, open_workbook_auto};
use tracing::debug;

use crate::csv_table::detect_header_row;
use crate::{ReadOptions, SourceTable, keyed_rows};

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_string(),
        Data::Float(value) => {
            // Integral floats render without the fractional part so ids and
            // scores survive the spreadsheet round-trip as clean text.
            if value.fract() == 0.0 {
                format!("{}", *value as i64)
            } else {
                format!("{value}")
            }
        }
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => format!("{value}"),
        Data::DateTimeIso(value) | Data::DurationIso(value) => value.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Reads the first worksheet of an Excel workbook.
pub fn read_xlsx_table(path: &Path, options: ReadOptions) -> Result<SourceTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("open workbook: {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook has no worksheets: {}", path.display()))?
        .with_context(|| format!("read worksheet: {}", path.display()))?;

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for row in range.rows() {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        if cells.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        raw_rows.push(cells);
    }
    if raw_rows.is_empty() {
        return Ok(SourceTable::default());
    }

    let header_index = options
        .header_row
        .unwrap_or_else(|| detect_header_row(&raw_rows))
        .min(raw_rows.len() - 1);
    debug!(path = %path.display(), header_index, "xlsx header row selected");

    let headers: Vec<String> = raw_rows[header_index]
        .iter()
        .map(|value| value.trim().to_string())
        .collect();
    let rows = keyed_rows(&headers, raw_rows.split_off(header_index + 1));
    Ok(SourceTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_render_without_fraction() {
        assert_eq!(cell_to_string(&Data::Float(742.0)), "742");
        assert_eq!(cell_to_string(&Data::Float(85.5)), "85.5");
        assert_eq!(cell_to_string(&Data::Int(64)), "64");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
