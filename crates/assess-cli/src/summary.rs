//! Operator-facing tables for import and mapping results.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use assess_core::ProcessOutcome;

use crate::commands::MapOutcome;

pub fn print_import_summary(outcome: &ProcessOutcome) {
    let summary = &outcome.summary;
    println!("Students: {}", summary.total_students);
    println!("Assessments: {}", summary.total_assessments);
    println!("Average scale score: {:.2}", summary.average_scale_score);

    if !summary.performance_level_distribution.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Performance Level"), header_cell("Count")]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        for (level, count) in &summary.performance_level_distribution {
            table.add_row(vec![Cell::new(level), Cell::new(count)]);
        }
        println!("{table}");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Subject"),
        header_cell("Records"),
        header_cell("Average"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (subject, aggregate) in &summary.subject_breakdown {
        table.add_row(vec![
            Cell::new(subject),
            Cell::new(aggregate.count),
            Cell::new(format!("{:.2}", aggregate.average_scale_score)),
        ]);
    }
    for (grade, aggregate) in &summary.grade_breakdown {
        table.add_row(vec![
            Cell::new(format!("Grade {grade}")),
            Cell::new(aggregate.count),
            Cell::new(format!("{:.2}", aggregate.average_scale_score)),
        ]);
    }
    println!("{table}");

    for warning in &outcome.validation.warnings {
        eprintln!("warning: {warning}");
    }
    if !outcome.validation.errors.is_empty() {
        eprintln!("Errors:");
        for error in &outcome.validation.errors {
            eprintln!("- {error}");
        }
    }
}

pub fn print_mappings(outcome: &MapOutcome) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source Column"),
        header_cell("Target Field"),
        header_cell("Confidence"),
        header_cell("Matched"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for mapping in &outcome.mappings {
        let target = if mapping.target_field.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(&mapping.target_field)
        };
        table.add_row(vec![
            Cell::new(&mapping.source_column),
            target,
            Cell::new(format!("{:.2}", mapping.confidence)),
            matched_cell(mapping.matched),
        ]);
    }
    println!("{table}");

    if !outcome.unmapped_required.is_empty() {
        eprintln!("Missing required fields:");
        for target in &outcome.unmapped_required {
            eprintln!("- {target}");
        }
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn matched_cell(matched: bool) -> Cell {
    if matched {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
