//! Command implementations shared by the binary and its tests.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use assess_core::{ProcessOutcome, Processor};
use assess_ingest::{ReadOptions, load_table};
use assess_map::{AliasTable, ColumnMatcher, unmapped_required};
use assess_model::ColumnMapping;

/// Entity type a mapping run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Student,
    Staff,
    Classroom,
}

impl Entity {
    fn alias_table(self) -> AliasTable {
        match self {
            Entity::Student => AliasTable::builtin_student(),
            Entity::Staff => AliasTable::builtin_staff(),
            Entity::Classroom => AliasTable::builtin_classroom(),
        }
    }

    /// Target fields that must match before an import of this entity can
    /// proceed.
    fn required_targets(self) -> &'static [&'static str] {
        match self {
            Entity::Student => &["school_student_id", "first_name", "last_name", "grade_level"],
            Entity::Staff => &["staff_id", "first_name", "last_name"],
            Entity::Classroom => &["classroom_name", "teacher_id"],
        }
    }
}

/// Result of a column-mapping preview run.
#[derive(Debug, Clone, Serialize)]
pub struct MapOutcome {
    pub mappings: Vec<ColumnMapping>,
    /// Required target fields no source column matched.
    pub unmapped_required: Vec<String>,
}

/// Parses a source file and runs the full assessment pipeline over it.
pub fn run_import(path: &Path, header_row: Option<usize>) -> Result<ProcessOutcome> {
    let table = load_table(path, ReadOptions { header_row })
        .with_context(|| format!("load {}", path.display()))?;
    info!(
        path = %path.display(),
        headers = table.headers.len(),
        rows = table.rows.len(),
        "source file parsed"
    );
    let outcome = Processor::new().process(&table.headers, &table.rows);
    info!(
        students = outcome.students.len(),
        assessments = outcome.assessments.len(),
        errors = outcome.validation.errors.len(),
        warnings = outcome.validation.warnings.len(),
        "batch processed"
    );
    Ok(outcome)
}

/// Parses a source file's headers and previews the column mapping for the
/// given entity without touching any row data.
pub fn run_map(
    path: &Path,
    header_row: Option<usize>,
    entity: Entity,
    threshold: Option<f64>,
) -> Result<MapOutcome> {
    let table = load_table(path, ReadOptions { header_row })
        .with_context(|| format!("load {}", path.display()))?;
    let aliases = entity.alias_table();
    let targets = aliases.targets();
    let mut matcher = ColumnMatcher::new(aliases);
    if let Some(threshold) = threshold {
        matcher = matcher.with_threshold(threshold);
    }
    let mappings = matcher.match_columns(&table.headers, &targets);
    let unmapped = unmapped_required(&mappings, entity.required_targets());
    Ok(MapOutcome {
        mappings,
        unmapped_required: unmapped,
    })
}
