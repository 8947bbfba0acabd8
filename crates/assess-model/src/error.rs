use thiserror::Error;

/// Validation failures surfaced to operators during batch processing.
///
/// These render into the validation report's error and warning lists; they
/// are messages first, not control flow, since one bad row never aborts a
/// batch.
#[derive(Debug, Error)]
pub enum AssessError {
    /// A row-scoped problem, 1-based.
    #[error("row {row}: {message}")]
    Row { row: usize, message: String },
    /// A required target field never matched any source column.
    #[error("no source column matched required field '{0}'")]
    UnmappedTarget(String),
}
