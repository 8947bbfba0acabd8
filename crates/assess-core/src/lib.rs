//! Core assessment ingestion pipeline: format detection, score
//! normalization, subscore extraction, and record assembly.
//!
//! Everything here is synchronous, CPU-bound transformation over in-memory
//! rows. File parsing and persistence are collaborators invoked before and
//! after this crate runs; concurrent invocations on independent inputs are
//! safe because no state is shared beyond read-only reference tables.

pub mod assemble;
pub mod detect;
pub mod family;
pub mod score;
pub mod subscores;

pub use assemble::{ProcessOutcome, Processor, StudentDirectory};
pub use detect::{assessment_families, detect_format, is_assessment_header};
pub use family::AssessmentFamily;
pub use score::{ScoreResolution, resolve_score};
pub use subscores::{SubscoreExtraction, extract_subscores};
