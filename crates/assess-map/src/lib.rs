//! Fuzzy matching of arbitrary source column names to canonical import
//! target fields.
//!
//! The matcher is a pure function over its inputs: alias tables are built
//! once, injected through the constructor, and never mutated, so identical
//! inputs always produce identical mappings.

pub mod aliases;
pub mod engine;
pub mod utils;

pub use aliases::AliasTable;
pub use engine::{ColumnMatcher, DEFAULT_THRESHOLD, SCHOOL_TARGET, merge_manual, unmapped_required};
pub use utils::{dice_similarity, normalize_name};
