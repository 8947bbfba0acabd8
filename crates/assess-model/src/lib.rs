pub mod config;
pub mod error;
pub mod format;
pub mod mapping;
pub mod record;
pub mod row;
pub mod student;
pub mod validation;

pub use config::{
    AssessmentConfig, ScoreRange, ScoreType, ScoringMethod, config_for, grade_subject_range,
    is_percent_based_subject,
};
pub use error::AssessError;
pub use format::AssessmentSourceFormat;
pub use mapping::ColumnMapping;
pub use record::AssessmentRecord;
pub use row::{CellValue, DataRow};
pub use student::{StudentInfo, StudentLookupStatus};
pub use validation::{ValidationResult, ValidationSummary};
