use serde::{Deserialize, Serialize};

/// Whether the row's external student identifier resolved against the
/// persistence collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentLookupStatus {
    Resolved,
    Unresolved,
    #[default]
    Unknown,
}

/// Demographic snapshot extracted from one input row.
///
/// Created once during assembly and never mutated afterwards. Rows whose
/// `school_student_id` is empty are dropped from the assembler's student
/// output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentInfo {
    /// Internal identifier, populated only when the directory resolved the row.
    pub id: Option<String>,
    /// External identifier carried by the source file.
    pub school_student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub grade_level: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub ethnicity: Option<String>,
    pub lookup_status: StudentLookupStatus,
}

impl StudentInfo {
    /// True when the row carried a usable external identifier.
    pub fn has_student_id(&self) -> bool {
        !self.school_student_id.trim().is_empty()
    }
}
