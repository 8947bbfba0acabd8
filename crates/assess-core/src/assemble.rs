//! Row-to-record assembly.
//!
//! Drives the full per-row pipeline: student extraction, family detection,
//! score resolution, and subscore extraction. Errors are accumulated per
//! row so one malformed row never aborts the batch; only a missing student
//! identifier column fails the batch up front, since nothing downstream can
//! be keyed without it.

use serde::Serialize;
use tracing::{debug, warn};

use assess_model::{
    AssessError, AssessmentRecord, AssessmentSourceFormat, DataRow, StudentInfo,
    StudentLookupStatus, ValidationResult, config_for, record::assessment_id,
};
use assess_report::ImportSummary;

use crate::detect::{assessment_families, detect_format};
use crate::family::AssessmentFamily;
use crate::score::resolve_score;
use crate::subscores::extract_subscores;

const STUDENT_ID_KEYS: &[&str] = &[
    "Student ID",
    "StudentID",
    "Student Number",
    "Student No",
    "State ID",
    "Local ID",
    "SID",
    "ID",
];
const FIRST_NAME_KEYS: &[&str] = &["First Name", "FirstName", "First", "Given Name"];
const LAST_NAME_KEYS: &[&str] = &["Last Name", "LastName", "Last", "Surname", "Family Name"];
const GRADE_KEYS: &[&str] = &["Grade Level", "Grade", "Gr"];
const DOB_KEYS: &[&str] = &["Date of Birth", "DOB", "Birth Date", "Birthdate"];
const GENDER_KEYS: &[&str] = &["Gender", "Sex"];
const ETHNICITY_KEYS: &[&str] = &["Ethnicity", "Race", "Race/Ethnicity"];

const TEST_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%m/%d/%y"];

/// Lookup collaborator mapping an external student identifier to the
/// internal one. Absent in dry-run imports.
pub trait StudentDirectory {
    fn resolve(&self, school_student_id: &str) -> Option<String>;
}

/// Everything one processed batch produces.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    /// Students with a non-empty external identifier, one per surviving row.
    pub students: Vec<StudentInfo>,
    pub assessments: Vec<AssessmentRecord>,
    pub validation: ValidationResult,
    pub summary: ImportSummary,
}

/// Batch assembler. Stateless between calls; holds only the optional
/// directory collaborator.
#[derive(Default)]
pub struct Processor<'a> {
    directory: Option<&'a dyn StudentDirectory>,
}

impl<'a> Processor<'a> {
    pub fn new() -> Self {
        Self { directory: None }
    }

    pub fn with_directory(directory: &'a dyn StudentDirectory) -> Self {
        Self {
            directory: Some(directory),
        }
    }

    /// Processes one parsed batch into students, assessments, and a
    /// validation report.
    pub fn process(&self, headers: &[String], rows: &[DataRow]) -> ProcessOutcome {
        let mut validation = ValidationResult::new();
        let mut students: Vec<StudentInfo> = Vec::new();
        let mut assessments: Vec<AssessmentRecord> = Vec::new();

        // Without a student identifier column nothing can be keyed; fail the
        // batch before touching any row.
        let has_id_header = headers
            .iter()
            .any(|header| STUDENT_ID_KEYS.iter().any(|key| header.trim() == *key));
        if !has_id_header {
            validation.push_error(
                AssessError::UnmappedTarget("school_student_id".to_string()).to_string(),
            );
            validation.summary.total_records = rows.len();
            validation.summary.invalid_records = rows.len();
            return ProcessOutcome {
                students,
                assessments,
                validation,
                summary: ImportSummary::default(),
            };
        }

        let families: Vec<AssessmentFamily> = assessment_families(headers)
            .iter()
            .map(|prefix| AssessmentFamily::parse(prefix))
            .collect();
        debug!(families = families.len(), rows = rows.len(), "assembling batch");

        validation.summary.total_records = rows.len();

        for (index, row) in rows.iter().enumerate() {
            let row_number = index + 1;
            let student = self.extract_student(row);

            if !student.has_student_id() {
                validation.push_warning(
                    AssessError::Row {
                        row: row_number,
                        message: "missing student identifier, skipped".to_string(),
                    }
                    .to_string(),
                );
                continue;
            }

            for family in &families {
                let format = detect_format(row, &family.prefix);
                if format == AssessmentSourceFormat::Generic {
                    // No recognizable assessment columns for this family on
                    // this row.
                    continue;
                }
                let Some(record) = self.build_assessment(row, family, format, &student) else {
                    continue;
                };
                if record.test_date.is_none()
                    && row.text(&family.keys("Result Date")).is_some()
                {
                    validation.push_warning(
                        AssessError::Row {
                            row: row_number,
                            message: format!("unparseable result date for '{}'", family.prefix),
                        }
                        .to_string(),
                    );
                }
                validation
                    .summary
                    .subjects_found
                    .insert(record.subject.clone());
                validation
                    .summary
                    .grades_found
                    .insert(record.grade_level.clone());
                assessments.push(record);
            }

            students.push(student);
        }

        let with_assessments: std::collections::BTreeSet<&str> = assessments
            .iter()
            .map(|record| record.student_id.as_str())
            .collect();
        for student in &students {
            if !with_assessments.contains(student.school_student_id.as_str()) {
                warn!(
                    student = %student.school_student_id,
                    "student parsed without any assessment records"
                );
                validation.push_warning(format!(
                    "student '{}' has no assessment records",
                    student.school_student_id
                ));
            }
        }

        validation.summary.valid_records = students.len();
        validation.summary.invalid_records =
            validation.summary.total_records - validation.summary.valid_records;
        validation.summary.students_found = students.len();
        validation.summary.assessments_found = assessments.len();

        let summary = assess_report::summarize(&assessments);

        ProcessOutcome {
            students,
            assessments,
            validation,
            summary,
        }
    }

    fn extract_student(&self, row: &DataRow) -> StudentInfo {
        let school_student_id = row.text(STUDENT_ID_KEYS).unwrap_or_default();
        let (id, lookup_status) = match (&self.directory, school_student_id.is_empty()) {
            (Some(directory), false) => match directory.resolve(&school_student_id) {
                Some(internal) => (Some(internal), StudentLookupStatus::Resolved),
                None => (None, StudentLookupStatus::Unresolved),
            },
            _ => (None, StudentLookupStatus::Unknown),
        };
        StudentInfo {
            id,
            school_student_id,
            first_name: row.text(FIRST_NAME_KEYS).unwrap_or_default(),
            last_name: row.text(LAST_NAME_KEYS).unwrap_or_default(),
            grade_level: row.text(GRADE_KEYS).unwrap_or_default(),
            date_of_birth: row.text(DOB_KEYS),
            gender: row.text(GENDER_KEYS),
            ethnicity: row.text(ETHNICITY_KEYS),
            lookup_status,
        }
    }

    fn build_assessment(
        &self,
        row: &DataRow,
        family: &AssessmentFamily,
        format: AssessmentSourceFormat,
        student: &StudentInfo,
    ) -> Option<AssessmentRecord> {
        // A family can be detected from headers yet carry no values on this
        // particular row.
        if !family_has_values(row, family) {
            return None;
        }

        let grade = if family.grade.is_empty() {
            student.grade_level.clone()
        } else {
            family.grade.clone()
        };
        let config = config_for(&grade, &family.subject, format);
        let resolution = resolve_score(row, family, config.as_ref(), format);
        let extraction = extract_subscores(row, family, format);

        let assessment_type = assessment_type(format, family);
        let record = AssessmentRecord {
            student_id: student.school_student_id.clone(),
            assessment_id: assessment_id(&assessment_type, &grade, &student.school_student_id),
            assessment_type,
            subject: family.subject.clone(),
            grade_level: grade,
            school_year: family.school_year.clone(),
            test_date: test_date(row, family),
            raw_score: resolution.raw_score,
            scale_score: resolution.scale_score,
            performance_level_text: resolution.performance_level_text,
            min_possible_score: resolution.min_possible_score,
            max_possible_score: resolution.max_possible_score,
            student_growth_percentile: row.int_opt(&sgp_keys(family)),
            subscores: extraction.subscores,
            unprocessed_data: extraction.unprocessed,
            completed_at: chrono::Utc::now(),
        };
        Some(record)
    }
}

fn sgp_keys(family: &AssessmentFamily) -> Vec<String> {
    let mut keys = family.keys("SGP").to_vec();
    keys.extend(family.keys("Student Growth Percentile"));
    keys
}

fn family_has_values(row: &DataRow, family: &AssessmentFamily) -> bool {
    let prefixed = format!("{} - ", family.prefix);
    row.iter()
        .any(|(key, value)| key.starts_with(&prefixed) && !value.is_empty())
}

/// Normalized test date in `MM/DD/YYYY`. An unparseable vendor date yields
/// `None`; the caller records the warning.
fn test_date(row: &DataRow, family: &AssessmentFamily) -> Option<String> {
    let raw = row.text(&family.keys("Result Date"))?;
    for pattern in TEST_DATE_FORMATS {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(&raw, pattern) {
            return Some(date.format("%m/%d/%Y").to_string());
        }
    }
    warn!(value = %raw, prefix = %family.prefix, "unparseable result date");
    None
}

/// Categorical tag: source token, subject token, then the form suffix for
/// benchmark formats, e.g. `LINKIT_NJSLS_MATH_FORM_A`.
fn assessment_type(format: AssessmentSourceFormat, family: &AssessmentFamily) -> String {
    let mut tag = format!("{}_{}", format.source_token(), family.subject_token());
    if let Some(form) = format.form_token() {
        tag.push('_');
        tag.push_str(form);
    }
    tag
}
