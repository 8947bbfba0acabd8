//! Built-in alias tables for the bulk-import entity types.
//!
//! Each table maps a canonical target field to the header synonyms seen in
//! real SIS and vendor exports. Tables are immutable once built and are
//! injected into the matcher rather than read as globals.

use std::collections::BTreeMap;

/// Known synonyms per canonical target field.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds aliases for a target field, appending to any existing list.
    pub fn add(&mut self, target: &str, aliases: &[&str]) {
        self.entries
            .entry(target.to_string())
            .or_default()
            .extend(aliases.iter().map(|alias| (*alias).to_string()));
    }

    pub fn aliases_for(&self, target: &str) -> &[String] {
        self.entries
            .get(target)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Canonical target fields this table knows about, sorted.
    pub fn targets(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Alias table for student roster imports.
    pub fn builtin_student() -> Self {
        let mut table = Self::new();
        table.add(
            "school_student_id",
            &[
                "student id",
                "studentid",
                "student number",
                "student no",
                "local id",
                "state id",
                "sid",
                "id",
            ],
        );
        table.add(
            "first_name",
            &["first name", "firstname", "fname", "first", "given name"],
        );
        table.add(
            "last_name",
            &[
                "last name",
                "lastname",
                "lname",
                "last",
                "surname",
                "family name",
            ],
        );
        table.add(
            "grade_level",
            &["grade", "grade level", "gr", "current grade"],
        );
        table.add(
            "date_of_birth",
            &["dob", "birth date", "birthdate", "date of birth", "birthday"],
        );
        table.add("gender", &["gender", "sex"]);
        table.add("ethnicity", &["ethnicity", "race", "race ethnicity"]);
        table.add("email", &["email", "email address", "student email"]);
        table.add(
            "school_id",
            &["school", "school name", "campus", "building", "school code"],
        );
        table
    }

    /// Alias table for staff imports.
    pub fn builtin_staff() -> Self {
        let mut table = Self::new();
        table.add(
            "staff_id",
            &["staff id", "teacher id", "employee id", "employee number", "id"],
        );
        table.add(
            "first_name",
            &["first name", "firstname", "fname", "first", "given name"],
        );
        table.add(
            "last_name",
            &["last name", "lastname", "lname", "last", "surname"],
        );
        table.add("email", &["email", "email address", "staff email"]);
        table.add("role", &["role", "title", "position", "job title"]);
        table.add(
            "school_id",
            &["school", "school name", "campus", "building", "school code"],
        );
        table
    }

    /// Alias table for classroom imports.
    pub fn builtin_classroom() -> Self {
        let mut table = Self::new();
        table.add(
            "classroom_name",
            &["class", "class name", "section", "course", "course name", "period"],
        );
        table.add(
            "teacher_id",
            &["teacher id", "staff id", "teacher", "instructor"],
        );
        table.add("grade_level", &["grade", "grade level", "gr"]);
        table.add("subject", &["subject", "subject area", "department"]);
        table.add(
            "school_id",
            &["school", "school name", "campus", "building", "school code"],
        );
        table
    }
}
