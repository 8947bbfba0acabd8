//! Assessment column families.
//!
//! A family is the set of columns sharing one prefix (the text before the
//! first `" - "` separator), together describing a single test
//! administration, e.g. `"2022-23 Gr 3 ELA NJSLA"`.

use std::sync::LazyLock;

use regex::Regex;

static GRADE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bgr(?:ade)?\.?\s*(\d{1,2})\b").expect("grade regex"));

static SCHOOL_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4}-\d{2})\b").expect("school year regex"));

/// Parsed identity of one assessment column family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentFamily {
    /// Shared column prefix, verbatim.
    pub prefix: String,
    /// Canonical subject name ("ELA", "Mathematics", "Science", or the
    /// cleaned-up prefix remainder for elective subjects).
    pub subject: String,
    /// Grade token extracted from the prefix, empty when absent.
    pub grade: String,
    /// School year shaped like `2022-23`, when the prefix carries one.
    pub school_year: Option<String>,
}

impl AssessmentFamily {
    pub fn parse(prefix: &str) -> Self {
        let grade = GRADE_RE
            .captures(prefix)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let school_year = SCHOOL_YEAR_RE
            .captures(prefix)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        Self {
            prefix: prefix.to_string(),
            subject: subject_from_prefix(prefix),
            grade,
            school_year,
        }
    }

    /// Candidate keys for a column inside this family: the prefixed form
    /// first, then the bare suffix for files without a shared prefix.
    pub fn keys(&self, suffix: &str) -> [String; 2] {
        [format!("{} - {}", self.prefix, suffix), suffix.to_string()]
    }

    /// Uppercase subject token used in `assessmentType` tags.
    pub fn subject_token(&self) -> String {
        match self.subject.as_str() {
            "Mathematics" => "MATH".to_string(),
            other => {
                let mut token = String::new();
                let mut pending = false;
                for ch in other.trim().chars() {
                    if ch.is_ascii_alphanumeric() {
                        if pending && !token.is_empty() {
                            token.push('_');
                        }
                        pending = false;
                        token.push(ch.to_ascii_uppercase());
                    } else {
                        pending = true;
                    }
                }
                token
            }
        }
    }
}

fn subject_from_prefix(prefix: &str) -> String {
    let lower = prefix.to_lowercase();
    // Replacement electives ("Replacement Mathematics", "Replacement
    // Language Arts") score on the percent basis under their full name;
    // the core-subject shortcuts must not claim them.
    if !lower.contains("replacement") {
        if lower.contains("ela") || lower.contains("language arts") {
            return "ELA".to_string();
        }
        if lower.contains("math") {
            return "Mathematics".to_string();
        }
        if lower.contains("science") {
            return "Science".to_string();
        }
    }
    // Elective exports name the subject directly in the prefix. Strip the
    // year, grade, and test tokens and keep whatever subject text remains.
    let mut cleaned = SCHOOL_YEAR_RE.replace_all(prefix, " ").to_string();
    cleaned = GRADE_RE.replace_all(&cleaned, " ").to_string();
    let mut kept = Vec::new();
    for word in cleaned.split_whitespace() {
        let word_lower = word.to_lowercase();
        if matches!(
            word_lower.as_str(),
            "njsla" | "njsls" | "linkit" | "start" | "strong" | "form" | "a" | "b" | "assessment"
                | "test" | "benchmark"
        ) {
            continue;
        }
        kept.push(word);
    }
    if kept.is_empty() {
        "General".to_string()
    } else {
        kept.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_year_grade_subject() {
        let family = AssessmentFamily::parse("2022-23 Gr 3 ELA NJSLA");
        assert_eq!(family.subject, "ELA");
        assert_eq!(family.grade, "3");
        assert_eq!(family.school_year.as_deref(), Some("2022-23"));
    }

    #[test]
    fn math_prefix_maps_to_mathematics() {
        let family = AssessmentFamily::parse("Grade 5 Math NJSLS Form A");
        assert_eq!(family.subject, "Mathematics");
        assert_eq!(family.subject_token(), "MATH");
        assert_eq!(family.grade, "5");
    }

    #[test]
    fn elective_subject_survives_token_stripping() {
        let family = AssessmentFamily::parse("2023-24 Gr 7 Spanish Benchmark");
        assert_eq!(family.subject, "Spanish");
        assert_eq!(family.subject_token(), "SPANISH");
    }

    #[test]
    fn replacement_electives_keep_their_full_name() {
        let math = AssessmentFamily::parse("2023-24 Gr 7 Replacement Mathematics Benchmark");
        assert_eq!(math.subject, "Replacement Mathematics");
        assert_eq!(math.grade, "7");
        assert_eq!(math.subject_token(), "REPLACEMENT_MATHEMATICS");

        let la = AssessmentFamily::parse("Gr 7 Replacement Language Arts Benchmark");
        assert_eq!(la.subject, "Replacement Language Arts");
    }

    #[test]
    fn keys_prefer_prefixed_form() {
        let family = AssessmentFamily::parse("Start Strong ELA");
        let keys = family.keys("Raw");
        assert_eq!(keys[0], "Start Strong ELA - Raw");
        assert_eq!(keys[1], "Raw");
    }
}
