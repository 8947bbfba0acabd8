use assess_map::{AliasTable, ColumnMatcher};

fn matcher() -> ColumnMatcher {
    ColumnMatcher::new(AliasTable::builtin_student())
}

fn student_targets() -> Vec<String> {
    ["school_student_id", "first_name", "last_name", "grade_level"]
        .iter()
        .map(|name| (*name).to_string())
        .collect()
}

#[test]
fn roster_headers_match_exactly() {
    let headers = vec![
        "Student ID".to_string(),
        "First Name".to_string(),
        "Last Name".to_string(),
        "Grade".to_string(),
    ];
    let mappings = matcher().match_columns(&headers, &student_targets());

    assert_eq!(mappings.len(), 4);
    for mapping in &mappings {
        assert!(mapping.matched, "{} should match", mapping.source_column);
        assert_eq!(mapping.confidence, 1.0);
    }
    assert_eq!(mappings[0].target_field, "school_student_id");
    assert_eq!(mappings[1].target_field, "first_name");
    assert_eq!(mappings[2].target_field, "last_name");
    assert_eq!(mappings[3].target_field, "grade_level");
}

#[test]
fn alias_hits_ignore_threshold() {
    // Even with an impossible threshold, an alias hit is forced to 1.0.
    let strict = ColumnMatcher::new(AliasTable::builtin_student()).with_threshold(2.0);
    let mappings = strict.match_columns(&["First Name".to_string()], &student_targets());
    assert_eq!(mappings[0].confidence, 1.0);
    assert!(mappings[0].matched);
    assert_eq!(mappings[0].target_field, "first_name");
}

#[test]
fn one_mapping_per_source_column() {
    let headers: Vec<String> = [
        "Student ID",
        "First Name",
        "Homeroom",
        "Counselor Notes",
        "",
    ]
    .iter()
    .map(|name| (*name).to_string())
    .collect();
    let mappings = matcher().match_columns(&headers, &student_targets());
    assert_eq!(mappings.len(), headers.len());
}

#[test]
fn matching_is_idempotent() {
    let headers: Vec<String> = ["Student ID", "DOB", "Race", "Homeroom Teacher"]
        .iter()
        .map(|name| (*name).to_string())
        .collect();
    let targets = student_targets();
    let m = matcher();
    let first = m.match_columns(&headers, &targets);
    let second = m.match_columns(&headers, &targets);
    assert_eq!(first, second);
}

#[test]
fn substring_containment_scores_below_alias() {
    // "Student First" contains the alias "first" of first_name -> exact tier.
    let mappings = matcher().match_columns(
        &["Student First".to_string()],
        &["first_name".to_string(), "last_name".to_string()],
    );
    assert_eq!(mappings[0].target_field, "first_name");
    assert_eq!(mappings[0].confidence, 1.0);
}

#[test]
fn unrelated_column_stays_below_default_threshold() {
    let mappings = matcher().match_columns(
        &["Bus Route".to_string()],
        &["first_name".to_string(), "grade_level".to_string()],
    );
    assert!(!mappings[0].matched, "got {:?}", mappings[0]);
}
