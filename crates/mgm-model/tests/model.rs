//! Tests for mgm-model types.

use mgm_model::{Report, Severity, ValidationIssue};

#[test]
fn cell_issues_are_warnings() {
    let issues = [
        ValidationIssue::InvalidDate {
            row: 1,
            field: "collection_date".to_string(),
            raw: "2021".to_string(),
        },
        ValidationIssue::InvalidEnum {
            row: 2,
            field: "source_type".to_string(),
            raw: "Air".to_string(),
            allowed: vec!["Soil".to_string(), "Water".to_string()],
        },
        ValidationIssue::InvalidInt {
            row: 3,
            field: "replicates".to_string(),
            raw: "3.5".to_string(),
        },
        ValidationIssue::InvalidFloat {
            row: 4,
            field: "depth".to_string(),
            raw: "deep".to_string(),
        },
    ];
    for issue in &issues {
        assert_eq!(issue.severity(), Severity::Warning, "{issue:?}");
        assert!(issue.row().is_some());
    }
}

#[test]
fn request_issues_are_fatal() {
    let issues = [
        ValidationIssue::UnexpectedColumn {
            name: "speciesx".to_string(),
        },
        ValidationIssue::EmptySubmission,
        ValidationIssue::NoInput,
        ValidationIssue::UnsupportedFileType {
            extension: ".txt".to_string(),
        },
        ValidationIssue::Unauthorized {
            user: "mallory".to_string(),
        },
    ];
    for issue in &issues {
        assert!(issue.is_fatal(), "{issue:?}");
        assert!(issue.row().is_none());
    }
}

#[test]
fn messages_name_row_and_column() {
    let issue = ValidationIssue::InvalidEnum {
        row: 2,
        field: "source_type".to_string(),
        raw: "Air".to_string(),
        allowed: vec!["Soil".to_string(), "Water".to_string()],
    };
    assert_eq!(
        issue.message(),
        "Invalid value in row 2, column 'source_type': Possible values are: 'Soil, Water'"
    );

    let issue = ValidationIssue::InvalidFloat {
        row: 4,
        field: "depth".to_string(),
        raw: "deep".to_string(),
    };
    assert_eq!(
        issue.to_string(),
        "Invalid data type in row 4, column 'depth': Expected data type: float"
    );
}

#[test]
fn issues_serialize_with_kind_tag() {
    let issue = ValidationIssue::UnexpectedColumn {
        name: "speciesx".to_string(),
    };
    let json = serde_json::to_value(&issue).expect("serialize issue");
    assert_eq!(json["kind"], "unexpected_column");
    assert_eq!(json["name"], "speciesx");
}

#[test]
fn warnings_do_not_block() {
    let mut report = Report::new();
    report.push_warning("Set META_KEY_PATH and/or META_REMOTE_PATH.");
    assert!(!report.has_fatal());
    assert_eq!(report.warning_count(), 0);
    assert_eq!(report.warnings.len(), 1);
}
