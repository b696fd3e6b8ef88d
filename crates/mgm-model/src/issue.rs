//! Validation issue types.
//!
//! Each variant carries only the data it needs. Row numbers are 1-based, as
//! shown to the person editing the table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Aborts the request; no table is returned for editing.
    Fatal,
    /// Annotates the table; the user can fix cells and resubmit.
    Warning,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fatal => "Fatal",
            Self::Warning => "Warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    // Cell checks
    InvalidDate {
        row: usize,
        field: String,
        raw: String,
    },
    InvalidEnum {
        row: usize,
        field: String,
        raw: String,
        allowed: Vec<String>,
    },
    InvalidInt {
        row: usize,
        field: String,
        raw: String,
    },
    InvalidFloat {
        row: usize,
        field: String,
        raw: String,
    },

    // Request-level problems
    UnexpectedColumn {
        name: String,
    },
    EmptySubmission,
    NoInput,
    UnsupportedFileType {
        extension: String,
    },
    UnreadableInput {
        message: String,
    },
    MalformedForm {
        message: String,
    },
    Unauthorized {
        user: String,
    },
}

impl ValidationIssue {
    pub fn severity(&self) -> Severity {
        match self {
            ValidationIssue::InvalidDate { .. }
            | ValidationIssue::InvalidEnum { .. }
            | ValidationIssue::InvalidInt { .. }
            | ValidationIssue::InvalidFloat { .. } => Severity::Warning,
            _ => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// 1-based row for cell issues.
    pub fn row(&self) -> Option<usize> {
        match self {
            ValidationIssue::InvalidDate { row, .. }
            | ValidationIssue::InvalidEnum { row, .. }
            | ValidationIssue::InvalidInt { row, .. }
            | ValidationIssue::InvalidFloat { row, .. } => Some(*row),
            _ => None,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationIssue::InvalidDate { field, .. }
            | ValidationIssue::InvalidEnum { field, .. }
            | ValidationIssue::InvalidInt { field, .. }
            | ValidationIssue::InvalidFloat { field, .. } => Some(field),
            ValidationIssue::UnexpectedColumn { name } => Some(name),
            _ => None,
        }
    }

    pub fn is_date_issue(&self) -> bool {
        matches!(self, ValidationIssue::InvalidDate { .. })
    }

    pub fn message(&self) -> String {
        match self {
            ValidationIssue::InvalidDate { row, field, .. } => format!(
                "Invalid value in row {row}, column '{field}': Expected data type: date"
            ),
            ValidationIssue::InvalidEnum {
                row,
                field,
                allowed,
                ..
            } => format!(
                "Invalid value in row {row}, column '{field}': Possible values are: '{}'",
                allowed.join(", ")
            ),
            ValidationIssue::InvalidInt { row, field, .. } => format!(
                "Invalid data type in row {row}, column '{field}': Expected data type: int"
            ),
            ValidationIssue::InvalidFloat { row, field, .. } => format!(
                "Invalid data type in row {row}, column '{field}': Expected data type: float"
            ),
            ValidationIssue::UnexpectedColumn { name } => {
                format!("Input file contains unexpected field: {name}")
            }
            ValidationIssue::EmptySubmission => "No Data".to_string(),
            ValidationIssue::NoInput => "Choose an importing file.".to_string(),
            ValidationIssue::UnsupportedFileType { extension } => {
                format!("Invalid file type: {extension}")
            }
            ValidationIssue::UnreadableInput { message } => {
                format!("Input file could not be read: {message}")
            }
            ValidationIssue::MalformedForm { message } => {
                format!("Submitted form is malformed: {message}")
            }
            ValidationIssue::Unauthorized { .. } => {
                "Unauthorized user. Please contact the database admin".to_string()
            }
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
