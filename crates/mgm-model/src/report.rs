use serde::{Deserialize, Serialize};

use crate::issue::ValidationIssue;

/// A normalization rewrite of one cell. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    /// 1-based row.
    pub row: usize,
    pub field: String,
    pub before: String,
    pub after: String,
}

/// Everything a single request found, in collection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub issues: Vec<ValidationIssue>,
    pub corrections: Vec<CorrectionRecord>,
    /// Operational notices that do not concern cells (e.g. skipped transfer).
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_issue(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn extend_issues(&mut self, issues: impl IntoIterator<Item = ValidationIssue>) {
        self.issues.extend(issues);
    }

    pub fn push_correction(&mut self, correction: CorrectionRecord) {
        self.corrections.push(correction);
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn fatal_count(&self) -> usize {
        self.issues.iter().filter(|issue| issue.is_fatal()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.len() - self.fatal_count()
    }

    /// Saving is blocked while this is true.
    pub fn has_fatal(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_fatal)
    }

    pub fn fatal_issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|issue| issue.is_fatal())
    }

    pub fn cell_issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|issue| !issue.is_fatal())
    }
}
