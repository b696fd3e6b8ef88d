use thiserror::Error;

use mgm_model::{ModelError, ValidationIssue};

/// Fatal ingestion failure. The input is discarded; no partial table exists.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported file type: {extension}")]
    UnsupportedFileType { extension: String },

    #[error("unexpected columns: {}", .0.join(", "))]
    UnexpectedColumns(Vec<String>),

    #[error("every submitted row is empty")]
    EmptySubmission,

    #[error("no data submitted")]
    NoInput,

    #[error("malformed form: {0}")]
    MalformedForm(String),

    #[error("unreadable input: {0}")]
    Unreadable(String),

    #[error("row {row}, column '{column}': cannot parse date '{value}'")]
    InvalidDate {
        row: usize,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl IngestError {
    /// Fatal issues for the request report. Unexpected columns are reported
    /// one issue per name.
    pub fn into_issues(self) -> Vec<ValidationIssue> {
        match self {
            IngestError::UnsupportedFileType { extension } => {
                vec![ValidationIssue::UnsupportedFileType { extension }]
            }
            IngestError::UnexpectedColumns(names) => names
                .into_iter()
                .map(|name| ValidationIssue::UnexpectedColumn { name })
                .collect(),
            IngestError::EmptySubmission => vec![ValidationIssue::EmptySubmission],
            IngestError::NoInput => vec![ValidationIssue::NoInput],
            IngestError::MalformedForm(message) => {
                vec![ValidationIssue::MalformedForm { message }]
            }
            other @ (IngestError::Unreadable(_)
            | IngestError::InvalidDate { .. }
            | IngestError::Model(_)) => vec![ValidationIssue::UnreadableInput {
                message: other.to_string(),
            }],
        }
    }
}

impl From<csv::Error> for IngestError {
    fn from(error: csv::Error) -> Self {
        IngestError::Unreadable(error.to_string())
    }
}

impl From<calamine::XlsxError> for IngestError {
    fn from(error: calamine::XlsxError) -> Self {
        IngestError::Unreadable(error.to_string())
    }
}
