use std::path::Path;

use tracing::{debug, info_span};

use mgm_model::{SchemaRegistry, Table};

use crate::align::{align_to_schema, check_columns};
use crate::csv_ingest::read_delimited;
use crate::dates::{DateParser, DefaultDateParser, apply_date_policy};
use crate::error::IngestError;
use crate::xlsx_ingest::read_spreadsheet;

/// Upload formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
}

impl FileKind {
    /// Case-insensitive extension dispatch. An empty name means nothing
    /// was chosen.
    pub fn from_file_name(file_name: &str) -> Result<Self, IngestError> {
        if file_name.trim().is_empty() {
            return Err(IngestError::NoInput);
        }
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(IngestError::UnsupportedFileType { extension }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Load an uploaded file into a schema-aligned table using the default
/// date policy.
pub fn from_upload(
    file_name: &str,
    bytes: &[u8],
    registry: &SchemaRegistry,
) -> Result<Table, IngestError> {
    from_upload_with(file_name, bytes, registry, &DefaultDateParser)
}

/// As [`from_upload`] with a caller-chosen date parser.
///
/// The column set is checked before any date is parsed, so a file with
/// unknown columns reports those and nothing else.
pub fn from_upload_with(
    file_name: &str,
    bytes: &[u8],
    registry: &SchemaRegistry,
    date_parser: &dyn DateParser,
) -> Result<Table, IngestError> {
    let kind = FileKind::from_file_name(file_name)?;
    let span = info_span!("ingest_upload", kind = kind.as_str(), bytes = bytes.len());
    let _guard = span.enter();

    let mut raw = match kind {
        FileKind::Csv => read_delimited(bytes)?,
        FileKind::Xlsx => read_spreadsheet(bytes)?,
    };
    check_columns(&raw, registry)?;
    apply_date_policy(&mut raw, &registry.date_fields(), date_parser)?;
    if raw.rows.is_empty() {
        return Err(IngestError::EmptySubmission);
    }

    let table = align_to_schema(&raw, registry)?;
    debug!(rows = table.len(), "upload aligned to schema");
    Ok(table)
}
