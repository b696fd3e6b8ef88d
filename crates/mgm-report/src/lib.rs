//! Sample metadata report generation.
//!
//! - **summary**: user-facing text for validation issues and corrections
//! - **export**: CSV rendering of a validated table and its file name
//! - **transfer**: staging the export and handing it to an archive

mod error;
pub mod export;
pub mod summary;
pub mod transfer;

pub use error::{ExportError, TransferError};
pub use export::{export_csv, export_file_name, sanitize_user_name, write_export};
pub use summary::{Summary, correction_lines, summarize};
pub use transfer::{
    ArchiveStatus, ArchiveTransfer, MISSING_TRANSFER_CONFIG, ScpTransfer, TransferSettings,
    archive_export,
};
