pub mod align;
pub mod csv_ingest;
pub mod dates;
pub mod error;
pub mod form;
pub mod raw_table;
pub mod upload;
pub mod xlsx_ingest;

pub use align::{align_to_schema, check_columns};
pub use csv_ingest::{from_delimited_text, read_delimited};
pub use dates::{
    DateParser, DefaultDateParser, ParsedDate, apply_date_policy, render_date, render_timestamp,
};
pub use error::IngestError;
pub use form::{FormAction, FormLayout, FormSubmission, from_form_pairs};
pub use raw_table::RawTable;
pub use upload::{FileKind, from_upload, from_upload_with};
pub use xlsx_ingest::{from_spreadsheet, read_spreadsheet};
