pub mod error;
pub mod issue;
pub mod report;
pub mod schema;
pub mod table;

pub use error::{ModelError, Result};
pub use issue::{Severity, ValidationIssue};
pub use report::{CorrectionRecord, Report};
pub use schema::{
    ChoiceKind, DEFAULT_DATE_FIELDS, DataType, FieldSpec, PRIMARY_FIELD, SchemaRegistry,
};
pub use table::{DISPLAY_INDEX_COLUMN, IndexedTable, Row, Table};
