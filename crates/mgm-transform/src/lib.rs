//! Sample metadata table transformations.
//!
//! - **normalize**: whitespace/separator cleanup plus per-field rewrites,
//!   reported as correction records
//! - **rows**: blank-row removal, row duplication, display indexing

pub mod normalize;
pub mod rows;

pub use normalize::{FieldRule, Normalizer, normalize_cell, normalize_table};
pub use rows::{drop_blank_rows, duplicate_last_row_on_append, with_display_index};
