use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("duplicate field in schema: {0}")]
    DuplicateField(String),
    #[error("schema defines no fields")]
    EmptySchema,
    #[error("row has {actual} cells, table expects {expected}")]
    RowWidth { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
