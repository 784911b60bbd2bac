use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("empty column name")]
    EmptyColumnName,
    #[error("row width {got} does not match column count {expected}")]
    RowWidth { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
