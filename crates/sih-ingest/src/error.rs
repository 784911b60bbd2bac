use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("input directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unsupported encoding in {path}: {encoding}")]
    UnsupportedEncoding { path: PathBuf, encoding: &'static str },
    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Model(#[from] sih_model::ModelError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
