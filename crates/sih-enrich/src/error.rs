use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("reference file not found: {path}")]
    ReferenceNotFound { path: PathBuf },
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Store(#[from] sih_store::StoreError),
}

pub type Result<T> = std::result::Result<T, EnrichError>;
