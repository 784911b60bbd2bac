pub mod clean;
pub mod consolidate;
pub mod csv_read;
pub mod discovery;
pub mod encoding;
pub mod error;
pub mod missing;

pub use clean::{CleanReport, clean};
pub use consolidate::{SourceContribution, consolidate};
pub use csv_read::{read_csv_str, read_csv_table};
pub use discovery::list_csv_files;
pub use encoding::read_text_file;
pub use error::{IngestError, Result};
pub use missing::{ColumnMissingness, analyze_missing, is_missing_cell, is_sentinel};
