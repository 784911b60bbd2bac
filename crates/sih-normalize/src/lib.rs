pub mod backfill;
pub mod cache;
pub mod key;
pub mod normalizer;

pub use backfill::backfill_placeholders;
pub use cache::KeyCache;
pub use key::{establishment_key, patient_key};
pub use normalizer::{NormalizeReport, Normalizer, RowFailure};
