pub mod code;
pub mod columns;
pub mod entities;
pub mod error;
pub mod ids;
pub mod table;

pub use code::{CodeSpace, DiagnosisEntry, placeholder_description};
pub use entities::{Admission, Establishment, FinancialValues, Patient};
pub use error::{ModelError, Result};
pub use ids::EntityKey;
pub use table::RawTable;

/// Token substituted for a missing component when deriving an entity key,
/// so the key is always well-formed. Two rows missing the same fields
/// deliberately collide into the same entity.
pub const MISSING_KEY_TOKEN: &str = "NA";
