pub mod cid10;
pub mod classify;
pub mod curated;
pub mod enricher;
pub mod error;
pub mod lookup;
pub mod procedures;
pub mod variants;

pub use cid10::{Cid10Catalog, is_primary_care_sensitive, parse_cid10_file, parse_cid10_text};
pub use classify::{municipality_region, procedure_group};
pub use enricher::{
    DEFAULT_EXTERNAL_DELAY, EnrichOptions, EnrichReport, SpaceReport, enrich_all, enrich_space,
    seed_curated,
};
pub use error::{EnrichError, Result};
pub use lookup::{ExternalLookup, LookupChain, LookupOutcome};
pub use procedures::{load_procedure_file, parse_procedure_text};
pub use variants::code_variants;
