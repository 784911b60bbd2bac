//! External lookup capability.
//!
//! Concrete reference services (IBGE localities, tax-registry CNPJ
//! lookups, SUS procedure APIs) live outside this crate; the enricher
//! only needs "given a code, maybe a description". Implementations are
//! injected and chained here; the enricher paces calls to respect
//! third-party rate limits. A `Failed` outcome never aborts enrichment —
//! the enricher falls through to the next strategy.

use tracing::{debug, warn};

/// Result of asking one backing service about a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(String),
    NotFound,
    Failed(String),
}

/// A code→description capability backed by something external.
pub trait ExternalLookup {
    /// Service name, for logs.
    fn name(&self) -> &str;

    fn lookup(&self, code: &str) -> LookupOutcome;
}

/// Tries several backing services in sequence until one answers.
///
/// `Failed` and `NotFound` both move on to the next service; the chain
/// reports `NotFound` only when every service missed, and `Failed` when
/// at least one errored and none found anything.
pub struct LookupChain {
    services: Vec<Box<dyn ExternalLookup>>,
}

impl LookupChain {
    pub fn new(services: Vec<Box<dyn ExternalLookup>>) -> Self {
        Self { services }
    }
}

impl ExternalLookup for LookupChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn lookup(&self, code: &str) -> LookupOutcome {
        let mut failure: Option<String> = None;
        for service in &self.services {
            match service.lookup(code) {
                LookupOutcome::Found(description) => {
                    debug!(service = service.name(), code, "external lookup hit");
                    return LookupOutcome::Found(description);
                }
                LookupOutcome::NotFound => {}
                LookupOutcome::Failed(reason) => {
                    warn!(service = service.name(), code, reason = %reason, "external lookup failed");
                    failure.get_or_insert(reason);
                }
            }
        }
        match failure {
            Some(reason) => LookupOutcome::Failed(reason),
            None => LookupOutcome::NotFound,
        }
    }
}
