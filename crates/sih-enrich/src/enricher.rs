//! Per-space enrichment drivers.
//!
//! Resolution order per code, first hit wins: authoritative file (where
//! one exists) → curated fallback table → external lookup capability.
//! When the exact code misses everywhere, the same chain is retried for
//! each generated variant; whatever still misses gets a placeholder
//! description plus a prefix-heuristic classification, so no observed
//! code is ever left unresolved.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use sih_model::{CodeSpace, DiagnosisEntry, placeholder_description};
use sih_store::Store;

use crate::cid10::{Cid10Catalog, is_primary_care_sensitive};
use crate::classify::{municipality_region, procedure_group};
use crate::curated;
use crate::error::Result;
use crate::lookup::{ExternalLookup, LookupOutcome};
use crate::procedures::ProcedureCatalog;
use crate::variants::code_variants;

const UNCLASSIFIED: &str = "Não classificado";

/// Pause before each external call; reference services are public and
/// rate-limited, and lookups are sequential by design.
pub const DEFAULT_EXTERNAL_DELAY: Duration = Duration::from_millis(500);

/// Inputs for one enrichment run. Everything is optional: with no
/// authoritative files and no external capability the run still
/// terminates with curated hits and placeholders.
pub struct EnrichOptions<'a> {
    pub cid10: Option<Cid10Catalog>,
    pub procedures: Option<ProcedureCatalog>,
    pub external: Option<&'a dyn ExternalLookup>,
    pub external_delay: Duration,
}

impl Default for EnrichOptions<'_> {
    fn default() -> Self {
        Self {
            cid10: None,
            procedures: None,
            external: None,
            external_delay: DEFAULT_EXTERNAL_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpaceReport {
    pub space: CodeSpace,
    pub codes: usize,
    pub resolved: usize,
    pub placeholders: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrichReport {
    pub spaces: Vec<SpaceReport>,
}

impl EnrichReport {
    pub fn total_codes(&self) -> usize {
        self.spaces.iter().map(|s| s.codes).sum()
    }

    pub fn total_resolved(&self) -> usize {
        self.spaces.iter().map(|s| s.resolved).sum()
    }
}

/// Tries each strategy on the exact code, then re-runs the whole chain
/// per variant. First hit wins.
fn resolve_with_variants<T>(
    space: CodeSpace,
    code: &str,
    strategies: &[&dyn Fn(&str) -> Option<T>],
) -> Option<T> {
    for strategy in strategies {
        if let Some(resolved) = strategy(code) {
            return Some(resolved);
        }
    }
    for variant in code_variants(space, code) {
        for strategy in strategies {
            if let Some(resolved) = strategy(&variant) {
                debug!(space = %space, code, variant = %variant, "resolved through variant");
                return Some(resolved);
            }
        }
    }
    None
}

/// Adapter for the injected capability: `Failed` degrades to a miss so
/// the enrichment loop keeps going. The pause runs before every call.
fn external_hit(options: &EnrichOptions<'_>, code: &str) -> Option<String> {
    let external = options.external?;
    if !options.external_delay.is_zero() {
        std::thread::sleep(options.external_delay);
    }
    match external.lookup(code) {
        LookupOutcome::Found(description) => Some(description),
        LookupOutcome::NotFound | LookupOutcome::Failed(_) => None,
    }
}

/// Loads the curated fallback rows into their tables, the seed state the
/// code tables start from before observation back-fill and enrichment.
pub fn seed_curated(store: &Store) -> Result<()> {
    for (code, name, state) in curated::MUNICIPALITIES {
        let region = if *state == "PR" { "Paraná" } else { "Outros Estados" };
        store.upsert_municipality(code, name, region)?;
    }
    for (tax_id, name, kind) in curated::ESTABLISHMENTS {
        store.upsert_establishment_name(tax_id, name, kind)?;
    }
    for (code, description, group) in curated::PROCEDURES {
        store.upsert_procedure(code, description, group)?;
    }
    Ok(())
}

pub fn enrich_space(
    store: &Store,
    space: CodeSpace,
    options: &EnrichOptions<'_>,
) -> Result<SpaceReport> {
    let codes = store.observed_codes(space)?;
    let mut report = SpaceReport {
        space,
        codes: codes.len(),
        resolved: 0,
        placeholders: 0,
    };

    for code in &codes {
        let resolved = match space {
            CodeSpace::Diagnosis => enrich_diagnosis(store, code, options)?,
            CodeSpace::Municipality => enrich_municipality(store, code, options)?,
            CodeSpace::Procedure => enrich_procedure(store, code, options)?,
            CodeSpace::Establishment => enrich_establishment(store, code, options)?,
        };
        if resolved {
            report.resolved += 1;
        } else {
            report.placeholders += 1;
        }
    }

    info!(
        space = %space,
        codes = report.codes,
        resolved = report.resolved,
        placeholders = report.placeholders,
        "enriched code space"
    );
    Ok(report)
}

/// Runs every code space and refreshes the curated seeds first.
pub fn enrich_all(store: &Store, options: &EnrichOptions<'_>) -> Result<EnrichReport> {
    seed_curated(store)?;
    let mut report = EnrichReport::default();
    for space in [
        CodeSpace::Diagnosis,
        CodeSpace::Municipality,
        CodeSpace::Procedure,
        CodeSpace::Establishment,
    ] {
        report.spaces.push(enrich_space(store, space, options)?);
    }
    Ok(report)
}

fn enrich_diagnosis(store: &Store, code: &str, options: &EnrichOptions<'_>) -> Result<bool> {
    let from_catalog = |candidate: &str| -> Option<DiagnosisEntry> {
        options.cid10.as_ref()?.get(candidate).cloned()
    };
    let from_external = |candidate: &str| -> Option<DiagnosisEntry> {
        external_hit(options, candidate).map(|description| DiagnosisEntry {
            description,
            chapter: UNCLASSIFIED.to_string(),
            group: UNCLASSIFIED.to_string(),
            primary_care_sensitive: is_primary_care_sensitive(code),
        })
    };

    let strategies: [&dyn Fn(&str) -> Option<DiagnosisEntry>; 2] =
        [&from_catalog, &from_external];
    match resolve_with_variants(CodeSpace::Diagnosis, code, &strategies) {
        Some(entry) => {
            store.upsert_diagnosis(
                code,
                &entry.description,
                &entry.chapter,
                &entry.group,
                entry.primary_care_sensitive,
            )?;
            Ok(true)
        }
        None => {
            store.upsert_diagnosis(
                code,
                &placeholder_description(CodeSpace::Diagnosis, code),
                UNCLASSIFIED,
                UNCLASSIFIED,
                is_primary_care_sensitive(code),
            )?;
            Ok(false)
        }
    }
}

fn enrich_municipality(store: &Store, code: &str, options: &EnrichOptions<'_>) -> Result<bool> {
    let from_curated = |candidate: &str| -> Option<(String, String)> {
        curated::municipality(candidate)
            .map(|(name, _state)| (name.to_string(), municipality_region(candidate).to_string()))
    };
    let from_external = |candidate: &str| -> Option<(String, String)> {
        external_hit(options, candidate)
            .map(|name| (name, municipality_region(candidate).to_string()))
    };

    let strategies: [&dyn Fn(&str) -> Option<(String, String)>; 2] =
        [&from_curated, &from_external];
    match resolve_with_variants(CodeSpace::Municipality, code, &strategies) {
        Some((name, region)) => {
            store.upsert_municipality(code, &name, &region)?;
            Ok(true)
        }
        None => {
            // Codes in the 41 range are almost certainly Paraná even when
            // the reference misses them; keep that in the region label.
            let (name, region) = if code.starts_with("41") {
                (
                    format!("Município PR {code}"),
                    "Paraná (não identificado)".to_string(),
                )
            } else {
                (
                    placeholder_description(CodeSpace::Municipality, code),
                    "Outros Estados (não identificado)".to_string(),
                )
            };
            store.upsert_municipality(code, &name, &region)?;
            Ok(false)
        }
    }
}

fn enrich_procedure(store: &Store, code: &str, options: &EnrichOptions<'_>) -> Result<bool> {
    let from_file = |candidate: &str| -> Option<(String, String)> {
        options
            .procedures
            .as_ref()?
            .get(candidate)
            .map(|description| (description.clone(), procedure_group(candidate).to_string()))
    };
    let from_curated = |candidate: &str| -> Option<(String, String)> {
        curated::procedure(candidate)
            .map(|(description, group)| (description.to_string(), group.to_string()))
    };
    let from_external = |candidate: &str| -> Option<(String, String)> {
        external_hit(options, candidate)
            .map(|description| (description, procedure_group(candidate).to_string()))
    };

    let strategies: [&dyn Fn(&str) -> Option<(String, String)>; 3] =
        [&from_file, &from_curated, &from_external];
    match resolve_with_variants(CodeSpace::Procedure, code, &strategies) {
        Some((description, group)) => {
            store.upsert_procedure(code, &description, &group)?;
            Ok(true)
        }
        None => {
            store.upsert_procedure(
                code,
                &placeholder_description(CodeSpace::Procedure, code),
                procedure_group(code),
            )?;
            Ok(false)
        }
    }
}

fn enrich_establishment(store: &Store, code: &str, options: &EnrichOptions<'_>) -> Result<bool> {
    let from_curated = |candidate: &str| -> Option<(String, String)> {
        curated::establishment(candidate).map(|(name, kind)| (name.to_string(), kind.to_string()))
    };
    let from_external = |candidate: &str| -> Option<(String, String)> {
        external_hit(options, candidate)
            .map(|name| (name, UNCLASSIFIED.to_string()))
    };

    let strategies: [&dyn Fn(&str) -> Option<(String, String)>; 2] =
        [&from_curated, &from_external];
    match resolve_with_variants(CodeSpace::Establishment, code, &strategies) {
        Some((name, kind)) => {
            store.upsert_establishment_name(code, &name, &kind)?;
            Ok(true)
        }
        None => {
            store.upsert_establishment_name(
                code,
                &placeholder_description(CodeSpace::Establishment, code),
                "Não Identificado",
            )?;
            Ok(false)
        }
    }
}
