//! SUS procedure-table parsing.
//!
//! `tb_procedimento.txt` is a fixed-width Latin-1 export: a 10-digit code
//! followed by the procedure name, then packed numeric attribute fields.
//! Only the code and a cleaned-up name are wanted; the trailing numeric
//! block is detected and cut.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::error::{EnrichError, Result};

/// Maximum words kept from a description line.
const MAX_DESCRIPTION_WORDS: usize = 15;

/// Parsed procedure table: code → description.
pub type ProcedureCatalog = BTreeMap<String, String>;

fn looks_like_trailing_data(word: &str) -> bool {
    // A long run of digits, or a code-shaped mix that is mostly digits,
    // marks the start of the packed attribute block.
    if word.len() > 3 && word.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    if word.len() > 5 {
        let digits = word.bytes().filter(u8::is_ascii_digit).count();
        let has_alpha = word.bytes().any(|b| b.is_ascii_alphabetic());
        if has_alpha && digits * 2 > word.len() {
            return true;
        }
    }
    false
}

fn clean_description(raw: &str) -> String {
    let mut words = Vec::new();
    for word in raw.split_whitespace() {
        if looks_like_trailing_data(word) {
            break;
        }
        if word.chars().any(char::is_alphabetic) {
            words.push(word);
        }
        if words.len() == MAX_DESCRIPTION_WORDS {
            break;
        }
    }
    words.join(" ")
}

/// Parses fixed-width procedure-table text.
pub fn parse_procedure_text(text: &str) -> ProcedureCatalog {
    let mut catalog = ProcedureCatalog::new();
    for line in text.lines() {
        let line = line.trim_end();
        if line.len() < 11 {
            continue;
        }
        let code: String = line.chars().take(10).collect();
        if !code.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        let rest: String = line.chars().skip(10).take(290).collect();
        let description = clean_description(&rest);
        if description.is_empty() {
            continue;
        }
        catalog.insert(code, description);
    }
    catalog
}

/// Reads and parses the procedure table file (Latin-1 export).
pub fn load_procedure_file(path: &Path) -> Result<ProcedureCatalog> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            EnrichError::ReferenceNotFound {
                path: path.to_path_buf(),
            }
        } else {
            EnrichError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => encoding_rs::WINDOWS_1252.decode(err.as_bytes()).0.into_owned(),
    };
    let catalog = parse_procedure_text(&text);
    info!(codes = catalog.len(), path = %path.display(), "parsed procedure table");
    Ok(catalog)
}
