//! CID-10 reference-file parsing.
//!
//! The reference is a plain-text listing where every meaningful line is
//! exactly one of three things: a chapter header (`CAPÍTULO IX - ...`), a
//! group-range header (`I10-I15 Doenças hipertensivas`), or a code
//! definition (`I10 Hipertensão essencial`). The scanner carries the
//! current chapter and group as explicit state while walking the file in
//! order; only the line classifier mutates that state.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use sih_model::DiagnosisEntry;

use crate::error::{EnrichError, Result};

static CODE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]\d{2})\.?(\d)?\s+(.+)$").unwrap());
static CHAPTER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^CAP[ÍI]TULO\s+([IVX]+)\s*-?\s*(.+)$").unwrap());
static GROUP_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]\d{2}-[A-Z]\d{2})\s+(.+)$").unwrap());

/// Chapter titles by roman numeral, used in place of whatever header text
/// a given file revision carries.
const CHAPTER_TITLES: &[(&str, &str)] = &[
    ("I", "Doenças infecciosas e parasitárias"),
    ("II", "Neoplasias"),
    ("III", "Doenças do sangue e dos órgãos hematopoéticos"),
    ("IV", "Doenças endócrinas, nutricionais e metabólicas"),
    ("V", "Transtornos mentais e comportamentais"),
    ("VI", "Doenças do sistema nervoso"),
    ("VII", "Doenças do olho e anexos"),
    ("VIII", "Doenças do ouvido e da apófise mastóide"),
    ("IX", "Doenças do aparelho circulatório"),
    ("X", "Doenças do aparelho respiratório"),
    ("XI", "Doenças do aparelho digestivo"),
    ("XII", "Doenças da pele e do tecido subcutâneo"),
    ("XIII", "Doenças do sistema osteomuscular"),
    ("XIV", "Doenças do aparelho geniturinário"),
    ("XV", "Gravidez, parto e puerpério"),
    ("XVI", "Algumas afecções originadas no período perinatal"),
    ("XVII", "Malformações congênitas"),
    ("XVIII", "Sintomas, sinais e achados anormais"),
    ("XIX", "Lesões, envenenamentos e outras causas externas"),
    ("XX", "Causas externas de morbidade e mortalidade"),
    ("XXI", "Fatores que influenciam o estado de saúde"),
];

/// Prefix patterns for diagnoses sensitive to primary care
/// (internações por condições sensíveis à atenção básica).
static SENSITIVE_PREFIXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^A0[0-9]", // Infecções intestinais
        r"^A3[0-9]", // Hanseníase e outras infecções
        r"^A4[6-9]", // Erisipela e outras infecções bacterianas
        r"^E1[0-4]", // Diabetes mellitus
        r"^I1[0-9]", // Doenças hipertensivas
        r"^I2[0-5]", // Doenças isquêmicas do coração
        r"^J0[0-6]", // Infecções respiratórias agudas superiores
        r"^J1[0-8]", // Pneumonia
        r"^J2[0-2]", // Outras infecções respiratórias agudas
        r"^J4[0-7]", // Doenças crônicas das vias aéreas inferiores
        r"^K2[0-9]", // Doenças do esôfago, estômago e duodeno
        r"^K5[0-9]",
        r"^L0[0-9]", // Infecções da pele
        r"^N3[0-9]", // Doenças do trato urinário
        r"^N7[0-7]", // Doenças inflamatórias dos órgãos pélvicos femininos
        r"^Z0[0-9]",
        r"^Z3[0-9]",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// True when the code falls in an ambulatory-care-sensitive range.
pub fn is_primary_care_sensitive(code: &str) -> bool {
    SENSITIVE_PREFIXES.iter().any(|rule| rule.is_match(code))
}

/// Parsed CID-10 reference: code → classified entry.
pub type Cid10Catalog = BTreeMap<String, DiagnosisEntry>;

const UNCLASSIFIED: &str = "Não classificado";

/// One line of the reference, classified. Variants are mutually
/// exclusive; anything unrecognized is `Other` and leaves state alone.
#[derive(Debug, PartialEq)]
enum Line {
    Chapter(String),
    Group(String),
    Code {
        code: String,
        description: String,
    },
    Other,
}

fn classify_line(line: &str) -> Line {
    if let Some(captures) = CHAPTER_LINE.captures(line) {
        let roman = captures.get(1).map(|m| m.as_str().to_uppercase());
        let header = captures
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        let title = roman
            .as_deref()
            .and_then(|r| {
                CHAPTER_TITLES
                    .iter()
                    .find(|(numeral, _)| *numeral == r)
                    .map(|(_, title)| title.to_string())
            })
            .unwrap_or(header);
        return Line::Chapter(title);
    }
    if let Some(captures) = GROUP_LINE.captures(line) {
        return Line::Group(captures[2].trim().to_string());
    }
    if let Some(captures) = CODE_LINE.captures(line) {
        let base = &captures[1];
        let sub = captures.get(2).map(|m| m.as_str()).unwrap_or("");
        // Cross-reference markers (+, *) are not part of the description.
        let description = captures[3].replace(['+', '*'], "").trim().to_string();
        return Line::Code {
            code: format!("{base}{sub}"),
            description,
        };
    }
    Line::Other
}

/// Scanner state: the chapter and group currently open.
struct Scanner {
    chapter: String,
    group: String,
}

impl Scanner {
    fn new() -> Self {
        Self {
            chapter: UNCLASSIFIED.to_string(),
            group: UNCLASSIFIED.to_string(),
        }
    }

    fn advance(&mut self, line: &str, catalog: &mut Cid10Catalog) {
        match classify_line(line) {
            Line::Chapter(title) => {
                self.chapter = title;
                self.group = UNCLASSIFIED.to_string();
            }
            Line::Group(title) => {
                self.group = title;
            }
            Line::Code { code, description } => {
                let sensitive = is_primary_care_sensitive(&code);
                catalog.insert(
                    code,
                    DiagnosisEntry {
                        description,
                        chapter: self.chapter.clone(),
                        group: self.group.clone(),
                        primary_care_sensitive: sensitive,
                    },
                );
            }
            Line::Other => {}
        }
    }
}

/// Parses CID-10 reference text into a catalog.
pub fn parse_cid10_text(text: &str) -> Cid10Catalog {
    let mut catalog = Cid10Catalog::new();
    let mut scanner = Scanner::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        scanner.advance(line, &mut catalog);
    }
    catalog
}

/// Reads and parses the CID-10 reference file (UTF-8, with Latin-1
/// fallback for older revisions).
pub fn parse_cid10_file(path: &Path) -> Result<Cid10Catalog> {
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
    let catalog = parse_cid10_text(&text);
    info!(codes = catalog.len(), path = %path.display(), "parsed CID-10 reference");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
CAPÍTULO IX - Doenças do aparelho circulatório
I10-I15 Doenças hipertensivas
I10 Hipertensão essencial
I11.0 Doença cardíaca hipertensiva com insuficiência cardíaca
I26-I28 Doença cardíaca pulmonar
I26 Embolia pulmonar

CAPÍTULO XIV - Doenças do aparelho geniturinário
N30-N39 Outras doenças do aparelho urinário
N39.0 Infecção do trato urinário de localização não especificada+
";

    #[test]
    fn tracks_chapter_and_group_state() {
        let catalog = parse_cid10_text(SAMPLE);
        let i10 = &catalog["I10"];
        assert_eq!(i10.description, "Hipertensão essencial");
        assert_eq!(i10.chapter, "Doenças do aparelho circulatório");
        assert_eq!(i10.group, "Doenças hipertensivas");

        // Group changes when a new range header opens.
        let i26 = &catalog["I26"];
        assert_eq!(i26.group, "Doença cardíaca pulmonar");

        // Chapter changes reset the group until the next header.
        let n390 = &catalog["N390"];
        assert_eq!(n390.chapter, "Doenças do aparelho geniturinário");
        assert_eq!(n390.group, "Outras doenças do aparelho urinário");
    }

    #[test]
    fn subcategory_codes_join_base_and_digit() {
        let catalog = parse_cid10_text(SAMPLE);
        assert!(catalog.contains_key("I110"));
        assert!(catalog.contains_key("N390"));
    }

    #[test]
    fn cross_reference_markers_are_stripped() {
        let catalog = parse_cid10_text(SAMPLE);
        assert_eq!(
            catalog["N390"].description,
            "Infecção do trato urinário de localização não especificada"
        );
    }

    #[test]
    fn sensitivity_follows_prefix_rules() {
        let catalog = parse_cid10_text(SAMPLE);
        assert!(catalog["I10"].primary_care_sensitive);
        assert!(catalog["N390"].primary_care_sensitive);
        assert!(!catalog["I26"].primary_care_sensitive);
    }

    #[test]
    fn code_before_any_header_is_unclassified() {
        let catalog = parse_cid10_text("A00 Cólera\n");
        assert_eq!(catalog["A00"].chapter, "Não classificado");
        assert_eq!(catalog["A00"].group, "Não classificado");
        assert!(catalog["A00"].primary_care_sensitive);
    }

    #[test]
    fn unknown_roman_numeral_falls_back_to_header_text() {
        let catalog = parse_cid10_text("CAPÍTULO XXV - Inventado\nA00 Cólera\n");
        assert_eq!(catalog["A00"].chapter, "Inventado");
    }

    #[test]
    fn reads_latin1_revision_from_disk() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // "A00 Cólera" with Latin-1 ó (0xF3).
        file.write_all(b"A00 C\xF3lera\n").unwrap();
        let catalog = parse_cid10_file(file.path()).unwrap();
        assert_eq!(catalog["A00"].description, "Cólera");
    }

    #[test]
    fn missing_reference_file_is_structural() {
        let err = parse_cid10_file(Path::new("/nonexistent-cid10.txt")).unwrap_err();
        assert!(matches!(err, EnrichError::ReferenceNotFound { .. }));
    }
}
