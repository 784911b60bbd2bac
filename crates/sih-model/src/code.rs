//! Code spaces and reference descriptions.

use std::fmt;

use serde::Serialize;

/// A reference-code vocabulary with its own lookup table in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CodeSpace {
    Diagnosis,
    Municipality,
    Procedure,
    Establishment,
}

impl CodeSpace {
    /// Human prefix used for generated placeholder descriptions.
    pub fn placeholder_prefix(self) -> &'static str {
        match self {
            CodeSpace::Diagnosis => "Diagnóstico",
            CodeSpace::Municipality => "Município",
            CodeSpace::Procedure => "Procedimento",
            CodeSpace::Establishment => "Estabelecimento",
        }
    }
}

impl fmt::Display for CodeSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CodeSpace::Diagnosis => "diagnosis",
            CodeSpace::Municipality => "municipality",
            CodeSpace::Procedure => "procedure",
            CodeSpace::Establishment => "establishment",
        };
        f.write_str(name)
    }
}

/// Generated description for a code nothing could resolve. Every foreign
/// key must join to some description, so this is the floor, never `None`.
pub fn placeholder_description(space: CodeSpace, code: &str) -> String {
    format!("{} {}", space.placeholder_prefix(), code)
}

/// A fully classified CID-10 diagnosis entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisEntry {
    pub description: String,
    pub chapter: String,
    pub group: String,
    /// True when the condition is considered manageable by outpatient
    /// primary care (internação por condição sensível à atenção básica).
    pub primary_care_sensitive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_uses_space_prefix() {
        assert_eq!(
            placeholder_description(CodeSpace::Diagnosis, "N390"),
            "Diagnóstico N390"
        );
        assert_eq!(
            placeholder_description(CodeSpace::Municipality, "4106902"),
            "Município 4106902"
        );
    }
}
