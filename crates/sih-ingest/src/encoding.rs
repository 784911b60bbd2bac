//! Per-file text decoding.
//!
//! Monthly extracts are not consistent about encoding: some arrive as
//! UTF-8, some as Latin-1 (Windows-1252 in practice). UTF-16 is not a
//! format the source system produces and is rejected outright.

use std::path::Path;

use crate::error::{IngestError, Result};

/// Reads a whole file as text, decoding UTF-8 when valid and falling back
/// to Windows-1252 otherwise. A leading UTF-8 BOM is stripped.
pub fn read_text_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    if bytes.len() >= 2 {
        if bytes[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if bytes[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!(path = %path.display(), "not valid UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(err.as_bytes());
            decoded.into_owned()
        }
    };

    Ok(text.trim_start_matches('\u{feff}').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("CÓDIGO,NOME\n1,Curitiba\n".as_bytes()).unwrap();
        let text = read_text_file(file.path()).unwrap();
        assert!(text.starts_with("CÓDIGO"));
    }

    #[test]
    fn falls_back_to_windows_1252() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // "Município" in Latin-1: 0xED for 'í'.
        file.write_all(b"CODIGO,NOME\n1,Munic\xEDpio\n").unwrap();
        let text = read_text_file(file.path()).unwrap();
        assert!(text.contains("Município"));
    }

    #[test]
    fn strips_utf8_bom() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBFA,B\n1,2\n").unwrap();
        let text = read_text_file(file.path()).unwrap();
        assert!(text.starts_with("A,B"));
    }

    #[test]
    fn rejects_utf16() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xFF\xFEA\x00").unwrap();
        assert!(matches!(
            read_text_file(file.path()),
            Err(IngestError::UnsupportedEncoding { .. })
        ));
    }
}
