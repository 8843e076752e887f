//! Text extraction for the reference document.
//!
//! The service indexes exactly one document. Connectors are not involved:
//! this module takes a path from configuration and returns plain UTF-8
//! text. PDF content goes through `pdf-extract`; Markdown and plain-text
//! files are read as-is. Extraction never panics on malformed input — the
//! caller decides whether a failure is fatal (the chat path treats it as
//! "retrieval unavailable").

use std::path::{Path, PathBuf};

/// Extraction error. A missing document is distinguished from a corrupt
/// one so the chat path can degrade quietly while the CLI can be loud.
#[derive(Debug)]
pub enum ExtractError {
    NotFound(PathBuf),
    Pdf(String),
    Io(String),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::NotFound(path) => {
                write!(f, "document not found: {}", path.display())
            }
            ExtractError::Pdf(e) => write!(f, "PDF extraction failed: {}", e),
            ExtractError::Io(e) => write!(f, "failed to read document: {}", e),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Extracts plain text from the document at `path`.
///
/// Dispatches on the file extension: `pdf` is parsed with `pdf-extract`,
/// everything else is read as UTF-8 text.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::NotFound(path.to_path_buf()));
    }

    let is_pdf = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if is_pdf {
        let bytes = std::fs::read(path).map_err(|e| ExtractError::Io(e.to_string()))?;
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
    } else {
        std::fs::read_to_string(path).map_err(|e| ExtractError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_returns_not_found() {
        let err = extract_text(Path::new("/nonexistent/handbook.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::NotFound(_)));
    }

    #[test]
    fn invalid_pdf_returns_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("bad.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();
        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    #[test]
    fn plain_text_read_as_is() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("handbook.md");
        std::fs::write(&path, "# Handbook\n\nVacation policy.").unwrap();
        let text = extract_text(&path).unwrap();
        assert!(text.contains("Vacation policy."));
    }
}
