//! PDF text extraction.
//!
//! Thin wrapper over the PDF collaborator: all page text, concatenated in
//! page order. Section bounding and keyword work happen downstream in
//! [`crate::keywords`].

use std::path::Path;

use thiserror::Error;

/// Errors from PDF text extraction.
#[derive(Debug, Error)]
pub enum PdfError {
    /// The file does not exist or is not readable
    #[error("cannot read PDF at {path}: {reason}")]
    Unreadable { path: String, reason: String },

    /// The PDF collaborator failed to extract text
    #[error("PDF extraction failed for {path}: {reason}")]
    Extraction { path: String, reason: String },
}

/// Result type for PDF operations.
pub type PdfResult<T> = Result<T, PdfError>;

/// Extract the full text of a PDF, pages concatenated in order.
///
/// # Errors
/// [`PdfError::Unreadable`] when the path cannot be opened,
/// [`PdfError::Extraction`] when the document cannot be parsed.
pub fn extract_text(path: &Path) -> PdfResult<String> {
    let display = path.display().to_string();

    if !path.is_file() {
        return Err(PdfError::Unreadable {
            path: display,
            reason: "no such file".to_string(),
        });
    }

    pdf_extract::extract_text(path).map_err(|e| PdfError::Extraction {
        path: display,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_unreadable() {
        let err = extract_text(Path::new("/nonexistent/paper.pdf")).unwrap_err();
        assert!(matches!(err, PdfError::Unreadable { .. }));
    }

    #[test]
    fn non_pdf_content_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-pdf.pdf");
        std::fs::write(&path, b"plain text, no PDF header").unwrap();

        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, PdfError::Extraction { .. }));
    }
}
