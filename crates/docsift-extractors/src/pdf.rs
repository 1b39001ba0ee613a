//! PDF decoding via `pdf-extract`.

use docsift_core::format::FormatTag;
use docsift_core::{ExtractorError, FormatExtractor, RawText, StagedInput};

/// Extracts page text with the pure-Rust `pdf-extract` crate.
///
/// Scanned PDFs without a text layer decode to little or nothing; that
/// is reported as success with short text, not as an error.
pub struct PdfExtractor;

impl FormatExtractor for PdfExtractor {
    fn format(&self) -> FormatTag {
        FormatTag::Pdf
    }

    fn extract(&self, input: &StagedInput) -> Result<RawText, ExtractorError> {
        let text = pdf_extract::extract_text(input.path())
            .map_err(|err| ExtractorError::Malformed(format!("failed to parse PDF: {err}")))?;
        Ok(RawText::Text(text))
    }
}
