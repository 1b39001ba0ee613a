//! Plain text pass-through.

use docsift_core::format::FormatTag;
use docsift_core::{ExtractorError, FormatExtractor, RawText, StagedInput};

/// Returns the staged bytes unchanged; UTF-8 validation happens in the
/// pipeline so a latin-1 text file fails the same way a binary blob
/// renamed to `.txt` does.
pub struct PlainTextExtractor;

impl FormatExtractor for PlainTextExtractor {
    fn format(&self) -> FormatTag {
        FormatTag::PlainText
    }

    fn extract(&self, input: &StagedInput) -> Result<RawText, ExtractorError> {
        Ok(RawText::Bytes(input.read()?))
    }
}
