//! RTF decoding via `rtf-parser`.

use docsift_core::format::FormatTag;
use docsift_core::{ExtractorError, FormatExtractor, RawText, StagedInput};
use rtf_parser::RtfDocument;

/// Parses the control-word stream and returns the document's body text.
pub struct RtfExtractor;

impl FormatExtractor for RtfExtractor {
    fn format(&self) -> FormatTag {
        FormatTag::Rtf
    }

    fn extract(&self, input: &StagedInput) -> Result<RawText, ExtractorError> {
        let bytes = input.read()?;
        // RTF is 7-bit ASCII with escapes for everything else, so lossy
        // decoding only mangles files that were malformed to begin with.
        let content = String::from_utf8_lossy(&bytes);
        let document = RtfDocument::try_from(content.as_ref())
            .map_err(|err| ExtractorError::Malformed(format!("invalid RTF document: {err:?}")))?;
        Ok(RawText::Text(document.get_text()))
    }
}
