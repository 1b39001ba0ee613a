//! RFC 822 message decoding via `mail-parser`.

use docsift_core::format::FormatTag;
use docsift_core::{ExtractorError, FormatExtractor, RawText, StagedInput};
use mail_parser::MessageParser;

use crate::html::html_to_text;

/// Extracts the subject line and the first body of an `.eml` message.
///
/// Plain-text bodies are preferred; an HTML-only message is rendered
/// through the same DOM walk the web decoder uses. Transfer encodings
/// and charsets are handled by the parser.
pub struct EmailExtractor;

impl FormatExtractor for EmailExtractor {
    fn format(&self) -> FormatTag {
        FormatTag::Email
    }

    fn extract(&self, input: &StagedInput) -> Result<RawText, ExtractorError> {
        let bytes = input.read()?;
        let message = MessageParser::default()
            .parse(&bytes)
            .ok_or_else(|| ExtractorError::Malformed("unparseable RFC 822 message".to_owned()))?;

        let mut out = String::new();
        if let Some(subject) = message.subject() {
            out.push_str(subject);
            out.push_str("\n\n");
        }
        if let Some(body) = message.body_text(0) {
            out.push_str(&body);
        } else if let Some(markup) = message.body_html(0) {
            out.push_str(&html_to_text(&markup));
        }
        Ok(RawText::Text(out))
    }
}
