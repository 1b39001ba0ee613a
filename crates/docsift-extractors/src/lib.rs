//! Decoders for every format family the service accepts.
//!
//! Most formats are decoded with pure-Rust crates. OCR for raster
//! images and legacy `.doc` conversion shell out to external programs
//! (`tesseract` and `antiword`), with the program paths taken from
//! [`ToolConfig`]. [`build_registry`] wires one decoder per family into
//! a validated [`ExtractorRegistry`].

pub mod ebook;
pub mod email;
pub mod external;
pub mod html;
pub mod office;
pub mod pdf;
pub mod rtf;
pub mod spreadsheet;
pub mod text;

use std::sync::Arc;

use docsift_core::{ExtractorRegistry, RegistryError};

pub use external::{RasterImageExtractor, WordLegacyExtractor};

/// External programs some decoders rely on.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// OCR program invoked for raster images.
    pub tesseract_program: String,
    /// Language set passed to tesseract's `-l` flag.
    pub tesseract_languages: String,
    /// Converter invoked for legacy `.doc` files.
    pub antiword_program: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            tesseract_program: "tesseract".to_owned(),
            tesseract_languages: "eng".to_owned(),
            antiword_program: "antiword".to_owned(),
        }
    }
}

/// Builds the full decoder set, one extractor per format family.
///
/// The registry constructor verifies coverage, so a service that boots
/// from this function can decode everything the classifier accepts.
pub fn build_registry(tools: &ToolConfig) -> Result<ExtractorRegistry, RegistryError> {
    ExtractorRegistry::new(vec![
        Arc::new(text::PlainTextExtractor),
        Arc::new(pdf::PdfExtractor),
        Arc::new(rtf::RtfExtractor),
        Arc::new(office::OfficeXmlExtractor),
        Arc::new(external::WordLegacyExtractor::new(&tools.antiword_program)),
        Arc::new(spreadsheet::SpreadsheetExtractor),
        Arc::new(spreadsheet::DelimitedTextExtractor),
        Arc::new(external::RasterImageExtractor::new(
            &tools.tesseract_program,
            &tools.tesseract_languages,
        )),
        Arc::new(html::WebExtractor),
        Arc::new(email::EmailExtractor),
        Arc::new(ebook::EbookExtractor),
    ])
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::Write;

    use docsift_core::StagedInput;

    /// Stages bytes in a temp file whose name carries `suffix`.
    ///
    /// Returns the guard alongside the input so the file outlives the
    /// assertion.
    pub(crate) fn staged(bytes: &[u8], suffix: &str) -> (tempfile::NamedTempFile, StagedInput) {
        let mut file = tempfile::Builder::new()
            .prefix("fixture-")
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        let input = StagedInput::new(file.path().to_path_buf());
        (file, input)
    }
}

#[cfg(test)]
mod tests {
    use docsift_core::format::FormatTag;

    use super::*;

    #[test]
    fn default_tool_set_covers_every_format() {
        let registry = build_registry(&ToolConfig::default()).unwrap();
        assert_eq!(registry.len(), FormatTag::ALL.len());
        for tag in FormatTag::ALL {
            assert!(registry.get(tag).is_some(), "no extractor for {tag}");
        }
    }
}
