//! Core machinery for turning uploaded documents into plain text.
//!
//! The crate is deliberately transport-agnostic: it knows nothing about
//! HTTP. It provides the format table ([`format`]), the extractor trait
//! and registry ([`registry`]), and the staging/decoding/normalization
//! pipeline ([`pipeline`]). The web layer sits on top and only ever
//! calls [`ExtractionPipeline::extract`].

pub mod format;
pub mod pipeline;
pub mod registry;

pub use format::{CatalogFamily, FormatTag, classify};
pub use pipeline::ExtractionPipeline;
pub use registry::{
    ExtractorError, ExtractorRegistry, FormatExtractor, RawText, RegistryError, StagedInput,
};

/// Bytes per mebibyte, the unit upload sizes are reported in.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Upload size in mebibytes, rounded to two decimal places.
pub fn size_in_mb(size_bytes: u64) -> f64 {
    (size_bytes as f64 / BYTES_PER_MB as f64 * 100.0).round() / 100.0
}

/// Size and type metadata reported alongside extracted text.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    pub size_bytes: u64,
    pub size_mb: f64,
    pub mime_type: Option<&'static str>,
}

impl SourceInfo {
    pub fn for_upload(size_bytes: u64, extension: &str) -> Self {
        Self {
            size_bytes,
            size_mb: size_in_mb(size_bytes),
            mime_type: format::mime_type(extension),
        }
    }
}

/// Normalized output of one successful extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    /// Extracted text with leading and trailing whitespace removed.
    pub text: String,
    /// Character count of `text`, counted in Unicode scalar values.
    pub char_count: usize,
    pub source: SourceInfo,
}

/// Everything that can go wrong between an upload and its text.
///
/// Each variant keeps the original filename so callers can echo it back
/// without threading it separately.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The filename has no extension or one outside the supported set.
    #[error("unsupported file format: {filename}")]
    UnsupportedFormat { filename: String },
    /// The upload body was zero bytes.
    #[error("empty upload: {filename}")]
    EmptyInput { filename: String },
    /// The decoder failed, crashed, or ran past the deadline.
    #[error("extraction failed for {filename}: {cause}")]
    Decode {
        filename: String,
        format: FormatTag,
        cause: String,
        timed_out: bool,
    },
    /// The decoder produced bytes that are not valid UTF-8.
    #[error("extracted content of {filename} is not valid UTF-8")]
    Encoding {
        filename: String,
        format: FormatTag,
    },
    /// A classified format had no registered extractor. With a validated
    /// registry this cannot happen; it is kept as a distinct kind so a
    /// broken deployment fails loudly instead of mislabeling the error.
    #[error("no extractor available for format `{format}`")]
    Configuration {
        filename: String,
        format: FormatTag,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_in_mb_rounds_to_two_places() {
        assert_eq!(size_in_mb(1_048_576), 1.0);
        assert_eq!(size_in_mb(1_572_864), 1.5);
        assert_eq!(size_in_mb(2_621_440), 2.5);
        assert_eq!(size_in_mb(1_000_000), 0.95);
        assert_eq!(size_in_mb(13), 0.0);
        assert_eq!(size_in_mb(0), 0.0);
        assert_eq!(size_in_mb(16 * BYTES_PER_MB), 16.0);
    }

    #[test]
    fn source_info_carries_canonical_mime() {
        let info = SourceInfo::for_upload(1_048_576, "pdf");
        assert_eq!(info.size_bytes, 1_048_576);
        assert_eq!(info.size_mb, 1.0);
        assert_eq!(info.mime_type, Some("application/pdf"));
    }
}
