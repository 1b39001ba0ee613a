//! Extractor trait and the registry that routes formats to decoders.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::format::FormatTag;

/// A classified upload staged on disk, handed to an extractor.
///
/// The path always carries the upload's declared extension as its suffix;
/// extractors that serve several extensions dispatch on it. The staging
/// file belongs to the pipeline and is deleted once extraction finishes,
/// so extractors must not hold on to the path.
#[derive(Debug, Clone)]
pub struct StagedInput {
    path: PathBuf,
}

impl StagedInput {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lowercased extension of the staging file.
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    pub fn read(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }
}

/// What a decoder hands back before normalization.
///
/// Decoders that produce `String` output return `Text`; decoders that
/// capture raw program output return `Bytes` and leave UTF-8 validation
/// to the pipeline.
#[derive(Debug)]
pub enum RawText {
    Text(String),
    Bytes(Vec<u8>),
}

/// Failure inside a single decoder.
#[derive(Debug, thiserror::Error)]
pub enum ExtractorError {
    /// The input does not parse as the format its extension promised.
    #[error("{0}")]
    Malformed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// An external program the decoder shells out to could not be run.
    #[error("`{tool}` is not available: {reason}")]
    ToolUnavailable { tool: String, reason: String },
    /// An external program ran but reported failure.
    #[error("`{tool}` failed: {reason}")]
    ToolFailed { tool: String, reason: String },
}

/// A synchronous decoder for one format family.
///
/// Implementations are called on blocking worker threads and may take
/// their time; the pipeline enforces the deadline. They must be safe to
/// share across concurrent extractions.
pub trait FormatExtractor: Send + Sync {
    /// The family this extractor serves.
    fn format(&self) -> FormatTag;

    fn extract(&self, input: &StagedInput) -> Result<RawText, ExtractorError>;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no extractor registered for format `{0}`")]
    MissingFormat(FormatTag),
    #[error("more than one extractor registered for format `{0}`")]
    DuplicateFormat(FormatTag),
}

/// Immutable format -> extractor table, validated at construction.
///
/// `new` refuses both gaps and double registrations, so a service that
/// boots can decode every format the classifier accepts.
pub struct ExtractorRegistry {
    extractors: HashMap<FormatTag, Arc<dyn FormatExtractor>>,
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("formats", &self.extractors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ExtractorRegistry {
    pub fn new(capabilities: Vec<Arc<dyn FormatExtractor>>) -> Result<Self, RegistryError> {
        let mut extractors: HashMap<FormatTag, Arc<dyn FormatExtractor>> = HashMap::new();
        for extractor in capabilities {
            let tag = extractor.format();
            if extractors.insert(tag, extractor).is_some() {
                return Err(RegistryError::DuplicateFormat(tag));
            }
        }
        for tag in FormatTag::ALL {
            if !extractors.contains_key(&tag) {
                return Err(RegistryError::MissingFormat(tag));
            }
        }
        Ok(Self { extractors })
    }

    pub fn get(&self, tag: FormatTag) -> Option<Arc<dyn FormatExtractor>> {
        self.extractors.get(&tag).cloned()
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedText {
        tag: FormatTag,
    }

    impl FormatExtractor for FixedText {
        fn format(&self) -> FormatTag {
            self.tag
        }

        fn extract(&self, _input: &StagedInput) -> Result<RawText, ExtractorError> {
            Ok(RawText::Text(format!("decoded as {}", self.tag)))
        }
    }

    fn full_set() -> Vec<Arc<dyn FormatExtractor>> {
        FormatTag::ALL
            .iter()
            .map(|tag| Arc::new(FixedText { tag: *tag }) as Arc<dyn FormatExtractor>)
            .collect()
    }

    #[test]
    fn full_coverage_builds() {
        let registry = ExtractorRegistry::new(full_set()).unwrap();
        assert_eq!(registry.len(), FormatTag::ALL.len());
        for tag in FormatTag::ALL {
            assert!(registry.get(tag).is_some());
        }
    }

    #[test]
    fn missing_format_is_rejected() {
        let mut capabilities = full_set();
        capabilities.retain(|extractor| extractor.format() != FormatTag::Email);
        let err = ExtractorRegistry::new(capabilities).unwrap_err();
        assert_eq!(err, RegistryError::MissingFormat(FormatTag::Email));
    }

    #[test]
    fn duplicate_format_is_rejected() {
        let mut capabilities = full_set();
        capabilities.push(Arc::new(FixedText {
            tag: FormatTag::Pdf,
        }));
        let err = ExtractorRegistry::new(capabilities).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateFormat(FormatTag::Pdf));
    }

    #[test]
    fn staged_input_reports_its_extension() {
        let input = StagedInput::new(PathBuf::from("/tmp/upload-x9.DOCX"));
        assert_eq!(input.extension(), "docx");
        let bare = StagedInput::new(PathBuf::from("/tmp/upload"));
        assert_eq!(bare.extension(), "");
    }
}
