//! Decoders that shell out to external programs.
//!
//! OCR and legacy `.doc` conversion have no mature pure-Rust option, so
//! these two families delegate to `tesseract` and `antiword` and capture
//! stdout. A missing program surfaces as [`ExtractorError::ToolUnavailable`]
//! the first time the format is requested, not at startup.

use std::process::{Command, Stdio};

use docsift_core::format::FormatTag;
use docsift_core::{ExtractorError, FormatExtractor, RawText, StagedInput};

/// Runs a configured command and returns its stdout.
fn run_capture(tool: &str, command: &mut Command) -> Result<Vec<u8>, ExtractorError> {
    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => ExtractorError::ToolUnavailable {
                tool: tool.to_owned(),
                reason: "program not found".to_owned(),
            },
            _ => ExtractorError::ToolUnavailable {
                tool: tool.to_owned(),
                reason: err.to_string(),
            },
        })?;
    if !output.status.success() {
        tracing::debug!(
            tool,
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "external tool reported failure"
        );
        return Err(ExtractorError::ToolFailed {
            tool: tool.to_owned(),
            reason: output.status.to_string(),
        });
    }
    Ok(output.stdout)
}

/// OCR for raster images: `tesseract <file> stdout -l <languages>`.
///
/// Tesseract emits UTF-8; validation still happens in the pipeline like
/// for every byte-producing decoder.
pub struct RasterImageExtractor {
    program: String,
    languages: String,
}

impl RasterImageExtractor {
    pub fn new(program: impl Into<String>, languages: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            languages: languages.into(),
        }
    }
}

impl FormatExtractor for RasterImageExtractor {
    fn format(&self) -> FormatTag {
        FormatTag::RasterImage
    }

    fn extract(&self, input: &StagedInput) -> Result<RawText, ExtractorError> {
        let mut command = Command::new(&self.program);
        command
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages);
        Ok(RawText::Bytes(run_capture(&self.program, &mut command)?))
    }
}

/// Legacy `.doc` conversion: `antiword <file>` prints the document text.
pub struct WordLegacyExtractor {
    program: String,
}

impl WordLegacyExtractor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl FormatExtractor for WordLegacyExtractor {
    fn format(&self) -> FormatTag {
        FormatTag::WordLegacy
    }

    fn extract(&self, input: &StagedInput) -> Result<RawText, ExtractorError> {
        let mut command = Command::new(&self.program);
        command.arg(input.path());
        Ok(RawText::Bytes(run_capture(&self.program, &mut command)?))
    }
}
