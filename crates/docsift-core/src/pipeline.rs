//! The extraction pipeline: staging, decoding, and normalization.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::format;
use crate::registry::{ExtractorRegistry, RawText, StagedInput};
use crate::{ExtractError, ExtractionResult, SourceInfo};

/// Drives one upload from raw bytes to normalized text.
///
/// The pipeline owns the scratch directory and the extraction deadline;
/// decoders only ever see a staged file. Decoding runs on a blocking
/// worker thread so a slow or wedged decoder cannot stall the async
/// runtime, and the deadline applies to the decode step alone.
pub struct ExtractionPipeline {
    registry: Arc<ExtractorRegistry>,
    scratch_dir: PathBuf,
    timeout: Duration,
}

impl ExtractionPipeline {
    /// Creates the pipeline, making sure the scratch directory exists.
    pub fn new(
        registry: Arc<ExtractorRegistry>,
        scratch_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> std::io::Result<Self> {
        let scratch_dir = scratch_dir.into();
        std::fs::create_dir_all(&scratch_dir)?;
        Ok(Self {
            registry,
            scratch_dir,
            timeout,
        })
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs the full pipeline for one upload.
    ///
    /// Classification happens before any disk I/O, so unsupported and
    /// empty uploads never touch the scratch directory. The staged copy
    /// is removed on every exit path, including deadline hits, decoder
    /// panics, and caller cancellation.
    #[tracing::instrument(skip_all, fields(filename = %filename, size = content.len()))]
    pub async fn extract(
        &self,
        filename: &str,
        content: &[u8],
    ) -> Result<ExtractionResult, ExtractError> {
        if content.is_empty() {
            return Err(ExtractError::EmptyInput {
                filename: filename.to_owned(),
            });
        }

        let extension = format::declared_extension(filename).unwrap_or_default();
        let Some(tag) = format::tag_for_extension(&extension) else {
            tracing::debug!("rejected unsupported upload");
            return Err(ExtractError::UnsupportedFormat {
                filename: filename.to_owned(),
            });
        };

        let extractor =
            self.registry
                .get(tag)
                .ok_or_else(|| ExtractError::Configuration {
                    filename: filename.to_owned(),
                    format: tag,
                })?;

        let decode_err = |cause: String, timed_out: bool| ExtractError::Decode {
            filename: filename.to_owned(),
            format: tag,
            cause,
            timed_out,
        };

        // Stage under a random name that keeps the declared extension;
        // extractors serving several extensions dispatch on the suffix.
        // The supported set is lowercase ASCII, so the suffix is inert.
        let mut staged = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&format!(".{extension}"))
            .tempfile_in(&self.scratch_dir)
            .map_err(|err| decode_err(format!("failed to stage upload: {err}"), false))?;
        staged
            .write_all(content)
            .and_then(|()| staged.flush())
            .map_err(|err| decode_err(format!("failed to stage upload: {err}"), false))?;

        let input = StagedInput::new(staged.path().to_path_buf());
        tracing::debug!(format = %tag, staged = %input.path().display(), "decoding staged upload");

        let worker = tokio::task::spawn_blocking(move || extractor.extract(&input));
        let raw = match tokio::time::timeout(self.timeout, worker).await {
            Err(_elapsed) => {
                tracing::warn!(
                    format = %tag,
                    timeout_secs = self.timeout.as_secs(),
                    "extraction deadline hit"
                );
                return Err(decode_err(
                    format!(
                        "extraction did not finish within {} seconds",
                        self.timeout.as_secs()
                    ),
                    true,
                ));
            }
            Ok(Err(join_err)) => {
                let cause = if join_err.is_panic() {
                    "decoder crashed while reading the file".to_owned()
                } else {
                    "decoder task was cancelled".to_owned()
                };
                tracing::warn!(format = %tag, %cause, "decoder did not finish");
                return Err(decode_err(cause, false));
            }
            Ok(Ok(Err(extractor_err))) => {
                tracing::warn!(format = %tag, error = %extractor_err, "decode failed");
                return Err(decode_err(extractor_err.to_string(), false));
            }
            Ok(Ok(Ok(raw))) => raw,
        };
        // Staged copy is no longer needed once the decoder returned.
        drop(staged);

        let text = match raw {
            RawText::Text(text) => text,
            RawText::Bytes(bytes) => {
                String::from_utf8(bytes).map_err(|_| ExtractError::Encoding {
                    filename: filename.to_owned(),
                    format: tag,
                })?
            }
        };

        let trimmed = text.trim();
        let result = ExtractionResult {
            text: trimmed.to_owned(),
            char_count: trimmed.chars().count(),
            source: SourceInfo::for_upload(content.len() as u64, &extension),
        };
        tracing::info!(format = %tag, chars = result.char_count, "extraction complete");
        Ok(result)
    }
}
