//! Shared state handed to every handler.

use docsift_core::ExtractionPipeline;

pub struct AppState {
    pub pipeline: ExtractionPipeline,
    /// Upload cap enforced before the pipeline ever sees the bytes.
    pub max_upload_bytes: u64,
}

impl AppState {
    pub fn new(pipeline: ExtractionPipeline, max_upload_bytes: u64) -> Self {
        Self {
            pipeline,
            max_upload_bytes,
        }
    }
}
