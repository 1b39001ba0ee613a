//! Multipart form handling for `POST /extract`.

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;

/// The one document pulled out of the form's `file` field.
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The form has no `file` field at all.
    #[error("multipart form has no `file` field")]
    MissingField,
    /// A `file` field exists but carries no usable filename.
    #[error("multipart `file` field has an empty filename")]
    EmptyFilename,
    /// The multipart body itself could not be read.
    #[error(transparent)]
    Body(#[from] MultipartError),
}

/// Walks the form until the `file` field is found and reads it fully
/// into memory. Other fields are skipped, not rejected.
pub async fn read_upload(multipart: &mut Multipart) -> Result<UploadedFile, UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = sanitize_filename(field.file_name().unwrap_or_default());
        if filename.is_empty() {
            return Err(UploadError::EmptyFilename);
        }
        let bytes = field.bytes().await?;
        return Ok(UploadedFile { filename, bytes });
    }
    Err(UploadError::MissingField)
}

/// Reduces a client-supplied filename to a safe display name: path
/// components are stripped and control characters replaced. Extension
/// classification is unaffected since the final dot segment survives.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    base.chars()
        .map(|c| if c.is_control() { '_' } else { c })
        .collect()
}
