//! JSON response shapes and the error-to-response mapping.

use axum::Json;
use axum::http::StatusCode;
use docsift_core::format::{self, CatalogFamily};
use docsift_core::{ExtractError, ExtractionResult};
use serde::Serialize;

use crate::upload::UploadError;

/// Success payload for `POST /extract`.
#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub status: &'static str,
    pub filename: String,
    pub extracted_text: String,
    pub text_length: usize,
    pub file_info: FileInfo,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FileInfo {
    pub size: u64,
    /// `null` when the extension has no canonical MIME type.
    pub mime_type: Option<&'static str>,
    pub size_mb: f64,
}

impl ExtractResponse {
    pub fn new(filename: String, result: ExtractionResult) -> Self {
        Self {
            status: "success",
            filename,
            extracted_text: result.text,
            text_length: result.char_count,
            file_info: FileInfo {
                size: result.source.size_bytes,
                mime_type: result.source.mime_type,
                size_mb: result.source.size_mb,
            },
            message: "Text extraction completed successfully",
        }
    }
}

/// Error payload shared by every failure response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    /// Stable error kind, safe to branch on client-side.
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl ErrorResponse {
    fn new(error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: "error",
            error,
            message: message.into(),
            filename: None,
        }
    }

    fn with_filename(mut self, filename: String) -> Self {
        self.filename = Some(filename);
        self
    }
}

/// Maps a pipeline failure to its HTTP status and JSON body.
pub fn extraction_failure(err: ExtractError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        ExtractError::UnsupportedFormat { filename } => (
            StatusCode::BAD_REQUEST,
            Json(
                ErrorResponse::new(
                    "Unsupported file format",
                    format!("Supported formats: {}", supported_list()),
                )
                .with_filename(filename),
            ),
        ),
        ExtractError::EmptyInput { filename } => (
            StatusCode::BAD_REQUEST,
            Json(
                ErrorResponse::new("Empty file", "The uploaded file contains no data")
                    .with_filename(filename),
            ),
        ),
        ExtractError::Decode {
            filename, cause, ..
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(
                ErrorResponse::new(
                    "Text extraction failed",
                    format!("Could not extract text from file: {cause}"),
                )
                .with_filename(filename),
            ),
        ),
        ExtractError::Encoding { filename, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(
                ErrorResponse::new(
                    "Text encoding error",
                    "Extracted content is not valid UTF-8",
                )
                .with_filename(filename),
            ),
        ),
        ExtractError::Configuration { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(
                "Internal server error",
                "An unexpected error occurred during processing",
            )),
        ),
    }
}

/// Maps a multipart-level failure to its HTTP status and JSON body.
pub fn upload_failure(err: UploadError, max_label: &str) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        UploadError::MissingField => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "No file provided",
                "Please upload a file using the \"file\" field",
            )),
        ),
        UploadError::EmptyFilename => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "No file selected",
                "Please select a file to upload",
            )),
        ),
        UploadError::Body(multipart_err) => {
            if multipart_err.status() == StatusCode::PAYLOAD_TOO_LARGE {
                payload_too_large(max_label)
            } else {
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(
                        "Invalid request",
                        multipart_err.to_string(),
                    )),
                )
            }
        }
    }
}

pub fn payload_too_large(max_label: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::PAYLOAD_TOO_LARGE,
        Json(ErrorResponse::new(
            "File too large",
            format!("Maximum file size is {max_label}"),
        )),
    )
}

fn supported_list() -> String {
    format::supported_extensions().collect::<Vec<_>>().join(", ")
}

/// `GET /formats` payload.
#[derive(Debug, Serialize)]
pub struct FormatCatalogResponse {
    pub supported_formats: SupportedFormats,
    pub total_formats: usize,
    pub max_file_size: String,
    pub note: &'static str,
}

#[derive(Debug, Default, Serialize)]
pub struct SupportedFormats {
    pub documents: Vec<&'static str>,
    pub presentations: Vec<&'static str>,
    pub spreadsheets: Vec<&'static str>,
    pub images: Vec<&'static str>,
    pub web: Vec<&'static str>,
    pub email: Vec<&'static str>,
    pub ebooks: Vec<&'static str>,
}

impl SupportedFormats {
    /// Built from the core format table so the catalog can never drift
    /// from what the classifier accepts.
    pub fn current() -> Self {
        let mut formats = Self::default();
        for (family, extensions) in format::catalog() {
            let slot = match family {
                CatalogFamily::Documents => &mut formats.documents,
                CatalogFamily::Presentations => &mut formats.presentations,
                CatalogFamily::Spreadsheets => &mut formats.spreadsheets,
                CatalogFamily::Images => &mut formats.images,
                CatalogFamily::Web => &mut formats.web,
                CatalogFamily::Email => &mut formats.email,
                CatalogFamily::Ebooks => &mut formats.ebooks,
            };
            *slot = extensions.clone();
        }
        formats
    }
}

/// `GET /` payload.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub supported_formats: Vec<&'static str>,
    pub max_file_size: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    #[serde(rename = "POST /extract")]
    pub extract: &'static str,
    #[serde(rename = "GET /formats")]
    pub formats: &'static str,
    #[serde(rename = "GET /health")]
    pub health: &'static str,
    #[serde(rename = "GET /")]
    pub info: &'static str,
}

impl ServiceInfo {
    pub fn current(max_upload_bytes: u64) -> Self {
        Self {
            service: "Document Text Extraction API",
            status: "running",
            version: env!("CARGO_PKG_VERSION"),
            supported_formats: format::supported_extensions().collect(),
            max_file_size: crate::config::size_label(max_upload_bytes),
            endpoints: Endpoints {
                extract: "Extract text from uploaded document",
                formats: "Supported file formats",
                health: "Health check endpoint",
                info: "API information",
            },
        }
    }
}

/// `GET /health` payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Seconds since the Unix epoch at the time of the probe.
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_maps_to_400_with_the_format_list() {
        let (status, Json(body)) = extraction_failure(ExtractError::UnsupportedFormat {
            filename: "archive.zip".to_owned(),
        });
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Unsupported file format");
        assert_eq!(body.status, "error");
        assert_eq!(body.filename.as_deref(), Some("archive.zip"));
        assert!(body.message.contains("pdf"));
        assert!(body.message.contains("epub"));
    }

    #[test]
    fn decode_and_encoding_failures_map_to_500() {
        let (status, Json(body)) = extraction_failure(ExtractError::Decode {
            filename: "broken.docx".to_owned(),
            format: docsift_core::FormatTag::OfficeXml,
            cause: "not a zip container".to_owned(),
            timed_out: false,
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Text extraction failed");
        assert!(body.message.contains("not a zip container"));

        let (status, Json(body)) = extraction_failure(ExtractError::Encoding {
            filename: "odd.doc".to_owned(),
            format: docsift_core::FormatTag::WordLegacy,
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Text encoding error");
    }

    #[test]
    fn catalog_snapshot_matches_the_format_table() {
        let formats = SupportedFormats::current();
        assert_eq!(formats.documents, vec!["pdf", "docx", "doc", "txt", "rtf", "odt"]);
        assert_eq!(formats.presentations, vec!["pptx"]);
        assert_eq!(formats.spreadsheets, vec!["xlsx", "xls", "csv"]);
        assert_eq!(formats.images, vec!["jpeg", "jpg", "png", "tiff", "tif", "gif"]);
        assert_eq!(formats.web, vec!["html", "htm"]);
        assert_eq!(formats.email, vec!["eml"]);
        assert_eq!(formats.ebooks, vec!["epub"]);
    }

    #[test]
    fn success_payload_carries_the_normalized_result() {
        let result = ExtractionResult {
            text: "Hello, world!".to_owned(),
            char_count: 13,
            source: docsift_core::SourceInfo::for_upload(14, "txt"),
        };
        let response = ExtractResponse::new("notes.txt".to_owned(), result);
        assert_eq!(response.status, "success");
        assert_eq!(response.text_length, 13);
        assert_eq!(response.file_info.size, 14);
        assert_eq!(response.file_info.mime_type, Some("text/plain"));
    }
}
