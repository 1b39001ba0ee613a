//! Filename-driven format classification.
//!
//! A single static table maps every supported extension to its decoder
//! family, catalog family, and canonical MIME type. The classifier, the
//! `/formats` catalog, and MIME reporting all read from this table, so
//! the three can never disagree about what the service supports.

use std::fmt;

use once_cell::sync::Lazy;

/// Decoder family a file is routed to once classified.
///
/// Several extensions can share a tag (`.jpeg` and `.png` are both
/// `RasterImage`); the registry holds exactly one extractor per tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    Pdf,
    PlainText,
    Rtf,
    /// Zip-packaged XML documents: `.docx`, `.pptx`, `.odt`.
    OfficeXml,
    /// Pre-OOXML binary Word documents (`.doc`).
    WordLegacy,
    /// Workbook formats read as cell grids (`.xlsx`, `.xls`).
    Spreadsheet,
    DelimitedText,
    RasterImage,
    Web,
    Email,
    Ebook,
}

impl FormatTag {
    pub const ALL: [FormatTag; 11] = [
        FormatTag::Pdf,
        FormatTag::PlainText,
        FormatTag::Rtf,
        FormatTag::OfficeXml,
        FormatTag::WordLegacy,
        FormatTag::Spreadsheet,
        FormatTag::DelimitedText,
        FormatTag::RasterImage,
        FormatTag::Web,
        FormatTag::Email,
        FormatTag::Ebook,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FormatTag::Pdf => "pdf",
            FormatTag::PlainText => "plain-text",
            FormatTag::Rtf => "rtf",
            FormatTag::OfficeXml => "office-xml",
            FormatTag::WordLegacy => "word-legacy",
            FormatTag::Spreadsheet => "spreadsheet",
            FormatTag::DelimitedText => "delimited-text",
            FormatTag::RasterImage => "raster-image",
            FormatTag::Web => "web",
            FormatTag::Email => "email",
            FormatTag::Ebook => "ebook",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Grouping used by the format catalog endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogFamily {
    Documents,
    Presentations,
    Spreadsheets,
    Images,
    Web,
    Email,
    Ebooks,
}

impl CatalogFamily {
    pub const ALL: [CatalogFamily; 7] = [
        CatalogFamily::Documents,
        CatalogFamily::Presentations,
        CatalogFamily::Spreadsheets,
        CatalogFamily::Images,
        CatalogFamily::Web,
        CatalogFamily::Email,
        CatalogFamily::Ebooks,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CatalogFamily::Documents => "documents",
            CatalogFamily::Presentations => "presentations",
            CatalogFamily::Spreadsheets => "spreadsheets",
            CatalogFamily::Images => "images",
            CatalogFamily::Web => "web",
            CatalogFamily::Email => "email",
            CatalogFamily::Ebooks => "ebooks",
        }
    }
}

struct FormatEntry {
    extension: &'static str,
    tag: FormatTag,
    family: CatalogFamily,
    mime: &'static str,
}

const FORMAT_TABLE: &[FormatEntry] = &[
    FormatEntry {
        extension: "pdf",
        tag: FormatTag::Pdf,
        family: CatalogFamily::Documents,
        mime: "application/pdf",
    },
    FormatEntry {
        extension: "docx",
        tag: FormatTag::OfficeXml,
        family: CatalogFamily::Documents,
        mime: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    },
    FormatEntry {
        extension: "doc",
        tag: FormatTag::WordLegacy,
        family: CatalogFamily::Documents,
        mime: "application/msword",
    },
    FormatEntry {
        extension: "txt",
        tag: FormatTag::PlainText,
        family: CatalogFamily::Documents,
        mime: "text/plain",
    },
    FormatEntry {
        extension: "rtf",
        tag: FormatTag::Rtf,
        family: CatalogFamily::Documents,
        mime: "application/rtf",
    },
    FormatEntry {
        extension: "odt",
        tag: FormatTag::OfficeXml,
        family: CatalogFamily::Documents,
        mime: "application/vnd.oasis.opendocument.text",
    },
    FormatEntry {
        extension: "pptx",
        tag: FormatTag::OfficeXml,
        family: CatalogFamily::Presentations,
        mime: "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    },
    FormatEntry {
        extension: "xlsx",
        tag: FormatTag::Spreadsheet,
        family: CatalogFamily::Spreadsheets,
        mime: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    },
    FormatEntry {
        extension: "xls",
        tag: FormatTag::Spreadsheet,
        family: CatalogFamily::Spreadsheets,
        mime: "application/vnd.ms-excel",
    },
    FormatEntry {
        extension: "csv",
        tag: FormatTag::DelimitedText,
        family: CatalogFamily::Spreadsheets,
        mime: "text/csv",
    },
    FormatEntry {
        extension: "jpeg",
        tag: FormatTag::RasterImage,
        family: CatalogFamily::Images,
        mime: "image/jpeg",
    },
    FormatEntry {
        extension: "jpg",
        tag: FormatTag::RasterImage,
        family: CatalogFamily::Images,
        mime: "image/jpeg",
    },
    FormatEntry {
        extension: "png",
        tag: FormatTag::RasterImage,
        family: CatalogFamily::Images,
        mime: "image/png",
    },
    FormatEntry {
        extension: "tiff",
        tag: FormatTag::RasterImage,
        family: CatalogFamily::Images,
        mime: "image/tiff",
    },
    FormatEntry {
        extension: "tif",
        tag: FormatTag::RasterImage,
        family: CatalogFamily::Images,
        mime: "image/tiff",
    },
    FormatEntry {
        extension: "gif",
        tag: FormatTag::RasterImage,
        family: CatalogFamily::Images,
        mime: "image/gif",
    },
    FormatEntry {
        extension: "html",
        tag: FormatTag::Web,
        family: CatalogFamily::Web,
        mime: "text/html",
    },
    FormatEntry {
        extension: "htm",
        tag: FormatTag::Web,
        family: CatalogFamily::Web,
        mime: "text/html",
    },
    FormatEntry {
        extension: "eml",
        tag: FormatTag::Email,
        family: CatalogFamily::Email,
        mime: "message/rfc822",
    },
    FormatEntry {
        extension: "epub",
        tag: FormatTag::Ebook,
        family: CatalogFamily::Ebooks,
        mime: "application/epub+zip",
    },
];

/// Catalog listing in table order, one `(family, extensions)` pair per
/// family that has at least one member.
static CATALOG: Lazy<Vec<(CatalogFamily, Vec<&'static str>)>> = Lazy::new(|| {
    CatalogFamily::ALL
        .iter()
        .map(|family| {
            let extensions = FORMAT_TABLE
                .iter()
                .filter(|entry| entry.family == *family)
                .map(|entry| entry.extension)
                .collect();
            (*family, extensions)
        })
        .collect()
});

/// Lowercased final extension segment of `filename`, if it has one.
///
/// Only the last dot-separated segment counts: `archive.tar.gz` declares
/// `gz`, not `tar.gz`. A name without any dot declares nothing.
pub fn declared_extension(filename: &str) -> Option<String> {
    let (_, extension) = filename.rsplit_once('.')?;
    Some(extension.to_ascii_lowercase())
}

/// Routes `filename` to a decoder family, or `None` when the name has no
/// extension or the extension is not in the supported set.
pub fn classify(filename: &str) -> Option<FormatTag> {
    let extension = declared_extension(filename)?;
    tag_for_extension(&extension)
}

/// Decoder family for an already-isolated extension.
pub fn tag_for_extension(extension: &str) -> Option<FormatTag> {
    let lowered = extension.to_ascii_lowercase();
    FORMAT_TABLE
        .iter()
        .find(|entry| entry.extension == lowered)
        .map(|entry| entry.tag)
}

pub fn is_supported_extension(extension: &str) -> bool {
    let lowered = extension.to_ascii_lowercase();
    FORMAT_TABLE.iter().any(|entry| entry.extension == lowered)
}

/// Canonical MIME type for a supported extension.
pub fn mime_type(extension: &str) -> Option<&'static str> {
    let lowered = extension.to_ascii_lowercase();
    FORMAT_TABLE
        .iter()
        .find(|entry| entry.extension == lowered)
        .map(|entry| entry.mime)
}

/// Every supported extension, in catalog order.
pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
    FORMAT_TABLE.iter().map(|entry| entry.extension)
}

pub fn supported_format_count() -> usize {
    FORMAT_TABLE.len()
}

/// Extensions grouped by catalog family, for the format listing endpoint.
pub fn catalog() -> &'static [(CatalogFamily, Vec<&'static str>)] {
    CATALOG.as_slice()
}
