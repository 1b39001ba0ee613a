//! EPUB decoding: a zip container of XHTML chapters.

use std::io::{Cursor, Read};

use docsift_core::format::FormatTag;
use docsift_core::{ExtractorError, FormatExtractor, RawText, StagedInput};

use crate::html::html_to_text;

/// Renders every XHTML entry of an `.epub` through the HTML walk and
/// joins chapters with blank lines. Entries are taken in name order,
/// which matches chapter numbering in practice.
pub struct EbookExtractor;

impl FormatExtractor for EbookExtractor {
    fn format(&self) -> FormatTag {
        FormatTag::Ebook
    }

    fn extract(&self, input: &StagedInput) -> Result<RawText, ExtractorError> {
        let bytes = input.read()?;
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|err| ExtractorError::Malformed(format!("not an EPUB container: {err}")))?;
        if archive.by_name("META-INF/container.xml").is_err() {
            return Err(ExtractorError::Malformed(
                "missing META-INF/container.xml".to_owned(),
            ));
        }

        let mut names: Vec<String> = archive
            .file_names()
            .filter(|name| is_markup(name))
            .map(str::to_owned)
            .collect();
        names.sort();
        if names.is_empty() {
            return Err(ExtractorError::Malformed(
                "EPUB has no XHTML chapters".to_owned(),
            ));
        }

        let mut chapters = Vec::with_capacity(names.len());
        for name in &names {
            let mut entry = archive
                .by_name(name)
                .map_err(|err| ExtractorError::Malformed(format!("bad entry `{name}`: {err}")))?;
            let mut markup = Vec::new();
            entry.read_to_end(&mut markup)?;
            let text = html_to_text(&String::from_utf8_lossy(&markup));
            if !text.is_empty() {
                chapters.push(text);
            }
        }
        Ok(RawText::Text(chapters.join("\n\n")))
    }
}

fn is_markup(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    lowered.ends_with(".xhtml") || lowered.ends_with(".html") || lowered.ends_with(".htm")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::testing::staged;

    fn epub_bytes(chapters: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("mimetype", options).unwrap();
        writer.write_all(b"application/epub+zip").unwrap();
        writer.start_file("META-INF/container.xml", options).unwrap();
        writer.write_all(b"<container/>").unwrap();
        for (name, markup) in chapters {
            writer.start_file(*name, options).unwrap();
            writer.write_all(markup.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn chapters_join_in_name_order() {
        let bytes = epub_bytes(&[
            ("OEBPS/ch2.xhtml", "<p>Second chapter</p>"),
            ("OEBPS/ch1.xhtml", "<p>First chapter</p>"),
        ]);
        let (_guard, input) = staged(&bytes, ".epub");
        match EbookExtractor.extract(&input).unwrap() {
            RawText::Text(text) => assert_eq!(text, "First chapter\n\nSecond chapter"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn zip_without_container_manifest_is_rejected() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("ch1.xhtml", options).unwrap();
        writer.write_all(b"<p>x</p>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let (_guard, input) = staged(&bytes, ".epub");
        let err = EbookExtractor.extract(&input).unwrap_err();
        assert!(matches!(err, ExtractorError::Malformed(msg) if msg.contains("container.xml")));
    }

    #[test]
    fn non_zip_bytes_are_rejected() {
        let (_guard, input) = staged(b"just some prose", ".epub");
        let err = EbookExtractor.extract(&input).unwrap_err();
        assert!(matches!(err, ExtractorError::Malformed(_)));
    }
}
