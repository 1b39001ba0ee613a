//! Zip-packaged XML documents: `.docx`, `.pptx`, and `.odt`.
//!
//! All three are zip containers around XML. The decoder opens the
//! container, picks the member XML for the declared extension, and runs
//! a streaming event loop that collects character data from the
//! text-bearing elements of each dialect.

use std::io::{Cursor, Read};

use docsift_core::format::FormatTag;
use docsift_core::{ExtractorError, FormatExtractor, RawText, StagedInput};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Which XML elements carry text in one dialect.
struct XmlTextRules {
    /// Subtree roots whose character data is collected.
    capture: &'static [&'static [u8]],
    /// Elements whose close marks a paragraph boundary.
    break_after: &'static [&'static [u8]],
    /// Self-closing elements that stand for literal characters.
    literal: &'static [(&'static [u8], &'static str)],
}

/// WordprocessingML: runs of text live in `<w:t>` inside `<w:p>`.
const DOCX_RULES: XmlTextRules = XmlTextRules {
    capture: &[b"w:t"],
    break_after: &[b"w:p"],
    literal: &[(b"w:br", "\n"), (b"w:tab", "\t")],
};

/// DrawingML text used by slides: `<a:t>` inside `<a:p>`.
const PPTX_RULES: XmlTextRules = XmlTextRules {
    capture: &[b"a:t"],
    break_after: &[b"a:p"],
    literal: &[(b"a:br", "\n")],
};

/// OpenDocument text: paragraphs and headings carry their text
/// directly, with spans nested inside.
const ODT_RULES: XmlTextRules = XmlTextRules {
    capture: &[b"text:p", b"text:h"],
    break_after: &[b"text:p", b"text:h"],
    literal: &[
        (b"text:line-break", "\n"),
        (b"text:tab", "\t"),
        (b"text:s", " "),
    ],
};

pub struct OfficeXmlExtractor;

impl FormatExtractor for OfficeXmlExtractor {
    fn format(&self) -> FormatTag {
        FormatTag::OfficeXml
    }

    fn extract(&self, input: &StagedInput) -> Result<RawText, ExtractorError> {
        let bytes = input.read()?;
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|err| ExtractorError::Malformed(format!("not a zip container: {err}")))?;

        let text = match input.extension().as_str() {
            "docx" => {
                let xml = read_entry(&mut archive, "word/document.xml")?;
                xml_text(&xml, &DOCX_RULES)?
            }
            "odt" => {
                let xml = read_entry(&mut archive, "content.xml")?;
                xml_text(&xml, &ODT_RULES)?
            }
            "pptx" => slides_text(&mut archive)?,
            other => {
                return Err(ExtractorError::Malformed(format!(
                    "unexpected container extension `{other}`"
                )));
            }
        };
        Ok(RawText::Text(text))
    }
}

fn read_entry(
    archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>,
    name: &str,
) -> Result<Vec<u8>, ExtractorError> {
    let mut entry = archive
        .by_name(name)
        .map_err(|_| ExtractorError::Malformed(format!("container has no `{name}` entry")))?;
    let mut xml = Vec::new();
    entry.read_to_end(&mut xml)?;
    Ok(xml)
}

/// Concatenates the text of every slide, in slide-number order.
fn slides_text(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>) -> Result<String, ExtractorError> {
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .map(str::to_owned)
        .collect();
    if names.is_empty() {
        return Err(ExtractorError::Malformed(
            "presentation has no slides".to_owned(),
        ));
    }
    names.sort_by_key(|name| slide_number(name));

    let mut slides = Vec::with_capacity(names.len());
    for name in &names {
        let xml = read_entry(archive, name)?;
        slides.push(xml_text(&xml, &PPTX_RULES)?);
    }
    Ok(slides.join("\n"))
}

fn slide_number(name: &str) -> u32 {
    name.strip_prefix("ppt/slides/slide")
        .and_then(|rest| rest.strip_suffix(".xml"))
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(u32::MAX)
}

/// Streaming text collection over one XML document.
fn xml_text(xml: &[u8], rules: &XmlTextRules) -> Result<String, ExtractorError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut out = String::new();
    let mut capture_depth = 0usize;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if rules.capture.contains(&e.name().as_ref()) {
                    capture_depth += 1;
                }
            }
            Ok(Event::Text(e)) => {
                if capture_depth > 0 {
                    let text = e.unescape().map_err(|err| {
                        ExtractorError::Malformed(format!("bad XML text node: {err}"))
                    })?;
                    out.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if capture_depth > 0 {
                    out.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if rules.capture.contains(&name.as_ref()) {
                    capture_depth = capture_depth.saturating_sub(1);
                }
                if rules.break_after.contains(&name.as_ref()) {
                    out.push('\n');
                }
            }
            Ok(Event::Empty(e)) => {
                let name = e.name();
                if let Some((_, replacement)) = rules
                    .literal
                    .iter()
                    .find(|(element, _)| *element == name.as_ref())
                {
                    out.push_str(replacement);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(ExtractorError::Malformed(format!(
                    "invalid document XML: {err}"
                )));
            }
        }
        buf.clear();
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::testing::staged;

    fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn extract_str(bytes: &[u8], suffix: &str) -> Result<String, ExtractorError> {
        let (_guard, input) = staged(bytes, suffix);
        match OfficeXmlExtractor.extract(&input)? {
            RawText::Text(text) => Ok(text),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn docx_paragraphs_and_runs() {
        let document = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t xml:space="preserve"> world</w:t></w:r></w:p>
    <w:p><w:r><w:t>Second</w:t></w:r><w:r><w:br/></w:r><w:r><w:t>paragraph</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let bytes = zip_bytes(&[("word/document.xml", document)]);
        let text = extract_str(&bytes, ".docx").unwrap();
        assert_eq!(text.trim(), "Hello world\nSecond\nparagraph");
    }

    #[test]
    fn docx_unescapes_entities() {
        let document = r#"<w:document xmlns:w="x"><w:body>
            <w:p><w:r><w:t>Fish &amp; chips</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let bytes = zip_bytes(&[("word/document.xml", document)]);
        let text = extract_str(&bytes, ".docx").unwrap();
        assert_eq!(text.trim(), "Fish & chips");
    }

    #[test]
    fn odt_headings_and_spans() {
        let content = r#"<office:document-content xmlns:office="o" xmlns:text="t">
  <office:body><office:text>
    <text:h>Title</text:h>
    <text:p>Body <text:span>text</text:span></text:p>
  </office:text></office:body>
</office:document-content>"#;
        let bytes = zip_bytes(&[("content.xml", content)]);
        let text = extract_str(&bytes, ".odt").unwrap();
        assert_eq!(text.trim(), "Title\nBody text");
    }

    #[test]
    fn pptx_slides_come_out_in_slide_order() {
        let slide = |body: &str| {
            format!(
                r#"<p:sld xmlns:p="p" xmlns:a="a"><p:cSld><p:spTree><p:sp><p:txBody>
                    <a:p><a:r><a:t>{body}</a:t></a:r></a:p>
                </p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#
            )
        };
        let (tenth, second, first) = (slide("Tenth"), slide("Second"), slide("First"));
        // Added out of order; extraction must sort numerically.
        let bytes = zip_bytes(&[
            ("ppt/slides/slide10.xml", tenth.as_str()),
            ("ppt/slides/slide2.xml", second.as_str()),
            ("ppt/slides/slide1.xml", first.as_str()),
        ]);
        let text = extract_str(&bytes, ".pptx").unwrap();
        let slides: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(slides, vec!["First", "Second", "Tenth"]);
    }

    #[test]
    fn rejects_non_zip_bytes() {
        let err = extract_str(b"not a zip archive", ".docx").unwrap_err();
        assert!(matches!(err, ExtractorError::Malformed(msg) if msg.contains("zip")));
    }

    #[test]
    fn rejects_container_without_document_xml() {
        let bytes = zip_bytes(&[("[Content_Types].xml", "<Types/>")]);
        let err = extract_str(&bytes, ".docx").unwrap_err();
        assert!(matches!(err, ExtractorError::Malformed(msg) if msg.contains("word/document.xml")));
    }

    #[test]
    fn rejects_presentation_without_slides() {
        let bytes = zip_bytes(&[("[Content_Types].xml", "<Types/>")]);
        let err = extract_str(&bytes, ".pptx").unwrap_err();
        assert!(matches!(err, ExtractorError::Malformed(msg) if msg.contains("slides")));
    }
}
