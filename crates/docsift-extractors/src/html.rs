//! HTML to plain text.

use docsift_core::format::FormatTag;
use docsift_core::{ExtractorError, FormatExtractor, RawText, StagedInput};
use ego_tree::NodeId;
use ego_tree::iter::Edge;
use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Elements whose subtree never contributes visible text.
const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that end a line of output.
const BLOCK: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "table", "tr", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "footer", "section", "article", "blockquote", "pre", "figcaption",
];

/// Renders `.html`/`.htm` uploads as the visible text of the document.
pub struct WebExtractor;

impl FormatExtractor for WebExtractor {
    fn format(&self) -> FormatTag {
        FormatTag::Web
    }

    fn extract(&self, input: &StagedInput) -> Result<RawText, ExtractorError> {
        let bytes = input.read()?;
        // Tag soup is fine: the parser recovers like a browser would,
        // so there is no malformed-HTML failure path here.
        let markup = String::from_utf8_lossy(&bytes);
        Ok(RawText::Text(html_to_text(&markup)))
    }
}

/// DOM walk that collects text nodes, skipping invisible subtrees and
/// inserting line breaks after block-level elements.
///
/// Shared with the email and ebook decoders for their HTML payloads.
pub fn html_to_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let mut raw = String::new();
    walk(document.root_element(), &mut raw);
    tidy(&raw)
}

/// Edge-driven walk over the subtree: markup nesting depth must never
/// become call depth, so arbitrarily deep input stays on the heap.
fn walk(root: ElementRef<'_>, out: &mut String) {
    let mut skip_until: Option<NodeId> = None;
    for edge in root.traverse() {
        match edge {
            Edge::Open(node) => {
                if skip_until.is_some() {
                    continue;
                }
                match node.value() {
                    Node::Text(text) => out.push_str(text),
                    Node::Element(element) if SKIPPED.contains(&element.name()) => {
                        skip_until = Some(node.id());
                    }
                    _ => {}
                }
            }
            Edge::Close(node) => {
                if let Some(skipped) = skip_until {
                    if node.id() == skipped {
                        skip_until = None;
                    }
                    continue;
                }
                if let Node::Element(element) = node.value() {
                    if BLOCK.contains(&element.name()) {
                        out.push('\n');
                    }
                }
            }
        }
    }
}

/// Collapses layout whitespace: lines are trimmed and blank lines drop
/// out, so the same markup renders the same text however the source was
/// indented.
fn tidy(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
