//! Parsing HTML documents and fragments into the arena DOM.

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use super::arena::{Document, NodeId};
use super::sink::DocumentSink;
use crate::util::decode_text;

/// Parse a full HTML document.
pub fn parse_html(html: &str) -> Document {
    let sink = DocumentSink::new();
    let result = parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes());
    result.into_dom()
}

/// Parse raw bytes, decoding through UTF-8 with a Windows-1252 fallback
/// (old documents on the web are rarely labelled correctly).
pub fn parse_bytes(bytes: &[u8]) -> Document {
    let text = decode_text(bytes, None);
    parse_html(&text)
}

/// Parse a fragment of HTML (not a full document).
///
/// The fragment is wrapped in a minimal document shell so html5ever's tree
/// builder runs in a body context; the returned node is the synthetic body,
/// whose children are the fragment's top-level nodes.
pub fn parse_fragment(html: &str) -> (Document, NodeId) {
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{}</body></html>", html);
    let dom = parse_html(&wrapped);
    let body = dom.find_by_tag("body").unwrap_or(dom.document());
    (dom, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment_extracts_body() {
        let (dom, body) = parse_fragment("<p>one</p><p>two</p>");
        let paragraphs: Vec<_> = dom
            .children(body)
            .filter(|&c| dom.element_name(c).is_some_and(|n| n.as_ref() == "p"))
            .collect();
        assert_eq!(paragraphs.len(), 2);
    }

    #[test]
    fn test_parse_bytes_windows_1252_fallback() {
        // 0x92 is a curly apostrophe in CP1252 and malformed UTF-8
        let bytes = b"<p>the provider\x92s duty</p>".to_vec();
        let dom = parse_bytes(&bytes);
        let p = dom.find_by_tag("p").expect("should find p");
        let text = dom.collect_text(p);
        assert!(text.contains('\u{2019}'), "got: {text}");
    }

    #[test]
    fn test_parse_malformed_html_is_lenient() {
        let dom = parse_html("<p>unclosed <b>bold");
        assert!(dom.find_by_tag("b").is_some());
    }
}
