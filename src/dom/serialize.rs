//! Serializing the arena DOM back to HTML text.
//!
//! A manual tree walk rather than html5ever's serializer: the output must
//! preserve attribute order (markers are written with a fixed attribute
//! layout) and must not re-escape text the parser already unescaped beyond
//! the minimal set below.

use std::fmt::Write;

use super::arena::{Document, NodeData, NodeId};

/// Elements with no closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose raw text is emitted unescaped.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Escape text content for HTML output.
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape an attribute value for double-quoted HTML output.
pub fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Serialize a whole document, including any doctype.
pub fn serialize_document(dom: &Document) -> String {
    let mut out = String::new();
    for child in dom.children(dom.document()) {
        serialize_into(dom, child, &mut out);
    }
    out
}

/// Serialize a node and its subtree.
pub fn serialize_node(dom: &Document, id: NodeId) -> String {
    let mut out = String::new();
    serialize_into(dom, id, &mut out);
    out
}

/// Serialize only the children of a node (inner HTML).
pub fn serialize_children(dom: &Document, id: NodeId) -> String {
    let mut out = String::new();
    for child in dom.children(id) {
        serialize_into(dom, child, &mut out);
    }
    out
}

fn serialize_into(dom: &Document, id: NodeId, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        NodeData::Document => {
            for child in dom.children(id) {
                serialize_into(dom, child, out);
            }
        }
        NodeData::Doctype { name, .. } => {
            let _ = write!(out, "<!DOCTYPE {}>", name);
        }
        NodeData::Comment(text) => {
            let _ = write!(out, "<!--{}-->", text);
        }
        NodeData::Text(text) => {
            let raw = dom
                .ancestors(id)
                .next()
                .and_then(|p| dom.element_name(p))
                .is_some_and(|n| RAW_TEXT_ELEMENTS.contains(&n.as_ref()));
            if raw {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        NodeData::Element { name, attrs, .. } => {
            let tag = name.local.as_ref();
            out.push('<');
            out.push_str(tag);
            for attr in attrs {
                let _ = write!(
                    out,
                    " {}=\"{}\"",
                    attr.name.local.as_ref(),
                    escape_attr(&attr.value)
                );
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&tag) {
                return;
            }

            for child in dom.children(id) {
                serialize_into(dom, child, out);
            }

            let _ = write!(out, "</{}>", tag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse::parse_fragment;

    #[test]
    fn test_round_trip_simple() {
        let (dom, body) = parse_fragment("<p class=\"intro\">Hello &amp; goodbye</p>");
        let html = serialize_children(&dom, body);
        assert_eq!(html, "<p class=\"intro\">Hello &amp; goodbye</p>");
    }

    #[test]
    fn test_void_elements() {
        let (dom, body) = parse_fragment("<p>a<br>b</p>");
        let html = serialize_children(&dom, body);
        assert_eq!(html, "<p>a<br>b</p>");
    }

    #[test]
    fn test_attr_escaping() {
        let (dom, body) = parse_fragment("<a href=\"?a=1&amp;b=2\">x</a>");
        let html = serialize_children(&dom, body);
        assert_eq!(html, "<a href=\"?a=1&amp;b=2\">x</a>");
    }

    #[test]
    fn test_text_escaping() {
        let (dom, body) = parse_fragment("<p>1 &lt; 2</p>");
        let html = serialize_children(&dom, body);
        assert_eq!(html, "<p>1 &lt; 2</p>");
    }
}
