//! Citation Linker: wraps AI Act references in external EUR-Lex links.
//!
//! Recognized forms (whitespace, including newlines, may appear anywhere
//! inside a reference and before the trailing `AI Act` qualifier):
//!
//! - `Article 53 AI Act`, `Articles 53 and 55 AI Act`
//! - `Article 51(1) AI Act`, `Article 56(1)(3) AI Act`
//! - `Article 53(1), point (a) AI Act`
//! - `Articles 51(1), 52 and 53(4) AI Act`
//! - `Recital 116 AI Act`
//! - `Annex XI AI Act`, `Annex XI, Section 2 AI Act`,
//!   `Annex XI, Section 2, point 1 AI Act`
//!
//! References to other instruments (`Article 4(3) of Directive (EU)
//! 2019/790`) and bare references with no `AI Act` qualifier are left alone.
//! The matcher is a hand-rolled scanner over the text node; word boundaries
//! are explicit adjacent-character checks, not regex lookaround.

use html5ever::{LocalName, QualName, ns};

use crate::dom::{Attribute, Document, NodeId, html_name};
use crate::matcher::{fold_ascii, is_word_byte};
use crate::scanner::ExclusionPolicy;

const EUR_LEX_BASE: &str =
    "https://eur-lex.europa.eu/legal-content/EN/TXT/?uri=CELEX:32024R1689&qid=1740494199959#";

/// One recognized reference within a text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    /// Byte range of the linked text.
    pub start: usize,
    pub end: usize,
    /// URL fragment on EUR-Lex (`art_53`, `rct_116`, `anx_XI`).
    pub fragment: String,
}

impl Citation {
    /// Full EUR-Lex URL for this reference.
    pub fn href(&self) -> String {
        format!("{EUR_LEX_BASE}{}", self.fragment)
    }
}

/// Inserts EUR-Lex citation links into a document subtree.
pub struct CitationLinker<'a> {
    policy: &'a ExclusionPolicy,
    citation_class: &'a str,
}

impl<'a> CitationLinker<'a> {
    pub fn new(policy: &'a ExclusionPolicy, citation_class: &'a str) -> Self {
        Self {
            policy,
            citation_class,
        }
    }

    /// Scan the subtree rooted at `root` and link every recognized
    /// reference (citations have no first-per-block cap). Returns the
    /// number of links inserted.
    pub fn scan(&self, dom: &mut Document, root: NodeId) -> usize {
        let mut text_nodes = Vec::new();
        if dom.is_text(root) && !self.policy.is_excluded(dom, root) {
            text_nodes.push(root);
        }
        let descendants: Vec<_> = dom.descendants(root).collect();
        for id in descendants {
            if dom.is_text(id) {
                let parent = dom.get(id).map(|n| n.parent).unwrap_or(NodeId::NONE);
                if parent.is_some() && !self.policy.is_excluded(dom, parent) {
                    text_nodes.push(id);
                }
            }
        }

        let mut inserted = 0;
        for id in text_nodes {
            inserted += self.link_node(dom, id);
        }
        inserted
    }

    fn link_node(&self, dom: &mut Document, text_id: NodeId) -> usize {
        let Some(text) = dom.text_content(text_id).map(|t| t.to_string()) else {
            return 0;
        };
        if text.trim().is_empty() {
            return 0;
        }

        let citations = find_citations(&text);
        if citations.is_empty() {
            return 0;
        }

        // Split the text node around the references, inserting a link per
        // reference and plain text between them.
        dom.set_text(text_id, text[..citations[0].start].to_string());
        let mut anchor_after = text_id;
        let mut cursor = citations[0].start;

        for citation in &citations {
            if citation.start > cursor {
                let between = dom.create_text(text[cursor..citation.start].to_string());
                dom.insert_after(anchor_after, between);
                anchor_after = between;
            }

            let link = dom.create_element(
                html_name("a"),
                vec![
                    attr("href", &citation.href()),
                    attr("class", self.citation_class),
                    attr("target", "_blank"),
                    attr("rel", "noopener noreferrer"),
                ],
            );
            let label = dom.create_text(text[citation.start..citation.end].to_string());
            dom.append(link, label);
            dom.insert_after(anchor_after, link);
            anchor_after = link;
            cursor = citation.end;
        }

        if cursor < text.len() {
            let tail = dom.create_text(text[cursor..].to_string());
            dom.insert_after(anchor_after, tail);
        }

        citations.len()
    }
}

fn attr(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        value: value.to_string(),
    }
}

/// Find all AI Act references in a text run, left to right.
pub fn find_citations(text: &str) -> Vec<Citation> {
    let folded = fold_ascii(text);
    let bytes = folded.as_bytes();
    let mut citations = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if !is_word_start(bytes, pos) {
            pos += 1;
            continue;
        }

        let parsed = parse_article(&folded, pos)
            .or_else(|| parse_recital(&folded, pos))
            .or_else(|| parse_annex(&folded, pos));

        match parsed {
            Some((end, fragment)) if has_ai_act_qualifier(&folded, end) => {
                citations.push(Citation {
                    start: pos,
                    end,
                    fragment,
                });
                pos = end;
            }
            _ => pos += 1,
        }
    }

    citations
}

fn is_word_start(bytes: &[u8], pos: usize) -> bool {
    is_word_byte(bytes[pos]) && (pos == 0 || !is_word_byte(bytes[pos - 1]))
}

/// Scanner over the folded text of one node.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, pos: usize) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Consume whitespace, returning how many bytes were eaten.
    fn eat_ws(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn eat_byte(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume a literal (already-lowercase) string.
    fn eat_str(&mut self, s: &str) -> bool {
        if self.bytes[self.pos..].starts_with(s.as_bytes()) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Consume a keyword: the literal followed by a word boundary.
    fn eat_keyword(&mut self, word: &str) -> bool {
        let save = self.pos;
        if self.eat_str(word) && !self.peek().is_some_and(is_word_byte) {
            true
        } else {
            self.pos = save;
            false
        }
    }

    /// Consume a decimal number ending at a word boundary.
    fn eat_number(&mut self) -> Option<String> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start || self.peek().is_some_and(is_word_byte) {
            self.pos = start;
            return None;
        }
        Some(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
    }

    /// Consume a roman numeral ([ivx]+ in folded text) at a word boundary.
    fn eat_roman(&mut self) -> Option<String> {
        let start = self.pos;
        while self.peek().is_some_and(|b| matches!(b, b'i' | b'v' | b'x')) {
            self.pos += 1;
        }
        if self.pos == start || self.peek().is_some_and(is_word_byte) {
            self.pos = start;
            return None;
        }
        let roman = String::from_utf8_lossy(&self.bytes[start..self.pos]).to_uppercase();
        Some(roman)
    }

    /// Consume paragraph levels: `(1)`, `(1)(3)`, with arbitrary interior
    /// whitespace.
    fn eat_paren_levels(&mut self) {
        loop {
            let save = self.pos;
            self.eat_ws();
            if !self.eat_byte(b'(') {
                self.pos = save;
                return;
            }
            self.eat_ws();
            if self.eat_number().is_none() {
                self.pos = save;
                return;
            }
            self.eat_ws();
            if !self.eat_byte(b')') {
                self.pos = save;
                return;
            }
        }
    }

    /// Consume `point (a)` (letter point attached to an article item).
    fn eat_letter_point(&mut self) -> bool {
        let save = self.pos;
        if self.eat_keyword("point") {
            self.eat_ws();
            if self.eat_byte(b'(')
                && self.peek().is_some_and(|b| b.is_ascii_lowercase())
            {
                self.pos += 1;
                if self.eat_byte(b')') {
                    return true;
                }
            }
        }
        self.pos = save;
        false
    }
}

/// `Article 53(1), point (a) AI Act` and multi-article lists.
/// Returns (end of reference, fragment) on success.
fn parse_article(folded: &str, pos: usize) -> Option<(usize, String)> {
    let mut cur = Cursor::new(folded, pos);
    if !cur.eat_keyword("articles") && !cur.eat_keyword("article") {
        return None;
    }
    if cur.eat_ws() == 0 {
        return None;
    }

    let first_number = cur.eat_number()?;
    cur.eat_paren_levels();
    let mut end = cur.pos;

    // Continuations: `, 52`, `, point (a)`, ` and 53(4)`
    loop {
        let save = cur.pos;
        cur.eat_ws();
        if cur.eat_byte(b',') {
            cur.eat_ws();
            if cur.eat_letter_point() {
                end = cur.pos;
                continue;
            }
            if cur.eat_number().is_some() {
                cur.eat_paren_levels();
                end = cur.pos;
                continue;
            }
            cur.pos = save;
            break;
        }
        if cur.eat_keyword("and") {
            cur.eat_ws();
            if cur.eat_number().is_some() {
                cur.eat_paren_levels();
                end = cur.pos;
                continue;
            }
        }
        cur.pos = save;
        break;
    }

    Some((end, format!("art_{first_number}")))
}

/// `Recital 116 AI Act`.
fn parse_recital(folded: &str, pos: usize) -> Option<(usize, String)> {
    let mut cur = Cursor::new(folded, pos);
    if !cur.eat_keyword("recitals") && !cur.eat_keyword("recital") {
        return None;
    }
    if cur.eat_ws() == 0 {
        return None;
    }
    let number = cur.eat_number()?;
    Some((cur.pos, format!("rct_{number}")))
}

/// `Annex XI AI Act`, optionally with `, Section 2` and `, point 1`.
fn parse_annex(folded: &str, pos: usize) -> Option<(usize, String)> {
    let mut cur = Cursor::new(folded, pos);
    if !cur.eat_keyword("annex") {
        return None;
    }
    if cur.eat_ws() == 0 {
        return None;
    }
    let roman = cur.eat_roman()?;
    let mut end = cur.pos;

    let save = cur.pos;
    cur.eat_ws();
    if cur.eat_byte(b',') {
        cur.eat_ws();
        if cur.eat_keyword("section") && cur.eat_ws() > 0 && cur.eat_number().is_some() {
            end = cur.pos;
            let save_point = cur.pos;
            cur.eat_ws();
            if cur.eat_byte(b',') {
                cur.eat_ws();
                if cur.eat_keyword("point") && cur.eat_ws() > 0 && cur.eat_number().is_some() {
                    // a trailing period belongs to the point number ("point 1.")
                    cur.eat_byte(b'.');
                    end = cur.pos;
                } else {
                    cur.pos = save_point;
                }
            } else {
                cur.pos = save_point;
            }
        } else {
            cur.pos = save;
        }
    } else {
        cur.pos = save;
    }

    Some((end, format!("anx_{roman}")))
}

/// The reference counts only if an `AI Act` qualifier follows in the same
/// text run, with no intervening reference to another instrument
/// (`Directive (EU) ...`).
fn has_ai_act_qualifier(folded: &str, from: usize) -> bool {
    let Some(ai_act) = find_ai_act(folded, from) else {
        return false;
    };
    match find_directive(folded, from) {
        Some(directive) => directive > ai_act,
        None => true,
    }
}

fn find_ai_act(folded: &str, from: usize) -> Option<usize> {
    let bytes = folded.as_bytes();
    let mut pos = from;
    while pos < bytes.len() {
        if is_word_start(bytes, pos) {
            let mut cur = Cursor::new(folded, pos);
            if cur.eat_keyword("ai") && cur.eat_ws() > 0 && cur.eat_keyword("act") {
                return Some(pos);
            }
        }
        pos += 1;
    }
    None
}

fn find_directive(folded: &str, from: usize) -> Option<usize> {
    let bytes = folded.as_bytes();
    let mut pos = from;
    while pos < bytes.len() {
        if is_word_start(bytes, pos) {
            let mut cur = Cursor::new(folded, pos);
            if cur.eat_keyword("directive") {
                cur.eat_ws();
                if cur.eat_str("(eu)") {
                    return Some(pos);
                }
            }
        }
        pos += 1;
    }
    None
}
