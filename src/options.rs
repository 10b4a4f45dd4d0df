//! Annotation options and exclusion rule parsing.

use crate::error::{Error, Result};

/// A parsed exclusion rule: a tag name, a `.class`, or an `#id`.
///
/// Rules are deliberately simple selectors; anything with combinators,
/// whitespace, or attribute syntax is rejected at parse time so a typo
/// never silently excludes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExcludeRule {
    Tag(String),
    Class(String),
    Id(String),
}

impl ExcludeRule {
    /// Parse a single rule string (`"nav"`, `".recital-box"`, `"#appendix"`).
    pub fn parse(rule: &str) -> Result<Self> {
        let rule = rule.trim();
        let (kind, name): (fn(String) -> Self, &str) = match rule.as_bytes().first() {
            Some(b'.') => (Self::Class, &rule[1..]),
            Some(b'#') => (Self::Id, &rule[1..]),
            Some(_) => (Self::Tag, rule),
            None => return Err(Error::InvalidRule("empty rule".to_string())),
        };

        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::InvalidRule(rule.to_string()));
        }

        Ok(kind(name.to_ascii_lowercase()))
    }

    /// Parse a list of rule strings.
    pub fn parse_all(rules: &[String]) -> Result<Vec<Self>> {
        rules.iter().map(|r| Self::parse(r)).collect()
    }
}

/// Options controlling the annotation passes.
///
/// The defaults match the document layout this engine was built for: a
/// `main-content` region with a `glossary-list` definition list, and a set
/// of collapsible "box" containers that must never be annotated.
#[derive(Debug, Clone)]
#[cfg_attr(
    any(feature = "cli", feature = "wasm"),
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AnnotateOptions {
    /// Class of the content region to annotate.
    pub content_class: String,
    /// Class of the glossary definition list (`dt`/`dd` pairs).
    pub glossary_class: String,
    /// Class placed on inserted term markers.
    pub marker_class: String,
    /// Class placed on the ordinal badge inside a marker.
    pub badge_class: String,
    /// Class placed on inserted citation links.
    pub citation_class: String,
    /// Element id of the shared tooltip panel (ARIA describedby target).
    pub panel_id: String,
    /// Extra exclusion rules (`tag`, `.class`, `#id`) applied on top of the
    /// structural exclusions (headings, links, code, nav, the glossary).
    pub exclude: Vec<String>,
    /// Link AI Act citations to EUR-Lex.
    pub link_citations: bool,
    /// Stamp slug ids on headings and `term-<slug>` ids on definition terms.
    pub anchor_headings: bool,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            content_class: "main-content".to_string(),
            glossary_class: "glossary-list".to_string(),
            marker_class: "glossary-marked".to_string(),
            badge_class: "glossary-ordinal".to_string(),
            citation_class: "ai-act-link".to_string(),
            panel_id: "glossary-popup".to_string(),
            exclude: [
                ".kpi-box",
                ".explanatory-box",
                ".legal-box",
                ".disclaimer-box",
                ".recital-box",
                ".faq-box",
                ".glossary",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            link_citations: true,
            anchor_headings: true,
        }
    }
}
