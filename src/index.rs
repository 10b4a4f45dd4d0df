//! Term Index: the glossary's terms, ordinals, and definitions.
//!
//! Built once per document from the glossary region's `dt`/`dd` pairs and
//! read-only afterwards. Ordinals follow definition order (first defined
//! term is 1), not order of use in body text.

use std::collections::HashMap;

use crate::dom::{Document, NodeId};
use crate::slug::slugify;

/// One glossary term with its display metadata and definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(any(feature = "cli", feature = "wasm"), derive(serde::Serialize))]
pub struct TermEntry {
    /// Original-case term text as written in the glossary.
    pub display: String,
    /// 1-based position in the definitions list.
    pub ordinal: u32,
    /// Flattened, whitespace-normalized definition text.
    pub definition: String,
    /// Anchor slug; markers link to `#term-<slug>`.
    pub slug: String,
}

/// Mapping from normalized term text to term entries.
///
/// Normalized keys are trimmed and ASCII-lowercased. Besides the exact keys,
/// the map holds regular plural/singular surface variations of each term
/// (`policy` ↔ `policies`, `provider` ↔ `providers`) pointing at the
/// canonical entry. Exact keys are inserted first with first-definition-wins;
/// variants are added afterwards and never displace an exact key.
#[derive(Debug, Clone, Default)]
pub struct TermIndex {
    entries: Vec<TermEntry>,
    by_key: HashMap<String, usize>,
    by_slug: HashMap<String, usize>,
    /// All match keys, sorted by surface length descending so multi-word
    /// terms take priority over single-word substrings they contain.
    match_keys: Vec<String>,
}

impl TermIndex {
    /// An index with no terms. Scanning with it inserts nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the index from the glossary region of a document.
    ///
    /// Walks `dt` elements in document order; each `dt` must be followed by
    /// a `dd` sibling to produce an entry. A `dt` with no definition body is
    /// skipped, as is a duplicate of an already-indexed term.
    pub fn build(dom: &Document, glossary: NodeId) -> Self {
        let mut index = Self::default();

        for id in dom.descendants(glossary) {
            if dom.element_name(id).is_none_or(|n| n.as_ref() != "dt") {
                continue;
            }

            let display = dom.collect_text(id);
            if display.is_empty() {
                log::debug!("skipping glossary entry with empty term text");
                continue;
            }

            let Some(dd) = next_element_sibling(dom, id, "dd") else {
                log::debug!("skipping glossary term without definition: {display}");
                continue;
            };

            let key = normalize_key(&display);
            if index.by_key.contains_key(&key) {
                log::debug!("skipping duplicate glossary term: {display}");
                continue;
            }

            let entry = TermEntry {
                ordinal: index.entries.len() as u32 + 1,
                definition: dom.collect_text(dd),
                slug: slugify(&display),
                display,
            };

            let idx = index.entries.len();
            index.by_key.insert(key, idx);
            index.by_slug.insert(entry.slug.clone(), idx);
            index.entries.push(entry);
        }

        // Variant keys are registered after all exact keys so a term's
        // plural never shadows another term's exact spelling.
        for idx in 0..index.entries.len() {
            let key = normalize_key(&index.entries[idx].display);
            for variant in term_variations(&key) {
                index.by_key.entry(variant).or_insert(idx);
            }
        }

        index.match_keys = index.by_key.keys().cloned().collect();
        index
            .match_keys
            .sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        index
    }

    /// Look up an entry by surface text (any case, exact or plural variant).
    pub fn get(&self, text: &str) -> Option<&TermEntry> {
        self.entry_index(text).map(|idx| &self.entries[idx])
    }

    /// Canonical entry position for a surface form, shared by all of the
    /// term's variant keys (used for first-match-per-block dedup).
    pub fn entry_index(&self, text: &str) -> Option<usize> {
        self.by_key.get(&normalize_key(text)).copied()
    }

    /// Look up an entry by its anchor slug.
    pub fn by_slug(&self, slug: &str) -> Option<&TermEntry> {
        self.by_slug.get(slug).map(|&idx| &self.entries[idx])
    }

    /// Canonical entry position for an anchor slug.
    pub fn slug_entry_index(&self, slug: &str) -> Option<usize> {
        self.by_slug.get(slug).copied()
    }

    /// All indexed entries in ordinal order.
    pub fn entries(&self) -> &[TermEntry] {
        &self.entries
    }

    /// All match keys (exact and variant), longest surface form first.
    pub fn match_keys(&self) -> &[String] {
        &self.match_keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalize term text for key lookup: trim and ASCII-lowercase.
pub fn normalize_key(text: &str) -> String {
    text.trim().to_ascii_lowercase()
}

/// Regular plural/singular surface variations of a term.
///
/// `-y` becomes `-ies`, a trailing `-s` gains `-es`, anything else gains
/// `-s`. Deliberately simple; irregular plurals are not attempted.
fn term_variations(term: &str) -> Vec<String> {
    let mut variations = Vec::with_capacity(1);
    if let Some(stem) = term.strip_suffix('y') {
        variations.push(format!("{stem}ies"));
    } else if term.ends_with('s') {
        variations.push(format!("{term}es"));
    } else {
        variations.push(format!("{term}s"));
    }
    variations
}

/// Find the next element sibling with the given tag, skipping text and
/// comment nodes.
fn next_element_sibling(dom: &Document, id: NodeId, tag: &str) -> Option<NodeId> {
    let mut current = dom.get(id)?.next_sibling;
    while current.is_some() {
        if dom.is_element(current) {
            return dom
                .element_name(current)
                .filter(|n| n.as_ref() == tag)
                .map(|_| current);
        }
        current = dom.get(current)?.next_sibling;
    }
    None
}
