//! Text Scanner: wraps the first in-block occurrence of each glossary term
//! in a reference marker.
//!
//! The scanner walks candidate block elements, tries terms longest surface
//! form first, and inserts at most one marker per term per block. Matching
//! happens within a single text node; a term whose surface form spans inline
//! element boundaries is not matched.

use std::collections::{HashSet, VecDeque};

use html5ever::{LocalName, QualName, ns};

use crate::dom::{Attribute, Document, NodeId, html_name};
use crate::error::Result;
use crate::index::TermIndex;
use crate::matcher::{find_whole_word, fold_ascii};
use crate::options::{AnnotateOptions, ExcludeRule};

/// Block-level containers scoping the at-most-one-match-per-term invariant.
const BLOCK_TAGS: &[&str] = &[
    "p",
    "li",
    "dd",
    "dt",
    "blockquote",
    "td",
    "th",
    "figcaption",
    "caption",
];

/// Elements whose subtrees are never annotated, regardless of options.
/// Ordinal badges are `sup` elements but are protected by their class, not
/// the tag, so ordinary superscript text stays annotatable.
const STRUCTURAL_EXCLUDED_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "nav", "a", "code", "pre", "script", "style", "template",
    "textarea",
];

/// The single exclusion predicate shared by block candidacy, in-block text
/// selection, and mutation-triggered rescans.
#[derive(Debug, Clone)]
pub struct ExclusionPolicy {
    excluded_tags: HashSet<String>,
    excluded_classes: HashSet<String>,
    excluded_ids: HashSet<String>,
}

impl ExclusionPolicy {
    /// Build the policy from options: structural exclusions plus the
    /// configured rules, the glossary region, and the annotation classes
    /// themselves (so re-scanning annotated content is a no-op).
    pub fn from_options(options: &AnnotateOptions) -> Result<Self> {
        let mut excluded_tags: HashSet<String> = STRUCTURAL_EXCLUDED_TAGS
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut excluded_classes: HashSet<String> = HashSet::new();
        let mut excluded_ids: HashSet<String> = HashSet::new();

        excluded_classes.insert(options.glossary_class.clone());
        excluded_classes.insert(options.marker_class.clone());
        excluded_classes.insert(options.badge_class.clone());
        excluded_classes.insert(options.citation_class.clone());

        for rule in ExcludeRule::parse_all(&options.exclude)? {
            match rule {
                ExcludeRule::Tag(tag) => {
                    excluded_tags.insert(tag);
                }
                ExcludeRule::Class(class) => {
                    excluded_classes.insert(class);
                }
                ExcludeRule::Id(id) => {
                    excluded_ids.insert(id);
                }
            }
        }

        Ok(Self {
            excluded_tags,
            excluded_classes,
            excluded_ids,
        })
    }

    /// Does this element itself match an exclusion rule?
    pub fn excludes_element(&self, dom: &Document, id: NodeId) -> bool {
        let Some(name) = dom.element_name(id) else {
            return false;
        };
        self.excluded_tags.contains(name.as_ref()) || self.excludes_attrs(dom, id)
    }

    /// Class/id rules only, ignoring the tag (used for elements that are
    /// themselves structurally excluded, like headings in the anchor pass).
    fn excludes_attrs(&self, dom: &Document, id: NodeId) -> bool {
        if dom
            .element_classes(id)
            .iter()
            .any(|c| self.excluded_classes.contains(c))
        {
            return true;
        }
        dom.element_id(id)
            .is_some_and(|i| self.excluded_ids.contains(i))
    }

    /// Is this element inside (or itself carrying) an excluded container
    /// class/id? Unlike [`is_excluded`], the element's own tag does not
    /// count, so heading elements can ask about their surroundings.
    pub fn is_inside_excluded(&self, dom: &Document, id: NodeId) -> bool {
        self.excludes_attrs(dom, id) || dom.ancestors(id).any(|a| self.excludes_element(dom, a))
    }

    /// Is this node, or any of its ancestors, excluded?
    pub fn is_excluded(&self, dom: &Document, id: NodeId) -> bool {
        if self.excludes_element(dom, id) {
            return true;
        }
        dom.ancestors(id).any(|a| self.excludes_element(dom, a))
    }

    /// Is this element a candidate block for term marking?
    pub fn is_block_candidate(&self, dom: &Document, id: NodeId) -> bool {
        is_block_tag(dom, id) && !self.is_excluded(dom, id)
    }
}

fn is_block_tag(dom: &Document, id: NodeId) -> bool {
    dom.element_name(id)
        .is_some_and(|n| BLOCK_TAGS.contains(&n.as_ref()))
}

/// The next free sequential marker id in a document.
///
/// A document being annotated may already carry markers from an earlier
/// pass (re-annotation is a no-op for them); new markers must continue the
/// `g<n>` sequence past the highest one present, never reuse it.
pub fn next_marker_ref(dom: &Document, root: NodeId, marker_class: &str) -> u32 {
    let mut highest = 0;
    for id in dom.descendants(root) {
        if dom.has_class(id, marker_class)
            && let Some(ref_id) = dom.get_attr(id, "data-ref")
            && let Some(n) = ref_id.strip_prefix('g').and_then(|s| s.parse::<u32>().ok())
        {
            highest = highest.max(n);
        }
    }
    highest + 1
}

/// Inserts glossary term markers into a document subtree.
pub struct TermScanner<'a> {
    index: &'a TermIndex,
    policy: &'a ExclusionPolicy,
    marker_class: &'a str,
    badge_class: &'a str,
}

impl<'a> TermScanner<'a> {
    pub fn new(
        index: &'a TermIndex,
        policy: &'a ExclusionPolicy,
        marker_class: &'a str,
        badge_class: &'a str,
    ) -> Self {
        Self {
            index,
            policy,
            marker_class,
            badge_class,
        }
    }

    /// Scan the subtree rooted at `root` and insert reference markers.
    ///
    /// `next_ref` carries the sequential marker id counter across calls so
    /// mutation rescans keep `data-ref` values unique. Returns the number
    /// of markers inserted.
    pub fn scan(&self, dom: &mut Document, root: NodeId, next_ref: &mut u32) -> usize {
        if self.index.is_empty() {
            return 0;
        }

        let mut blocks = Vec::new();
        if dom.is_element(root) && self.policy.is_block_candidate(dom, root) {
            blocks.push(root);
        }
        let descendants: Vec<_> = dom.descendants(root).collect();
        for id in descendants {
            if dom.is_element(id) && self.policy.is_block_candidate(dom, id) {
                blocks.push(id);
            }
        }

        let mut inserted = 0;
        for block in blocks {
            inserted += self.scan_block(dom, block, next_ref);
        }
        inserted
    }

    fn scan_block(&self, dom: &mut Document, block: NodeId, next_ref: &mut u32) -> usize {
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        collect_text_nodes(dom, self.policy, block, &mut queue);

        // Canonical entry positions already marked in this block: each term
        // (including its plural variants) is marked at most once per block.
        // Markers from an earlier pass count, so re-annotating a document
        // never marks a second occurrence.
        let mut marked: HashSet<usize> = HashSet::new();
        let existing: Vec<_> = dom.descendants(block).collect();
        for id in existing {
            if dom.has_class(id, self.marker_class)
                && let Some(slug) = dom.get_attr(id, "data-term")
                && let Some(entry_idx) = self.index.slug_entry_index(slug)
            {
                marked.insert(entry_idx);
            }
        }
        let mut inserted = 0;

        while let Some(text_id) = queue.pop_front() {
            let Some(text) = dom.text_content(text_id).map(|t| t.to_string()) else {
                continue;
            };
            if text.trim().is_empty() {
                continue;
            }

            let folded = fold_ascii(&text);
            let mut split = None;

            for key in self.index.match_keys() {
                let Some(entry_idx) = self.index.entry_index(key) else {
                    continue;
                };
                if marked.contains(&entry_idx) {
                    continue;
                }
                if let Some((start, end)) = find_whole_word(&folded, key) {
                    marked.insert(entry_idx);
                    split = Some((start, end, entry_idx));
                    break;
                }
            }

            let Some((start, end, entry_idx)) = split else {
                continue;
            };

            let entry = &self.index.entries()[entry_idx];
            let matched = text[start..end].to_string();
            let ref_id = format!("g{}", *next_ref);
            *next_ref += 1;

            let marker = build_marker(
                dom,
                &matched,
                &entry.slug,
                entry.ordinal,
                &ref_id,
                self.marker_class,
                self.badge_class,
            );

            // Split the text node around the match; head and tail stay
            // eligible for the remaining terms.
            dom.set_text(text_id, text[..start].to_string());
            dom.insert_after(text_id, marker);
            inserted += 1;

            if end < text.len() {
                let tail = dom.create_text(text[end..].to_string());
                dom.insert_after(marker, tail);
                queue.push_front(tail);
            }
            if start > 0 {
                queue.push_front(text_id);
            }
        }

        inserted
    }
}

/// Collect the text nodes of a block in document order, skipping excluded
/// inline content and nested candidate blocks (those are scanned on their
/// own, keeping the per-block invariant at the innermost block).
fn collect_text_nodes(
    dom: &Document,
    policy: &ExclusionPolicy,
    block: NodeId,
    out: &mut VecDeque<NodeId>,
) {
    for child in dom.children(block) {
        if dom.is_text(child) {
            out.push_back(child);
        } else if dom.is_element(child)
            && !policy.excludes_element(dom, child)
            && !is_block_tag(dom, child)
        {
            collect_text_nodes(dom, policy, child, out);
        }
    }
}

fn attr(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        value: value.to_string(),
    }
}

/// Build a reference marker: an anchor with the matched original-case text
/// and a trailing ordinal badge.
fn build_marker(
    dom: &mut Document,
    matched: &str,
    slug: &str,
    ordinal: u32,
    ref_id: &str,
    marker_class: &str,
    badge_class: &str,
) -> NodeId {
    let anchor = dom.create_element(
        html_name("a"),
        vec![
            attr("href", &format!("#term-{slug}")),
            attr("class", marker_class),
            attr("data-term", slug),
            attr("data-ref", ref_id),
        ],
    );

    let text = dom.create_text(matched.to_string());
    dom.append(anchor, text);

    let badge = dom.create_element(html_name("sup"), vec![attr("class", badge_class)]);
    let badge_text = dom.create_text(ordinal.to_string());
    dom.append(badge, badge_text);
    dom.append(anchor, badge);

    anchor
}
