//! Anchor Pass: stamps `term-<slug>` ids on definition terms and unique
//! slug ids on headings, so reference markers and navigation links have
//! stable targets. Runs before the scanners.

use std::collections::HashSet;

use crate::dom::{Document, NodeId};
use crate::scanner::ExclusionPolicy;
use crate::slug::{SlugAllocator, slugify};

const HEADING_TAGS: &[&str] = &["h2", "h3", "h4", "h5"];

/// Ids assigned by one run of the pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnchorReport {
    /// `term-<slug>` ids stamped on glossary `dt` elements.
    pub term_anchors: usize,
    /// Slug ids stamped on headings.
    pub heading_ids: usize,
}

/// Assign anchor ids to glossary terms and headings.
///
/// Existing ids are left untouched (they still reserve their slug). Heading
/// slug collisions append `-2`, `-3`, ... in document order.
pub fn assign_anchors(
    dom: &mut Document,
    policy: &ExclusionPolicy,
    content: NodeId,
    glossary: Option<NodeId>,
) -> AnchorReport {
    let mut report = AnchorReport::default();

    if let Some(glossary) = glossary {
        report.term_anchors = assign_term_anchors(dom, glossary);
    }
    report.heading_ids = assign_heading_ids(dom, policy, content);
    report
}

fn assign_term_anchors(dom: &mut Document, glossary: NodeId) -> usize {
    let terms: Vec<_> = dom
        .descendants(glossary)
        .filter(|&id| dom.element_name(id).is_some_and(|n| n.as_ref() == "dt"))
        .collect();

    let mut used: HashSet<String> = HashSet::new();
    let mut assigned = 0;

    for dt in terms {
        if let Some(existing) = dom.element_id(dt) {
            used.insert(existing.to_string());
            continue;
        }
        let slug = slugify(&dom.collect_text(dt));
        if slug.is_empty() {
            continue;
        }
        let anchor = format!("term-{slug}");
        // A duplicate term keeps only the first dt's anchor; markers all
        // resolve to the canonical (first) definition anyway.
        if !used.insert(anchor.clone()) {
            log::debug!("skipping duplicate term anchor: {anchor}");
            continue;
        }
        dom.set_attr(dt, "id", &anchor);
        assigned += 1;
    }

    assigned
}

fn assign_heading_ids(dom: &mut Document, policy: &ExclusionPolicy, content: NodeId) -> usize {
    let subtree: Vec<_> = dom.descendants(content).collect();

    let mut allocator = SlugAllocator::new();
    for &id in &subtree {
        if let Some(existing) = dom.element_id(id) {
            allocator.reserve(existing);
        }
    }

    let mut assigned = 0;
    for id in subtree {
        let is_heading = dom
            .element_name(id)
            .is_some_and(|n| HEADING_TAGS.contains(&n.as_ref()));
        if !is_heading || dom.element_id(id).is_some() || policy.is_inside_excluded(dom, id) {
            continue;
        }

        let text = dom.collect_text(id);
        if text.is_empty() {
            continue;
        }
        let unique = allocator.allocate(&text);
        dom.set_attr(id, "id", &unique);
        assigned += 1;
    }

    assigned
}
