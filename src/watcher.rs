//! Mutation Watcher: re-annotates content added after the initial pass.
//!
//! The host observes its content root for added subtrees (childList,
//! subtree-wide) and hands each batch over; the same scanners run on the
//! added nodes. Already-annotated content is skipped by the shared
//! [`ExclusionPolicy`], so re-entry is idempotent. Removed nodes need no
//! handling; markers have no teardown obligations.

use crate::citations::CitationLinker;
use crate::dom::{Document, NodeId, parse_fragment, serialize_children};
use crate::error::Result;
use crate::index::TermIndex;
use crate::options::AnnotateOptions;
use crate::scanner::{ExclusionPolicy, TermScanner};

/// One batch of nodes added to the content region.
///
/// Only element nodes are rescanned; text and comment nodes added directly
/// are filtered out here, matching the observer glue this replaces.
#[derive(Debug, Default, Clone)]
pub struct MutationBatch {
    added: Vec<NodeId>,
}

impl MutationBatch {
    /// Build a batch from raw added nodes, keeping only elements.
    pub fn from_added(dom: &Document, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            added: nodes
                .into_iter()
                .filter(|&id| dom.is_element(id))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.added
    }
}

/// Annotations inserted by a rescan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RescanReport {
    pub markers_inserted: usize,
    pub citations_linked: usize,
}

/// Re-runs the annotation scanners over added content, carrying the marker
/// id counter so `data-ref` values stay unique across rescans.
pub struct Rescanner {
    index: TermIndex,
    policy: ExclusionPolicy,
    marker_class: String,
    badge_class: String,
    citation_class: String,
    link_citations: bool,
    next_ref: u32,
}

impl Rescanner {
    /// Build a rescanner around an already-built index.
    ///
    /// `next_ref` continues past the highest marker id already in the
    /// document so ids never collide with existing markers.
    pub fn new(index: TermIndex, options: &AnnotateOptions, next_ref: u32) -> Result<Self> {
        Ok(Self {
            policy: ExclusionPolicy::from_options(options)?,
            marker_class: options.marker_class.clone(),
            badge_class: options.badge_class.clone(),
            citation_class: options.citation_class.clone(),
            link_citations: options.link_citations,
            index,
            next_ref,
        })
    }

    /// The index this rescanner resolves terms against.
    pub fn index(&self) -> &TermIndex {
        &self.index
    }

    /// Rescan every element in a mutation batch.
    pub fn rescan(&mut self, dom: &mut Document, batch: &MutationBatch) -> RescanReport {
        let mut report = RescanReport::default();
        for &id in batch.nodes() {
            let node_report = self.rescan_node(dom, id);
            report.markers_inserted += node_report.markers_inserted;
            report.citations_linked += node_report.citations_linked;
        }
        report
    }

    /// Rescan a single added subtree.
    pub fn rescan_node(&mut self, dom: &mut Document, root: NodeId) -> RescanReport {
        let mut report = RescanReport::default();

        if self.link_citations {
            let linker = CitationLinker::new(&self.policy, &self.citation_class);
            report.citations_linked = linker.scan(dom, root);
        }

        let scanner = TermScanner::new(
            &self.index,
            &self.policy,
            &self.marker_class,
            &self.badge_class,
        );
        report.markers_inserted = scanner.scan(dom, root, &mut self.next_ref);

        report
    }

    /// Annotate an HTML fragment string (the `outerHTML` of an added
    /// subtree) and return the annotated fragment.
    pub fn annotate_fragment(&mut self, html: &str) -> (String, RescanReport) {
        let (mut dom, body) = parse_fragment(html);
        let children: Vec<_> = dom.children(body).collect();
        let batch = MutationBatch::from_added(&dom, children);

        let report = self.rescan(&mut dom, &batch);
        (serialize_children(&dom, body), report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rescanner_with(glossary: &str) -> Rescanner {
        let (dom, _) = parse_fragment(&format!("<dl class=\"glossary-list\">{glossary}</dl>"));
        let dl = dom.find_by_class("glossary-list").unwrap();
        let index = TermIndex::build(&dom, dl);
        Rescanner::new(index, &AnnotateOptions::default(), 1).unwrap()
    }

    #[test]
    fn test_fragment_rescan_marks_terms() {
        let mut rescanner = rescanner_with("<dt>Provider</dt><dd>def</dd>");
        let (html, report) = rescanner.annotate_fragment("<p>the provider acts</p>");
        assert_eq!(report.markers_inserted, 1);
        assert!(html.contains("#term-provider"));
    }

    #[test]
    fn test_fragment_rescan_is_idempotent() {
        let mut rescanner = rescanner_with("<dt>Provider</dt><dd>def</dd>");
        let (first, report) = rescanner.annotate_fragment("<p>the provider acts</p>");
        assert_eq!(report.markers_inserted, 1);

        let (second, report) = rescanner.annotate_fragment(&first);
        assert_eq!(report.markers_inserted, 0);
        assert_eq!(second, first);
    }

    #[test]
    fn test_ref_ids_continue_across_rescans() {
        let mut rescanner = rescanner_with("<dt>Provider</dt><dd>def</dd><dt>Deployer</dt><dd>def</dd>");
        let (first, _) = rescanner.annotate_fragment("<p>the provider</p>");
        let (second, _) = rescanner.annotate_fragment("<p>the deployer</p>");
        assert!(first.contains("data-ref=\"g1\""));
        assert!(second.contains("data-ref=\"g2\""));
    }

    #[test]
    fn test_non_element_nodes_filtered() {
        let (dom, body) = parse_fragment("plain text<p>block</p>");
        let children: Vec<_> = dom.children(body).collect();
        let batch = MutationBatch::from_added(&dom, children);
        assert_eq!(batch.nodes().len(), 1);
    }

    #[test]
    fn test_citations_in_fragment() {
        let mut rescanner = rescanner_with("<dt>Provider</dt><dd>def</dd>");
        let (html, report) = rescanner.annotate_fragment("<p>see Article 53 AI Act</p>");
        assert_eq!(report.citations_linked, 1);
        assert!(html.contains("ai-act-link"));
    }
}
