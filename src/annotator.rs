//! The full annotation pipeline: index the glossary, stamp anchors, link
//! citations, and mark terms, in that order.

use crate::citations::CitationLinker;
use crate::dom::{Document, NodeId, parse_bytes, parse_html, serialize_document};
use crate::error::Result;
use crate::headings::assign_anchors;
use crate::index::TermIndex;
use crate::options::AnnotateOptions;
use crate::scanner::{ExclusionPolicy, TermScanner, next_marker_ref};
use crate::tooltip::{DeviceMode, TooltipController};
use crate::watcher::Rescanner;

/// Counts from one annotation run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(feature = "cli", feature = "wasm"), derive(serde::Serialize))]
pub struct AnnotationReport {
    pub terms_indexed: usize,
    pub markers_inserted: usize,
    pub citations_linked: usize,
    pub term_anchors: usize,
    pub heading_ids: usize,
}

/// The result of annotating a document.
#[derive(Debug, Clone)]
pub struct Annotated {
    /// The serialized annotated document.
    pub html: String,
    pub report: AnnotationReport,
    /// The glossary index built from the document, for driving tooltips
    /// or mutation rescans.
    pub index: TermIndex,
    /// The next free sequential marker id, past every `data-ref` in the
    /// document (including markers that predate this run).
    pub next_ref: u32,
}

/// Annotates documents according to a fixed set of options.
///
/// The annotator itself is stateless across documents; each [`annotate`]
/// call builds a fresh term index from that document's glossary.
///
/// [`annotate`]: Annotator::annotate
pub struct Annotator {
    options: AnnotateOptions,
    policy: ExclusionPolicy,
}

impl Annotator {
    /// Build an annotator, validating the configured exclusion rules.
    pub fn new(options: AnnotateOptions) -> Result<Self> {
        let policy = ExclusionPolicy::from_options(&options)?;
        Ok(Self { options, policy })
    }

    pub fn options(&self) -> &AnnotateOptions {
        &self.options
    }

    /// Annotate a full HTML document.
    pub fn annotate(&self, html: &str) -> Annotated {
        let mut dom = parse_html(html);
        self.run(&mut dom)
    }

    /// Annotate raw document bytes, sniffing the encoding.
    pub fn annotate_bytes(&self, bytes: &[u8]) -> Annotated {
        let mut dom = parse_bytes(bytes);
        self.run(&mut dom)
    }

    /// Extract the glossary index from a document without annotating it.
    pub fn extract_terms(&self, html: &str) -> TermIndex {
        let dom = parse_html(html);
        match self.find_glossary(&dom) {
            Some(glossary) => TermIndex::build(&dom, glossary),
            None => TermIndex::empty(),
        }
    }

    /// A tooltip controller over an annotated document's index.
    pub fn tooltip_controller(&self, index: TermIndex, mode: DeviceMode) -> TooltipController {
        TooltipController::new(index, self.options.panel_id.clone(), mode)
    }

    /// A rescanner for content added after the initial pass, with marker
    /// ids continuing past every `data-ref` in the annotated document.
    pub fn rescanner(&self, annotated: &Annotated) -> Result<Rescanner> {
        Rescanner::new(annotated.index.clone(), &self.options, annotated.next_ref)
    }

    fn run(&self, dom: &mut Document) -> Annotated {
        let mut report = AnnotationReport::default();

        let content = self.find_content(dom);
        let glossary = self.find_glossary(dom);

        let index = match glossary {
            Some(glossary) => TermIndex::build(dom, glossary),
            None => {
                log::warn!(
                    "no glossary region (.{}) found; terms will not be marked",
                    self.options.glossary_class
                );
                TermIndex::empty()
            }
        };
        report.terms_indexed = index.len();

        if self.options.anchor_headings {
            let anchors = assign_anchors(dom, &self.policy, content, glossary);
            report.term_anchors = anchors.term_anchors;
            report.heading_ids = anchors.heading_ids;
        }

        if self.options.link_citations {
            let linker = CitationLinker::new(&self.policy, &self.options.citation_class);
            report.citations_linked = linker.scan(dom, content);
        }

        let scanner = TermScanner::new(
            &index,
            &self.policy,
            &self.options.marker_class,
            &self.options.badge_class,
        );
        let mut next_ref = next_marker_ref(dom, dom.document(), &self.options.marker_class);
        report.markers_inserted = scanner.scan(dom, content, &mut next_ref);

        log::info!(
            "annotated document: {} terms, {} markers, {} citations",
            report.terms_indexed,
            report.markers_inserted,
            report.citations_linked
        );

        Annotated {
            html: serialize_document(dom),
            report,
            index,
            next_ref,
        }
    }

    /// The region to annotate: the configured content class, else `body`,
    /// else the document root (fragments).
    fn find_content(&self, dom: &Document) -> NodeId {
        dom.find_by_class(&self.options.content_class)
            .or_else(|| dom.find_by_tag("body"))
            .unwrap_or_else(|| dom.document())
    }

    fn find_glossary(&self, dom: &Document) -> Option<NodeId> {
        dom.find_by_class(&self.options.glossary_class)
    }
}
