//! Citation linking tests over full documents.

use glossator::{AnnotateOptions, Annotator};

fn annotate(body: &str) -> glossator::Annotated {
    let html = format!(
        "<html><body><div class=\"main-content\">{body}</div></body></html>"
    );
    Annotator::new(AnnotateOptions::default())
        .unwrap()
        .annotate(&html)
}

#[test]
fn test_article_reference_linked() {
    let out = annotate("<p>Signatories will comply with Article 53(1), point (a) AI Act.</p>");
    assert_eq!(out.report.citations_linked, 1);
    assert!(out.html.contains(
        "class=\"ai-act-link\" target=\"_blank\" rel=\"noopener noreferrer\">\
         Article 53(1), point (a)</a> AI Act."
    ));
    assert!(out.html.contains("CELEX:32024R1689"));
    assert!(out.html.contains("#art_53"));
}

#[test]
fn test_recital_and_annex_fragments() {
    let out = annotate(
        "<p>See Recital 116 AI Act.</p>\
         <p>See Annex XI, Section 2, point 1 AI Act.</p>",
    );
    assert_eq!(out.report.citations_linked, 2);
    assert!(out.html.contains("#rct_116"));
    assert!(out.html.contains("#anx_XI"));
}

#[test]
fn test_every_occurrence_linked_in_one_block() {
    let out = annotate(
        "<p>Article 56(1)(3), Recital 1, and Recital 116 AI Act all apply.</p>",
    );
    assert_eq!(out.report.citations_linked, 3);
    assert!(out.html.contains("#art_56"));
    assert!(out.html.contains("#rct_1\""));
    assert!(out.html.contains("#rct_116"));
}

#[test]
fn test_reference_spanning_line_break() {
    let out = annotate("<p>per Articles 53 and 55 AI\n        Act</p>");
    assert_eq!(out.report.citations_linked, 1);
    assert!(out.html.contains(">Articles 53 and 55</a>"));
}

#[test]
fn test_other_instruments_not_linked() {
    let out = annotate(
        "<p>Article 4(3) of Directive (EU) 2019/790 is a different instrument.</p>\
         <p>Article 78 without a qualifier stays plain.</p>",
    );
    assert_eq!(out.report.citations_linked, 0);
    assert!(!out.html.contains("ai-act-link"));
}

#[test]
fn test_citations_inside_existing_links_untouched() {
    let out = annotate("<p><a href=\"x\">Article 53 AI Act</a></p>");
    assert_eq!(out.report.citations_linked, 0);
}

#[test]
fn test_citations_in_excluded_boxes_untouched() {
    let out = annotate("<div class=\"legal-box\"><p>Article 53 AI Act</p></div>");
    assert_eq!(out.report.citations_linked, 0);
}

#[test]
fn test_citation_links_excluded_from_term_marking() {
    let html = "<html><body><div class=\"main-content\">\
        <p>Article 53 AI Act mentions the provider.</p>\
        <dl class=\"glossary-list\"><dt>Article</dt><dd>def</dd>\
        <dt>Provider</dt><dd>def</dd></dl>\
        </div></body></html>";
    let out = Annotator::new(AnnotateOptions::default())
        .unwrap()
        .annotate(html);
    // "Article" inside the citation link is not term-marked; "provider" is
    assert_eq!(out.report.citations_linked, 1);
    assert_eq!(out.report.markers_inserted, 1);
    assert!(out.html.contains("#term-provider"));
    assert!(!out.html.contains("#term-article"));
}
