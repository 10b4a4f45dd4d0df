//! Benchmarks for the annotation pipeline.
//!
//! Run with: cargo bench

use std::fmt::Write;

use criterion::{Criterion, criterion_group, criterion_main};

use glossator::{AnnotateOptions, Annotator};

const TERMS: &[(&str, &str)] = &[
    ("Provider", "An entity placing a general-purpose AI model on the market."),
    ("Deployer", "An entity using an AI system under its own authority."),
    ("Model", "A general-purpose AI model."),
    ("Foundation Model", "A model trained on broad data at scale."),
    ("Systemic Risk", "A risk specific to the high-impact capabilities of a model."),
    ("Downstream Provider", "A provider integrating a model into an AI system."),
    ("Training Compute", "The cumulative compute used for training."),
    ("Serious Incident", "An incident leading to significant harm."),
    ("Code of Practice", "The voluntary code detailing compliance measures."),
    ("Transparency", "The obligation to document and disclose model information."),
];

/// Synthesize a document shaped like the real target pages: hundreds of
/// paragraphs referencing glossary terms and AI Act provisions.
fn sample_document(paragraphs: usize) -> String {
    let mut body = String::new();
    for i in 0..paragraphs {
        if i % 25 == 0 {
            write!(body, "<h2>Commitment {}</h2>", i / 25 + 1).unwrap();
        }
        let (term, _) = TERMS[i % TERMS.len()];
        write!(
            body,
            "<p>The {term} shall assess systemic risk before placing the model \
             on the market, pursuant to Article {}({}) AI Act, and inform the \
             downstream provider of any serious incident.</p>",
            50 + i % 10,
            1 + i % 4
        )
        .unwrap();
        if i % 40 == 0 {
            write!(
                body,
                "<div class=\"explanatory-box\"><p>The {term} is not marked here.</p></div>"
            )
            .unwrap();
        }
    }

    let mut glossary = String::new();
    for (term, definition) in TERMS {
        write!(glossary, "<dt>{term}</dt><dd>{definition}</dd>").unwrap();
    }

    format!(
        "<!DOCTYPE html><html><head><title>Code of Practice</title></head><body>\
         <div class=\"main-content\">{body}\
         <dl class=\"glossary-list\">{glossary}</dl>\
         </div></body></html>"
    )
}

fn bench_annotate_small(c: &mut Criterion) {
    let html = sample_document(50);
    let annotator = Annotator::new(AnnotateOptions::default()).unwrap();

    c.bench_function("annotate_50_paragraphs", |b| {
        b.iter(|| annotator.annotate(&html));
    });
}

fn bench_annotate_large(c: &mut Criterion) {
    let html = sample_document(500);
    let annotator = Annotator::new(AnnotateOptions::default()).unwrap();

    c.bench_function("annotate_500_paragraphs", |b| {
        b.iter(|| annotator.annotate(&html));
    });
}

fn bench_reannotate(c: &mut Criterion) {
    let annotator = Annotator::new(AnnotateOptions::default()).unwrap();
    let annotated = annotator.annotate(&sample_document(500));

    c.bench_function("reannotate_annotated_500", |b| {
        b.iter(|| annotator.annotate(&annotated.html));
    });
}

fn bench_extract_terms(c: &mut Criterion) {
    let html = sample_document(500);
    let annotator = Annotator::new(AnnotateOptions::default()).unwrap();

    c.bench_function("extract_terms_500", |b| {
        b.iter(|| annotator.extract_terms(&html));
    });
}

fn bench_fragment_rescan(c: &mut Criterion) {
    let annotator = Annotator::new(AnnotateOptions::default()).unwrap();
    let annotated = annotator.annotate(&sample_document(50));
    let fragment = "<p>The provider shall notify the deployer of systemic risk \
                    under Article 55(1) AI Act.</p>";

    c.bench_function("fragment_rescan", |b| {
        b.iter(|| {
            let mut rescanner = annotator.rescanner(&annotated).unwrap();
            rescanner.annotate_fragment(fragment)
        });
    });
}

criterion_group!(
    benches,
    bench_annotate_small,
    bench_annotate_large,
    bench_reannotate,
    bench_extract_terms,
    bench_fragment_rescan,
);
criterion_main!(benches);
