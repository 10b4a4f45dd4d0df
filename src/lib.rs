//! # glossator
//!
//! A glossary annotation engine for long-form legal and policy documents.
//!
//! ## Features
//!
//! - Builds a term index from a glossary definition list (`dt`/`dd` pairs)
//! - Wraps the first in-block occurrence of each term in a reference marker
//!   with an ordinal badge, linked to the term's definition anchor
//! - Links AI Act citations ("Article 53", "Recital 116", "Annex XI") to
//!   EUR-Lex
//! - Stamps stable anchor ids on headings and definition terms
//! - Drives a headless tooltip controller (hover/tap, placement, ARIA) that
//!   a thin host layer renders
//! - Re-annotates dynamically added content without double-marking
//!
//! ## Quick Start
//!
//! ```
//! use glossator::{AnnotateOptions, Annotator};
//!
//! let annotator = Annotator::new(AnnotateOptions::default()).unwrap();
//! let out = annotator.annotate(
//!     "<html><body><div class=\"main-content\">\
//!      <p>The provider shall comply.</p>\
//!      <dl class=\"glossary-list\"><dt>Provider</dt><dd>An entity.</dd></dl>\
//!      </div></body></html>",
//! );
//! assert_eq!(out.report.markers_inserted, 1);
//! assert!(out.html.contains("#term-provider"));
//! ```
//!
//! ## Tooltips
//!
//! The [`TooltipController`] is pure state: the host feeds it pointer and
//! scroll events plus marker geometry, and applies the [`Action`]s it
//! returns (show, move, hide, ARIA wiring) to the shared panel element.

pub mod annotator;
pub mod citations;
pub mod dom;
pub mod error;
pub mod headings;
pub mod index;
pub mod matcher;
pub mod options;
pub mod scanner;
pub mod slug;
pub mod tooltip;
pub mod util;
pub mod watcher;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use annotator::{Annotated, AnnotationReport, Annotator};
pub use error::{Error, Result};
pub use index::{TermEntry, TermIndex};
pub use options::AnnotateOptions;
pub use tooltip::{Action, DeviceMode, Marker, Placement, Rect, TooltipController, Viewport};
pub use watcher::{MutationBatch, Rescanner};
