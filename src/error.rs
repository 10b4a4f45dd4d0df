//! Error types for glossator operations.

use thiserror::Error;

/// Errors that can occur while configuring the annotator.
///
/// Annotation itself never fails on document content: a missing glossary,
/// a term without a definition, or an unresolvable marker simply produce
/// fewer annotations. The library does no I/O; the CLI handles file errors
/// at its own boundary.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid exclusion rule: {0}")]
    InvalidRule(String),
}

pub type Result<T> = std::result::Result<T, Error>;
