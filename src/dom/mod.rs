//! Arena DOM: parsing, traversal, mutation, and serialization.

pub mod arena;
pub mod parse;
pub mod serialize;
pub mod sink;

pub use arena::{Attribute, Document, Node, NodeData, NodeId, html_name};
pub use parse::{parse_bytes, parse_fragment, parse_html};
pub use serialize::{serialize_children, serialize_document, serialize_node};
