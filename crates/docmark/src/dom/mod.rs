// ABOUTME: DOM model for docmark: owned node tree with attached boundaries.
// ABOUTME: Parsing, typed patterns, serialization and bottom-up rewriting.

//! DOM utilities.
//!
//! The rendered page is materialized into an owned tree of [`Node`]s. Elements
//! may host an attached private sub-tree ([`Boundary`]) that ordinary queries
//! do not enter; the locator reaches into it explicitly.

pub mod node;
pub mod parse;
pub mod pattern;
pub mod rewrite;
pub mod serialize;

pub use node::{Boundary, BoundaryMode, Element, Node};
pub use parse::{decode_html, parse_fragment, Document};
pub use pattern::Pattern;
pub use rewrite::Rewrite;
