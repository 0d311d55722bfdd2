// ABOUTME: Main library entry point for docmark, the page-to-markdown converter.
// ABOUTME: Re-exports the public API: Extractor, ExtractorBuilder, MarkdownDocument, ExtractError, Profile, Document.

//! docmark - Convert a rendered documentation page into portable markdown.
//!
//! The pipeline has three stages:
//!
//! - [`BoundaryLocator`] finds the primary content root, searching through
//!   nested attached sub-trees (declarative shadow roots) before falling
//!   back to direct selectors, heuristic scoring and finally the body.
//! - [`ContentSanitizer`] removes page chrome and rewrites table cells so
//!   they survive markdown conversion.
//! - [`MarkdownRenderer`] converts the cleaned markup with `htmd` plus a few
//!   documentation-specific rules and prefixes a frontmatter header.
//!
//! # Example
//!
//! ```
//! use docmark::{Document, ExtractError};
//!
//! fn main() -> Result<(), ExtractError> {
//!     let doc = Document::parse("<main><h1>Apex</h1><p>Reference</p></main>");
//!     let md = docmark::extract(&doc, "https://example.com/doc", Some("Apex"))?;
//!     assert!(md.to_markdown().contains("# Apex"));
//!     Ok(())
//! }
//! ```

pub mod dom;
pub mod error;
pub mod locator;
pub mod options;
pub mod pipeline;
pub mod profile;
pub mod render;
pub mod result;
pub mod sanitizer;

pub use crate::dom::{decode_html, Document};
pub use crate::error::{ErrorCode, ExtractError, TraversalError};
pub use crate::locator::{BoundaryLocator, Located, Tier};
pub use crate::options::{ExtractorBuilder, Options};
pub use crate::pipeline::Extractor;
pub use crate::profile::Profile;
pub use crate::render::MarkdownRenderer;
pub use crate::result::{ConversionMetadata, MarkdownDocument};
pub use crate::sanitizer::ContentSanitizer;

/// Convert `document` with the builtin profile.
///
/// `current_address` is the page URL, used for the frontmatter and to
/// resolve relative references. `document_title` overrides the page title.
pub fn extract(
    document: &Document,
    current_address: &str,
    document_title: Option<&str>,
) -> Result<MarkdownDocument, ExtractError> {
    Extractor::default().extract(document, current_address, document_title)
}
