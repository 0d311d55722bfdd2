// ABOUTME: Content sanitizer: cleans a deep copy of the located root and returns its inner markup.
// ABOUTME: Steps run in a fixed order; the caller's tree is never mutated.

//! Content sanitization.
//!
//! [`ContentSanitizer::clean`] works on an owned copy and applies, in order:
//! junk and boilerplate removal, icon removal, tooltip stripping,
//! capability-table simplification, reference resolution and table-cell
//! flattening.

pub mod junk;
pub mod links;
pub mod tables;

use regex::Regex;
use url::Url;

use crate::dom::node::{BoundaryMode, Element, Node};
use crate::dom::serialize::inner_html;
use crate::profile::{PhraseSet, Profile, SanitizerProfile};

#[derive(Debug, Clone)]
pub struct ContentSanitizer<'p> {
    profile: &'p SanitizerProfile,
    capability_phrases: PhraseSet,
    icons: Option<Regex>,
}

impl<'p> ContentSanitizer<'p> {
    pub fn new(profile: &'p Profile) -> Self {
        let profile = &profile.sanitizer;
        Self {
            profile,
            capability_phrases: PhraseSet::new(&profile.capability_phrases),
            icons: junk::icon_matcher(&profile.icon_vocabulary),
        }
    }

    /// Clean `root` and return the markup of its children.
    ///
    /// Relative references are resolved against `base` when given.
    pub fn clean(&self, root: &Element, base: Option<&Url>) -> String {
        let root = inline_boundaries(root.clone());
        let root = junk::remove_junk(root, self.profile);
        let root = junk::remove_icons(root, self.icons.as_ref());
        let root = junk::strip_attributes(root, &self.profile.tooltip_attrs);
        let root =
            tables::simplify_capability_tables(root, self.profile, &self.capability_phrases);
        let root = links::resolve_references(root, base);
        let root = tables::flatten_table_cells(root);
        inner_html(&root)
    }
}

/// Clean with the builtin profile.
pub fn clean(root: &Element, base: Option<&Url>) -> String {
    ContentSanitizer::new(Profile::builtin()).clean(root, base)
}

// Open boundaries replace their host's children; closed ones are dropped.
fn inline_boundaries(mut el: Element) -> Element {
    if let Some(boundary) = el.boundary.take() {
        if boundary.mode == BoundaryMode::Open {
            el.children = boundary.children;
        }
    }
    let children = std::mem::take(&mut el.children);
    el.children = children
        .into_iter()
        .map(|node| match node {
            Node::Element(child) => Node::Element(inline_boundaries(child)),
            other => other,
        })
        .collect();
    el
}
