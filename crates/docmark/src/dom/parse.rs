// ABOUTME: Builds the owned node tree from HTML using scraper (html5ever).
// ABOUTME: Lifts declarative `<template shadowrootmode>` children into host boundaries; decodes raw bytes.

use ego_tree::NodeRef;
use scraper::Html;

use crate::dom::node::{normalize_spaces, Boundary, BoundaryMode, Element, Node};
use crate::dom::pattern::Pattern;

/// A parsed, fully materialized document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse a complete HTML document (fragments are wrapped in html/body).
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let root = parsed
            .tree
            .root()
            .children()
            .find_map(|child| match convert(child) {
                Some(Node::Element(el)) => Some(el),
                _ => None,
            })
            .unwrap_or_else(|| Element::new("html"));
        Self { root }
    }

    /// Wrap an already built tree.
    pub fn from_root(root: Element) -> Self {
        Self { root }
    }

    /// The document element (`<html>`).
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The `<body>` element when present.
    pub fn body(&self) -> Option<&Element> {
        self.root.query(&Pattern::tag("body"))
    }

    /// Trimmed text of `<title>`, if non-empty.
    pub fn title(&self) -> Option<String> {
        self.root
            .query(&Pattern::tag("title"))
            .map(|t| normalize_spaces(&t.text()))
            .filter(|t| !t.is_empty())
    }
}

/// Parse a markup fragment into its top-level sibling nodes.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    let parsed = Html::parse_fragment(html);
    parsed.root_element().children().filter_map(convert).collect()
}

fn convert(node: NodeRef<scraper::Node>) -> Option<Node> {
    match node.value() {
        scraper::Node::Text(text) => Some(Node::Text((**text).to_string())),
        scraper::Node::Comment(comment) => Some(Node::Comment((**comment).to_string())),
        scraper::Node::Element(el) => {
            let mut element = Element::new(el.name());
            for (k, v) in el.attrs() {
                element.set_attr(k, v);
            }
            for child in node.children() {
                if element.boundary.is_none() {
                    if let Some(mode) = shadow_root_mode(child) {
                        let children = convert_children(child);
                        element.boundary = Some(Boundary { mode, children });
                        continue;
                    }
                }
                if child.value().is_fragment() {
                    element.children.extend(convert_children(child));
                } else if let Some(converted) = convert(child) {
                    element.children.push(converted);
                }
            }
            Some(Node::Element(element))
        }
        _ => None,
    }
}

/// Children of `node`, with template-contents fragments inlined.
///
/// html5ever hangs a template's contents under a `Fragment` node that is the
/// template's first child.
fn convert_children(node: NodeRef<scraper::Node>) -> Vec<Node> {
    let mut out = Vec::new();
    for child in node.children() {
        if child.value().is_fragment() {
            out.extend(convert_children(child));
        } else if let Some(converted) = convert(child) {
            out.push(converted);
        }
    }
    out
}

/// Mode of a declarative shadow root template, or None for any other node.
fn shadow_root_mode(node: NodeRef<scraper::Node>) -> Option<BoundaryMode> {
    let el = node.value().as_element()?;
    if !el.name().eq_ignore_ascii_case("template") {
        return None;
    }
    el.attr("shadowrootmode")
        .or_else(|| el.attr("shadowroot"))
        .map(BoundaryMode::from_attr)
}

/// Decode raw HTML bytes using a charset hint, falling back to detection.
pub fn decode_html(bytes: &[u8], charset: Option<&str>) -> String {
    if let Some(label) = charset {
        if let Some(encoding) = encoding_rs::Encoding::for_label(label.trim().as_bytes()) {
            let (decoded, _, _) = encoding.decode(bytes);
            return decoded.into_owned();
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}
