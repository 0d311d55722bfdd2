// ABOUTME: Owned DOM tree whose elements may host an attached private sub-tree (boundary).
// ABOUTME: Provides light-tree traversal, text content, class and attribute helpers.

use std::collections::BTreeMap;

use crate::dom::pattern::Pattern;
use crate::error::TraversalError;

/// Whether an attached sub-tree may be inspected from outside its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryMode {
    Open,
    Closed,
}

impl BoundaryMode {
    /// Parse the value of a `shadowrootmode` attribute.
    pub fn from_attr(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("closed") {
            BoundaryMode::Closed
        } else {
            BoundaryMode::Open
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryMode::Open => "open",
            BoundaryMode::Closed => "closed",
        }
    }
}

/// A private sub-tree attached to a host element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    pub mode: BoundaryMode,
    pub children: Vec<Node>,
}

impl Boundary {
    pub fn open(children: Vec<Node>) -> Self {
        Self {
            mode: BoundaryMode::Open,
            children,
        }
    }

    pub fn closed(children: Vec<Node>) -> Self {
        Self {
            mode: BoundaryMode::Closed,
            children,
        }
    }
}

/// An element: tag name, attributes, ordinary children and an optional boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<Node>,
    pub boundary: Option<Boundary>,
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
            boundary: None,
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// True when the tag name equals `tag` (case-insensitive).
    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.remove(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn has_boundary(&self) -> bool {
        self.boundary.is_some()
    }

    /// The attached sub-tree, if any.
    ///
    /// Errors when the boundary is closed to outside inspection.
    pub fn attached_subtree(&self) -> Result<Option<&[Node]>, TraversalError> {
        match &self.boundary {
            None => Ok(None),
            Some(b) if b.mode == BoundaryMode::Closed => Err(TraversalError::ClosedBoundary {
                host: self.name.clone(),
            }),
            Some(b) => Ok(Some(&b.children)),
        }
    }

    /// Text content of the ordinary (non-boundary) sub-tree.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Element children in document order.
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// All descendant elements of the ordinary tree, in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants::new(&self.children)
    }

    /// First descendant matching `pattern` in the ordinary tree.
    pub fn query(&self, pattern: &Pattern) -> Option<&Element> {
        query_in(&self.children, pattern)
    }

    /// All descendants matching `pattern` in the ordinary tree.
    pub fn query_all<'a>(&'a self, pattern: &'a Pattern) -> impl Iterator<Item = &'a Element> {
        self.descendants().filter(move |el| pattern.matches(el))
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// True when this is an element named `tag`.
    pub fn is_element(&self, tag: &str) -> bool {
        self.as_element().map_or(false, |el| el.is(tag))
    }

    /// True for text nodes holding only whitespace.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Node::Text(t) if t.trim().is_empty())
    }

    pub fn text_content(&self) -> String {
        match self {
            Node::Element(el) => el.text(),
            Node::Text(t) => t.clone(),
            Node::Comment(_) => String::new(),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) if el.is("template") => {}
            Node::Element(el) => collect_text(&el.children, out),
            Node::Comment(_) => {}
        }
    }
}

/// Pre-order iterator over the elements of an ordinary tree.
///
/// Boundaries are not entered.
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Descendants<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        Self {
            stack: nodes.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if let Node::Element(el) = node {
                self.stack.extend(el.children.iter().rev());
                return Some(el);
            }
        }
        None
    }
}

/// First element among `nodes` or their ordinary descendants matching `pattern`.
pub fn query_in<'a>(nodes: &'a [Node], pattern: &Pattern) -> Option<&'a Element> {
    Descendants::new(nodes).find(|el| pattern.matches(el))
}

/// Elements among `nodes` or their ordinary descendants that host a boundary.
pub fn hosts_in(nodes: &[Node]) -> impl Iterator<Item = &Element> {
    Descendants::new(nodes).filter(|el| el.has_boundary())
}

/// Collapse whitespace runs into single spaces and trim.
pub fn normalize_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
