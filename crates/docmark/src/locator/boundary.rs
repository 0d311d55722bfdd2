// ABOUTME: Deep search across nested boundaries and recursive boundary flattening.
// ABOUTME: Pure functions over the owned tree; closed boundaries surface as TraversalError.

use crate::dom::node::{hosts_in, query_in, Element, Node};
use crate::dom::pattern::Pattern;
use crate::error::TraversalError;

/// An element found by [`find_deep`], with whether it sits inside a boundary.
#[derive(Debug, Clone, Copy)]
pub struct DeepMatch<'a> {
    pub element: &'a Element,
    pub in_boundary: bool,
}

/// Find the first element matching `pattern` among `scope`, entering boundaries.
///
/// The ordinary tree of `scope` is queried first. Only when that misses is
/// every boundary host in scope entered, in document order, repeating the
/// same search inside each attached sub-tree.
pub fn find_deep<'a>(
    scope: &'a [Node],
    pattern: &Pattern,
) -> Result<Option<DeepMatch<'a>>, TraversalError> {
    search(scope, pattern, false)
}

/// Like [`find_deep`], scoped to `host`'s own sub-tree.
///
/// The host's attached boundary is searched before its ordinary children,
/// since boundary content replaces the fallback children when rendered.
pub fn find_within<'a>(
    host: &'a Element,
    pattern: &Pattern,
    in_boundary: bool,
) -> Result<Option<DeepMatch<'a>>, TraversalError> {
    if let Some(subtree) = host.attached_subtree()? {
        if let Some(found) = search(subtree, pattern, true)? {
            return Ok(Some(found));
        }
    }
    search(&host.children, pattern, in_boundary)
}

fn search<'a>(
    scope: &'a [Node],
    pattern: &Pattern,
    in_boundary: bool,
) -> Result<Option<DeepMatch<'a>>, TraversalError> {
    if let Some(element) = query_in(scope, pattern) {
        return Ok(Some(DeepMatch {
            element,
            in_boundary,
        }));
    }
    for host in hosts_in(scope) {
        if let Some(subtree) = host.attached_subtree()? {
            if let Some(found) = search(subtree, pattern, true)? {
                return Ok(Some(found));
            }
        }
    }
    Ok(None)
}

/// True when `el` or any ordinary descendant hosts a boundary.
pub fn contains_boundary(el: &Element) -> bool {
    el.has_boundary() || hosts_in(&el.children).next().is_some()
}

/// Produce a self-contained copy of `el` with every boundary inlined.
///
/// A host's clone takes the flattened boundary content as its children and
/// drops its ordinary fallback children.
pub fn flatten(el: &Element) -> Result<Element, TraversalError> {
    let source = match el.attached_subtree()? {
        Some(subtree) => subtree,
        None => el.children.as_slice(),
    };
    let children = source
        .iter()
        .map(flatten_node)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Element {
        name: el.name.clone(),
        attrs: el.attrs.clone(),
        children,
        boundary: None,
    })
}

/// Flatten any node; text and comments are cloned verbatim.
pub fn flatten_node(node: &Node) -> Result<Node, TraversalError> {
    match node {
        Node::Element(el) => Ok(Node::Element(flatten(el)?)),
        other => Ok(other.clone()),
    }
}
