// ABOUTME: Bottom-up tree rewriting with a Keep/Replace/Remove visitor result.
// ABOUTME: Children are rewritten before their parent is visited; nothing is mutated mid-iteration.

use crate::dom::node::{Element, Node};

/// Outcome of visiting one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Keep the (possibly modified) node in place.
    Keep(Node),
    /// Splice these nodes in place of the visited one. An empty list removes it;
    /// the node's own children unwrap it.
    Replace(Vec<Node>),
    /// Drop the node and its sub-tree.
    Remove,
}

/// Rewrite a list of sibling nodes bottom-up.
///
/// Every element's ordinary children (and boundary children) are rewritten
/// first; the visitor then sees the element with its already rewritten
/// children. Results are collected into a fresh vector.
pub fn rewrite_nodes<F>(nodes: Vec<Node>, visit: &mut F) -> Vec<Node>
where
    F: FnMut(Node) -> Rewrite,
{
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match rewrite_node(node, visit) {
            Rewrite::Keep(node) => out.push(node),
            Rewrite::Replace(nodes) => out.extend(nodes),
            Rewrite::Remove => {}
        }
    }
    out
}

/// Rewrite a single node bottom-up and return the visitor's verdict for it.
pub fn rewrite_node<F>(node: Node, visit: &mut F) -> Rewrite
where
    F: FnMut(Node) -> Rewrite,
{
    let node = match node {
        Node::Element(mut el) => {
            let children = std::mem::take(&mut el.children);
            el.children = rewrite_nodes(children, visit);
            if let Some(boundary) = el.boundary.as_mut() {
                let children = std::mem::take(&mut boundary.children);
                boundary.children = rewrite_nodes(children, visit);
            }
            Node::Element(el)
        }
        other => other,
    };
    visit(node)
}

/// Rewrite the children of `root` bottom-up, never removing `root` itself.
pub fn rewrite_children<F>(mut root: Element, visit: &mut F) -> Element
where
    F: FnMut(Node) -> Rewrite,
{
    let children = std::mem::take(&mut root.children);
    root.children = rewrite_nodes(children, visit);
    root
}
