// ABOUTME: HTML serialization of the owned node tree.
// ABOUTME: Boundaries are written back as declarative `<template shadowrootmode>` children.

use crate::dom::node::{Element, Node};

/// Serialize a node including its own tag.
pub fn outer_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

/// Serialize the ordinary children of an element.
///
/// A boundary attached to `el` itself is not written; boundaries deeper in
/// the tree are.
pub fn inner_html(el: &Element) -> String {
    serialize_nodes(&el.children)
}

/// Serialize a sequence of sibling nodes.
pub fn serialize_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => out.push_str(&escape_text(t)),
        Node::Comment(c) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        }
        Node::Element(el) => write_element(el, out),
    }
}

fn write_element(el: &Element, out: &mut String) {
    let name = el.name.as_str();
    out.push('<');
    out.push_str(name);
    for (k, v) in &el.attrs {
        out.push(' ');
        out.push_str(k);
        out.push_str("=\"");
        out.push_str(&escape_attr(v));
        out.push('"');
    }

    if is_void_element(name) {
        out.push('>');
        return;
    }
    out.push('>');

    if let Some(boundary) = &el.boundary {
        out.push_str("<template shadowrootmode=\"");
        out.push_str(boundary.mode.as_str());
        out.push_str("\">");
        for child in &boundary.children {
            write_node(child, out);
        }
        out.push_str("</template>");
    }

    if is_raw_text_element(name) {
        for child in &el.children {
            match child {
                Node::Text(t) => out.push_str(t),
                other => write_node(other, out),
            }
        }
    } else {
        for child in &el.children {
            write_node(child, out);
        }
    }

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Escape attribute value
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text content
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\u{a0}', "&nbsp;")
}

/// Check if tag is void element
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag.to_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "xmp" | "noembed" | "noframes")
}
