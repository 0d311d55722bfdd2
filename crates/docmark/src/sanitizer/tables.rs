// ABOUTME: Table handling: capability tables become labeled quotes, data cells lose block structure.
// ABOUTME: Cell flattening turns lists, definitions and blocks into inline runs separated by <br>.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::node::{Element, Node};
use crate::dom::rewrite::{rewrite_children, rewrite_nodes, Rewrite};
use crate::profile::{PhraseSet, SanitizerProfile};

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n\t]+").unwrap());

const BULLET: &str = "• ";

// Marks where a block-derived run starts; resolved to a <br> or dropped.
const RUN_START: &str = "docmark:run-start";

// Block-level tags turned into inline runs inside table cells
const CELL_BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "header", "footer", "aside", "h1", "h2", "h3", "h4",
    "h5", "h6", "blockquote", "pre",
];

/// Replace every capability table with a labeled quotation block.
pub fn simplify_capability_tables(
    root: Element,
    profile: &SanitizerProfile,
    phrases: &PhraseSet,
) -> Element {
    rewrite_children(root, &mut |node| match node {
        Node::Element(el) if el.is("table") && is_capability_table(&el, profile, phrases) => {
            Rewrite::Replace(vec![simplify(&el, &profile.capability_label)])
        }
        other => Rewrite::Keep(other),
    })
}

/// A table marked by class, or whose text mentions a capability phrase.
pub fn is_capability_table(el: &Element, profile: &SanitizerProfile, phrases: &PhraseSet) -> bool {
    el.classes()
        .any(|c| profile.capability_classes.iter().any(|m| m == c))
        || phrases.is_match(&el.text())
}

fn simplify(table: &Element, label: &str) -> Node {
    let cells: Vec<Vec<Node>> = data_cells(table)
        .into_iter()
        .filter(|cell| !is_empty_cell(cell))
        .map(|cell| trim_run(cell.children.clone()))
        .collect();

    if let [only] = cells.as_slice() {
        if is_bare_link(only) {
            return Element::new("p").with_children(only.clone()).into();
        }
    }

    let mut children: Vec<Node> = Vec::with_capacity(cells.len() + 1);
    children.push(
        Element::new("p")
            .with_children(vec![Element::new("strong")
                .with_children(vec![Node::text(label)])
                .into()])
            .into(),
    );
    children.extend(
        cells
            .into_iter()
            .map(|cell| Element::new("p").with_children(cell).into()),
    );
    Element::new("blockquote").with_children(children).into()
}

/// Data cells of `table` in document order, not descending into cells.
fn data_cells(table: &Element) -> Vec<&Element> {
    let mut cells = Vec::new();
    let mut stack: Vec<&Node> = table.children.iter().rev().collect();
    while let Some(node) = stack.pop() {
        let Node::Element(el) = node else {
            continue;
        };
        if el.is("td") {
            cells.push(el);
        } else {
            stack.extend(el.children.iter().rev());
        }
    }
    cells
}

fn is_empty_cell(cell: &Element) -> bool {
    cell.text().trim().is_empty() && !cell.descendants().any(|d| d.is("img"))
}

fn is_bare_link(nodes: &[Node]) -> bool {
    let mut content = nodes.iter().filter(|n| !n.is_blank_text());
    matches!(
        (content.next(), content.next()),
        (Some(node), None) if node.is_element("a")
    )
}

/// Flatten every `td`/`th` under `root`.
pub fn flatten_table_cells(root: Element) -> Element {
    rewrite_children(root, &mut |node| match node {
        Node::Element(el) if el.is("td") || el.is("th") => {
            Rewrite::Keep(Node::Element(flatten_cell(el)))
        }
        other => Rewrite::Keep(other),
    })
}

/// Rewrite a single cell so it holds only inline content.
pub fn flatten_cell(mut cell: Element) -> Element {
    let children = std::mem::take(&mut cell.children);
    let children = rewrite_nodes(children, &mut flatten_block);
    let children = resolve_run_starts(children, &mut true);
    cell.children = children.into_iter().map(collapse_line_breaks).collect();
    cell
}

fn flatten_block(node: Node) -> Rewrite {
    let Node::Element(el) = node else {
        return Rewrite::Keep(node);
    };
    match el.name.as_str() {
        "li" => Rewrite::Replace(block_run(inline_run(Some(BULLET), el.children))),
        "ul" | "ol" | "dl" => Rewrite::Replace(el.children),
        "dt" => Rewrite::Replace(block_run(bold_term(el.children))),
        // A description continues the line its term started.
        "dd" => Rewrite::Replace(inline_run(None, el.children)),
        name if CELL_BLOCK_TAGS.contains(&name) => {
            if is_empty_cell(&el) {
                Rewrite::Remove
            } else {
                Rewrite::Replace(block_run(inline_run(None, el.children)))
            }
        }
        _ => Rewrite::Keep(Node::Element(el)),
    }
}

/// Trimmed content, optional prefix, exactly one trailing `<br>`.
fn inline_run(prefix: Option<&str>, children: Vec<Node>) -> Vec<Node> {
    let mut run = trim_run(children);
    if let Some(prefix) = prefix {
        run.insert(0, Node::text(prefix));
    }
    run.push(Element::new("br").into());
    run
}

fn block_run(mut run: Vec<Node>) -> Vec<Node> {
    run.insert(0, Node::Comment(RUN_START.to_string()));
    run
}

fn is_run_start(node: &Node) -> bool {
    matches!(node, Node::Comment(c) if c == RUN_START)
}

/// Turn each run-start marker into a `<br>` when inline content precedes it
/// on the current line, and drop it otherwise.
///
/// `at_break` tracks, in document order, whether the last visible content
/// was the start of the cell or a break.
fn resolve_run_starts(nodes: Vec<Node>, at_break: &mut bool) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Comment(c) if c == RUN_START => {
                if !*at_break {
                    out.push(Element::new("br").into());
                    *at_break = true;
                }
            }
            Node::Text(t) => {
                if !t.trim().is_empty() {
                    *at_break = false;
                }
                out.push(Node::Text(t));
            }
            Node::Element(mut el) => {
                if el.is("br") {
                    *at_break = true;
                } else if el.is("img") {
                    *at_break = false;
                } else {
                    let children = std::mem::take(&mut el.children);
                    el.children = resolve_run_starts(children, at_break);
                }
                out.push(Node::Element(el));
            }
            other => out.push(other),
        }
    }
    out
}

/// The term in bold with a trailing colon, then a space before its description.
fn bold_term(children: Vec<Node>) -> Vec<Node> {
    let mut run = trim_run(children);
    let has_colon = match run.last() {
        Some(Node::Text(t)) => t.ends_with(':'),
        _ => false,
    };
    if !has_colon {
        match run.last_mut() {
            Some(Node::Text(t)) => t.push(':'),
            _ => run.push(Node::text(":")),
        }
    }
    vec![
        Element::new("strong").with_children(run).into(),
        Node::text(" "),
    ]
}

/// Drop surrounding blank text and trailing breaks, then trim the edge texts.
///
/// A leading run-start marker is dropped too; the caller marks its own run.
fn trim_run(mut nodes: Vec<Node>) -> Vec<Node> {
    while nodes
        .last()
        .map_or(false, |n| n.is_blank_text() || n.is_element("br"))
    {
        nodes.pop();
    }
    let leading = nodes
        .iter()
        .take_while(|n| n.is_blank_text() || is_run_start(n))
        .count();
    nodes.drain(..leading);

    if let Some(Node::Text(t)) = nodes.first_mut() {
        *t = t.trim_start().to_string();
    }
    if let Some(Node::Text(t)) = nodes.last_mut() {
        *t = t.trim_end().to_string();
    }
    nodes
}

fn collapse_line_breaks(node: Node) -> Node {
    match node {
        Node::Text(t) => Node::Text(LINE_BREAKS.replace_all(&t, " ").into_owned()),
        Node::Element(mut el) => {
            for value in el.attrs.values_mut() {
                if LINE_BREAKS.is_match(value) {
                    *value = LINE_BREAKS.replace_all(value, " ").into_owned();
                }
            }
            let children = std::mem::take(&mut el.children);
            el.children = children.into_iter().map(collapse_line_breaks).collect();
            Node::Element(el)
        }
        other => other,
    }
}
