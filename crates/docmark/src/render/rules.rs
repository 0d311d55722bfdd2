// ABOUTME: Domain rendering rules applied to the markup tree ahead of the base markdown converter.
// ABOUTME: Rules emit private-use placeholder tokens that survive conversion and are expanded afterwards.

use crate::dom::node::{Element, Node};
use crate::dom::rewrite::{rewrite_nodes, Rewrite};
use crate::profile::RendererProfile;

/// Stands for a literal inline `<br>` in the final markdown.
pub const LINE_BREAK: char = '\u{E000}';
/// Delimits the index of a stored fenced block.
pub const BLOCK_MARK: char = '\u{E001}';
/// Stands for the single-character italic delimiter.
pub const EMPHASIS: char = '\u{E002}';

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "aside", "ul", "ol", "dl", "table", "pre", "blockquote",
    "figure", "h1", "h2", "h3", "h4", "h5", "h6",
];

const CALLOUT_TAGS: &[&str] = &["div", "section", "aside", "article", "p"];

/// Per-render state shared by rules.
#[derive(Debug)]
pub struct RenderState<'p> {
    pub profile: &'p RendererProfile,
    /// Fenced blocks, referenced from the tree by [`block_token`].
    pub blocks: Vec<String>,
}

impl<'p> RenderState<'p> {
    pub fn new(profile: &'p RendererProfile) -> Self {
        Self {
            profile,
            blocks: Vec::new(),
        }
    }
}

/// A `(predicate, replacement)` pair.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&Element, &RendererProfile) -> bool,
    pub replace: fn(Element, &mut RenderState<'_>) -> Rewrite,
}

/// Builtin rules in definition order. Later entries take precedence.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            name: "emphasis",
            applies: |el, _| el.is("em") || el.is("i"),
            replace: emphasis,
        },
        Rule {
            name: "empty-anchor",
            applies: |el, _| is_empty_anchor(el),
            replace: |_, _| Rewrite::Remove,
        },
        Rule {
            name: "callout",
            applies: |el, profile| {
                CALLOUT_TAGS.iter().any(|t| el.is(t))
                    && el
                        .attr("class")
                        .map_or(false, |c| profile.callout_label(c).is_some())
            },
            replace: callout,
        },
        Rule {
            name: "fenced-code",
            applies: |el, _| el.is("pre") && sole_code_child(el).is_some(),
            replace: fenced_code,
        },
        Rule {
            name: "line-break",
            applies: |el, _| el.is("br"),
            replace: |_, _| Rewrite::Replace(vec![Node::text(LINE_BREAK.to_string())]),
        },
    ]
}

/// Rewrite `nodes` bottom-up, giving each element to the most recently
/// defined rule that accepts it.
pub fn apply_rules(nodes: Vec<Node>, rules: &[Rule], state: &mut RenderState<'_>) -> Vec<Node> {
    rewrite_nodes(nodes, &mut |node| match node {
        Node::Element(el) => {
            let profile = state.profile;
            match rules.iter().rev().find(|rule| (rule.applies)(&el, profile)) {
                Some(rule) => (rule.replace)(el, state),
                None => Rewrite::Keep(Node::Element(el)),
            }
        }
        other => Rewrite::Keep(other),
    })
}

/// Placeholder text for the fenced block at `index`.
pub fn block_token(index: usize) -> String {
    format!("{BLOCK_MARK}{index}{BLOCK_MARK}")
}

fn is_empty_anchor(el: &Element) -> bool {
    if !el.is("a") || el.attr("href").map_or(true, |h| h.trim().is_empty()) {
        return false;
    }
    let text = el.text();
    let visible = text.trim_matches(|c: char| c.is_whitespace() || c == LINE_BREAK);
    visible.is_empty() && !el.descendants().any(|d| d.is("img"))
}

fn emphasis(el: Element, _: &mut RenderState<'_>) -> Rewrite {
    if el.text().trim().is_empty() {
        return Rewrite::Replace(el.children);
    }
    let mut children = el.children;

    let leading = match children.first_mut() {
        Some(Node::Text(t)) if t.starts_with(char::is_whitespace) => {
            *t = t.trim_start().to_string();
            true
        }
        _ => false,
    };
    let trailing = match children.last_mut() {
        Some(Node::Text(t)) if t.ends_with(char::is_whitespace) => {
            *t = t.trim_end().to_string();
            true
        }
        _ => false,
    };

    let mut out = Vec::with_capacity(children.len() + 4);
    if leading {
        out.push(Node::text(" "));
    }
    out.push(Node::text(EMPHASIS.to_string()));
    out.extend(children);
    out.push(Node::text(EMPHASIS.to_string()));
    if trailing {
        out.push(Node::text(" "));
    }
    Rewrite::Replace(out)
}

fn callout(mut el: Element, state: &mut RenderState<'_>) -> Rewrite {
    let label = el
        .attr("class")
        .and_then(|c| state.profile.callout_label(c))
        .unwrap_or(state.profile.default_callout_label.as_str());
    let lead: Vec<Node> = vec![
        Element::new("strong")
            .with_children(vec![Node::text(format!("{label}:"))])
            .into(),
        Node::text(" "),
    ];

    let mut children = std::mem::take(&mut el.children);
    let first = children.iter().position(|n| !n.is_blank_text());
    match first {
        Some(i) if children[i].is_element("p") => {
            if let Some(p) = children[i].as_element_mut() {
                let rest = std::mem::take(&mut p.children);
                p.children = lead;
                p.children.extend(rest);
            }
        }
        Some(i) if children[i].as_element().map_or(false, is_block) => {
            children.insert(0, Element::new("p").with_children(lead).into());
        }
        _ => {
            let rest = children;
            children = lead;
            children.extend(rest);
        }
    }

    Rewrite::Keep(Element::new("blockquote").with_children(children).into())
}

fn is_block(el: &Element) -> bool {
    BLOCK_TAGS.iter().any(|t| el.is(t))
}

fn sole_code_child(el: &Element) -> Option<&Element> {
    let mut content = el.children.iter().filter(|n| !n.is_blank_text());
    match (content.next(), content.next()) {
        (Some(Node::Element(code)), None) if code.is("code") => Some(code),
        _ => None,
    }
}

fn fenced_code(el: Element, state: &mut RenderState<'_>) -> Rewrite {
    let Some(code) = sole_code_child(&el) else {
        return Rewrite::Keep(Node::Element(el));
    };
    let language = code
        .classes()
        .find_map(|c| c.strip_prefix("language-"))
        .unwrap_or("");

    // Children were rewritten first; undo their placeholders.
    let text: String = code
        .text()
        .chars()
        .filter(|c| *c != EMPHASIS)
        .map(|c| if c == LINE_BREAK { '\n' } else { c })
        .collect();
    let text = text.trim_end_matches('\n');

    let fence = fence_for(text);
    let block = format!("{fence}{language}\n{text}\n{fence}");
    let token = block_token(state.blocks.len());
    state.blocks.push(block);

    Rewrite::Replace(vec![Element::new("p")
        .with_children(vec![Node::text(token)])
        .into()])
}

/// A backtick fence longer than any backtick run inside `code`.
fn fence_for(code: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in code.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}
