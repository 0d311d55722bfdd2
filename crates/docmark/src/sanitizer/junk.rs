// ABOUTME: Junk, boilerplate, icon and tooltip removal for cleaned content.
// ABOUTME: Each pass is a bottom-up rewrite over an owned clone and is idempotent.

use regex::Regex;

use crate::dom::node::{normalize_spaces, Element, Node};
use crate::dom::rewrite::{rewrite_children, Rewrite};
use crate::profile::SanitizerProfile;

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

// Containers checked against boilerplate prefixes
const PREFIX_CONTAINER_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "nav", "aside", "header", "footer", "ol", "ul",
];

// Children that end a container's leading inline run
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset", "figure",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "main", "nav", "ol",
    "p", "pre", "section", "table", "ul",
];

/// Remove blacklisted tags and selectors, boilerplate-prefixed containers,
/// and boilerplate headings with the list that follows them.
pub fn remove_junk(root: Element, profile: &SanitizerProfile) -> Element {
    let root = rewrite_children(root, &mut |node| match node {
        Node::Element(el) if profile.is_junk(&el) => Rewrite::Remove,
        Node::Element(el) => strip_boilerplate_lead(el, profile),
        other => Rewrite::Keep(other),
    });
    remove_boilerplate_sections(root, profile)
}

/// Drop a container's leading inline run when it opens with a boilerplate
/// prefix. A container holding nothing else is removed outright.
///
/// Lists are judged on their whole text, since a breadcrumb trail is often a
/// list of links.
fn strip_boilerplate_lead(mut el: Element, profile: &SanitizerProfile) -> Rewrite {
    if profile.boilerplate_prefixes.is_empty() || !PREFIX_CONTAINER_TAGS.iter().any(|t| el.is(t)) {
        return Rewrite::Keep(Node::Element(el));
    }
    if el.is("ul") || el.is("ol") {
        return if has_boilerplate_prefix(&el.text(), profile) {
            Rewrite::Remove
        } else {
            Rewrite::Keep(Node::Element(el))
        };
    }

    let lead = el.children.iter().take_while(|n| !is_block(n)).count();
    let lead_text: String = el.children[..lead].iter().map(Node::text_content).collect();
    if !has_boilerplate_prefix(&lead_text, profile) {
        return Rewrite::Keep(Node::Element(el));
    }
    if lead == el.children.len() {
        return Rewrite::Remove;
    }
    el.children.drain(..lead);
    Rewrite::Keep(Node::Element(el))
}

fn is_block(node: &Node) -> bool {
    node.as_element()
        .map_or(false, |el| BLOCK_TAGS.iter().any(|t| el.is(t)))
}

fn has_boilerplate_prefix(text: &str, profile: &SanitizerProfile) -> bool {
    let text = normalize_spaces(text).to_lowercase();
    profile
        .boilerplate_prefixes
        .iter()
        .any(|prefix| text.starts_with(&prefix.to_lowercase()))
}

/// True for a heading whose text is exactly a boilerplate label.
pub fn is_boilerplate_heading(el: &Element, profile: &SanitizerProfile) -> bool {
    if !HEADING_TAGS.iter().any(|t| el.is(t)) {
        return false;
    }
    let text = normalize_spaces(&el.text()).to_lowercase();
    let text = text.trim_end_matches(':').trim_end();
    profile
        .boilerplate_headings
        .iter()
        .any(|label| label.to_lowercase() == text)
}

fn remove_boilerplate_sections(mut el: Element, profile: &SanitizerProfile) -> Element {
    let children = std::mem::take(&mut el.children);
    let mut out = Vec::with_capacity(children.len());
    let mut after_heading = false;

    for node in children {
        if after_heading {
            if node.is_blank_text() {
                out.push(node);
                continue;
            }
            after_heading = false;
            if node.is_element("ul") || node.is_element("ol") {
                continue;
            }
        }
        match node {
            Node::Element(child) if is_boilerplate_heading(&child, profile) => {
                after_heading = true;
            }
            Node::Element(child) => {
                out.push(Node::Element(remove_boilerplate_sections(child, profile)));
            }
            other => out.push(other),
        }
    }

    el.children = out;
    el
}

/// Build the case-insensitive icon matcher for a vocabulary.
///
/// A word matches only when it is not part of a longer alphanumeric run, so
/// `icon_note.png` matches `note` while `notebook.png` does not.
pub fn icon_matcher(vocabulary: &[String]) -> Option<Regex> {
    let words: Vec<String> = vocabulary
        .iter()
        .filter(|w| !w.is_empty())
        .map(|w| regex::escape(w))
        .collect();
    if words.is_empty() {
        return None;
    }
    let pattern = format!(
        r"(?i)(?:^|[^a-z0-9])(?:{})(?:[^a-z0-9]|$)",
        words.join("|")
    );
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(error = %e, "invalid icon vocabulary; icons kept");
            None
        }
    }
}

/// Remove `img` elements whose file name or alt text names a callout icon.
pub fn remove_icons(root: Element, matcher: Option<&Regex>) -> Element {
    let Some(re) = matcher else {
        return root;
    };
    rewrite_children(root, &mut |node| match node {
        Node::Element(el) if el.is("img") && is_icon(&el, re) => Rewrite::Remove,
        other => Rewrite::Keep(other),
    })
}

fn is_icon(el: &Element, re: &Regex) -> bool {
    let file = el.attr("src").map(file_name).unwrap_or("");
    if !file.is_empty() && re.is_match(file) {
        return true;
    }
    el.attr("alt").map_or(false, |alt| re.is_match(alt.trim()))
}

/// Last path segment of a reference, without query or fragment.
fn file_name(src: &str) -> &str {
    let end = src.find(|c| c == '?' || c == '#').unwrap_or(src.len());
    let path = &src[..end];
    path.rsplit('/').next().unwrap_or(path)
}

/// Remove tooltip attributes from `root` and every descendant.
pub fn strip_attributes(mut root: Element, attrs: &[String]) -> Element {
    if attrs.is_empty() {
        return root;
    }
    for attr in attrs {
        root.remove_attr(attr);
    }
    rewrite_children(root, &mut |node| match node {
        Node::Element(mut el) => {
            for attr in attrs {
                el.remove_attr(attr);
            }
            Rewrite::Keep(Node::Element(el))
        }
        other => Rewrite::Keep(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse::Document;
    use crate::dom::pattern::Pattern;
    use crate::dom::serialize::inner_html;
    use crate::profile::Profile;

    fn profile() -> &'static SanitizerProfile {
        &Profile::builtin().sanitizer
    }

    fn body(html: &str) -> Element {
        Document::parse(html)
            .root()
            .query(&Pattern::tag("body"))
            .cloned()
            .unwrap()
    }

    #[test]
    fn removes_blacklisted_tags_and_selectors() {
        let cleaned = remove_junk(
            body(
                r#"<div>Content</div><div class="cookie-banner">Cookie</div><script>alert(1)</script><span aria-hidden="true">dup</span>"#,
            ),
            profile(),
        );
        assert_eq!(inner_html(&cleaned), "<div>Content</div>");
    }

    #[test]
    fn removes_see_also_heading_and_following_list() {
        let cleaned = remove_junk(
            body("<p>Intro</p><h2>See Also</h2>\n<ul><li>Other</li></ul><p>After</p>"),
            profile(),
        );
        let html = inner_html(&cleaned);
        assert!(!html.contains("See Also"));
        assert!(!html.contains("Other"));
        assert!(html.contains("Intro"));
        assert!(html.contains("After"));
    }

    #[test]
    fn keeps_list_not_preceded_by_boilerplate_heading() {
        let cleaned = remove_junk(
            body("<h2>Fields</h2><ul><li>Name</li></ul>"),
            profile(),
        );
        assert!(inner_html(&cleaned).contains("Name"));
    }

    #[test]
    fn removes_innermost_breadcrumb_container() {
        let cleaned = remove_junk(
            body("<div><p>You are here: Home &gt; Apex</p><p>Real content</p></div>"),
            profile(),
        );
        assert_eq!(inner_html(&cleaned), "<div><p>Real content</p></div>");
    }

    #[test]
    fn inline_breadcrumb_keeps_sibling_content() {
        let cleaned = remove_junk(
            body("<div><span>You are here: Home</span><p>Real documentation body</p></div>"),
            profile(),
        );
        assert_eq!(inner_html(&cleaned), "<div><p>Real documentation body</p></div>");
    }

    #[test]
    fn breadcrumb_text_and_links_before_a_block_are_dropped() {
        let cleaned = remove_junk(
            body(r#"<section>You are here: <a href="/">Home</a> &gt; Apex<h2>Methods</h2></section>"#),
            profile(),
        );
        assert_eq!(inner_html(&cleaned), "<section><h2>Methods</h2></section>");
    }

    #[test]
    fn breadcrumb_list_is_removed() {
        let cleaned = remove_junk(
            body("<ul><li>You are here:</li><li>Home</li></ul><p>Body</p>"),
            profile(),
        );
        assert_eq!(inner_html(&cleaned), "<p>Body</p>");
    }

    #[test]
    fn junk_removal_is_idempotent() {
        let input = body(
            r#"<h3>See also:</h3><ol><li>x</li></ol><nav class="breadcrumbs">a</nav><p>keep</p><style>p{}</style>"#,
        );
        let once = remove_junk(input, profile());
        let twice = remove_junk(once.clone(), profile());
        assert_eq!(once, twice);
        assert_eq!(inner_html(&once), "<p>keep</p>");
    }

    #[test]
    fn removes_icons_by_file_name_and_alt() {
        let re = icon_matcher(&profile().icon_vocabulary);
        let cleaned = remove_icons(
            body(
                r#"<img src="/img/icon_note.png?v=2"><img src="a.png" alt="Warning"><img src="notebook.png" alt="Diagram">"#,
            ),
            re.as_ref(),
        );
        assert_eq!(
            inner_html(&cleaned),
            r#"<img alt="Diagram" src="notebook.png">"#
        );
    }

    #[test]
    fn strips_tooltip_attributes() {
        let cleaned = strip_attributes(
            body(r#"<a href="/x" title="Go" data-tooltip="t">x</a>"#),
            &profile().tooltip_attrs,
        );
        assert_eq!(inner_html(&cleaned), r#"<a href="/x">x</a>"#);
    }

    #[test]
    fn file_name_drops_query_and_path() {
        assert_eq!(file_name("https://x.com/a/b/tip.gif?x=1#y"), "tip.gif");
        assert_eq!(file_name("plain.png"), "plain.png");
    }
}
