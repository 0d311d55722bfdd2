// ABOUTME: Markdown renderer: domain rules over the markup tree, htmd for the base conversion, then frontmatter.
// ABOUTME: Conversion failures are terminal and surface as ExtractError with the Render code.

//! Markdown rendering.
//!
//! The cleaned markup is parsed into a node tree, rewritten by the rule list
//! in [`rules`], serialized again and handed to `htmd`. Placeholder tokens
//! left by the rules are expanded in the converter's output, so inline breaks
//! stay on one line and fenced code is emitted byte-for-byte.

pub mod rules;

use chrono::{DateTime, Utc};
use htmd::options::{CodeBlockStyle, HeadingStyle, Options};
use htmd::HtmlToMarkdown;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::parse::parse_fragment;
use crate::dom::serialize::serialize_nodes;
use crate::error::ExtractError;
use crate::profile::{Profile, RendererProfile};
use crate::result::{ConversionMetadata, MarkdownDocument};

use self::rules::{apply_rules, default_rules, RenderState, Rule, BLOCK_MARK, EMPHASIS, LINE_BREAK};

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

pub struct MarkdownRenderer<'p> {
    profile: &'p RendererProfile,
    rules: Vec<Rule>,
    converter: HtmlToMarkdown,
}

impl<'p> MarkdownRenderer<'p> {
    pub fn new(profile: &'p Profile) -> Self {
        let converter = HtmlToMarkdown::builder()
            .options(Options {
                heading_style: HeadingStyle::Atx,
                code_block_style: CodeBlockStyle::Fenced,
                ..Default::default()
            })
            .skip_tags(vec!["script", "style", "noscript", "template"])
            .build();
        Self {
            profile: &profile.renderer,
            rules: default_rules(),
            converter,
        }
    }

    /// Add a rule. It takes precedence over every rule added before it.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Render `markup` to markdown text with a frontmatter header.
    ///
    /// Empty markup yields an empty string.
    pub fn render(&self, markup: &str, meta: &ConversionMetadata) -> Result<String, ExtractError> {
        self.render_document(markup, meta).map(|doc| doc.to_markdown())
    }

    /// Render into a [`MarkdownDocument`] stamped with the current time.
    pub fn render_document(
        &self,
        markup: &str,
        meta: &ConversionMetadata,
    ) -> Result<MarkdownDocument, ExtractError> {
        self.render_document_at(markup, meta, Utc::now())
    }

    /// Render into a [`MarkdownDocument`] stamped with `fetched_at`.
    pub fn render_document_at(
        &self,
        markup: &str,
        meta: &ConversionMetadata,
        fetched_at: DateTime<Utc>,
    ) -> Result<MarkdownDocument, ExtractError> {
        let body = self.render_body(markup, &meta.url)?;
        let title = meta
            .title()
            .unwrap_or(self.profile.fallback_title.as_str())
            .to_string();
        tracing::debug!(url = %meta.url, title = %title, bytes = body.len(), "markdown rendered");
        Ok(MarkdownDocument {
            title,
            url: meta.url.clone(),
            fetched_at,
            body,
        })
    }

    /// Convert `markup` to a markdown body, without frontmatter.
    pub fn render_body(&self, markup: &str, url: &str) -> Result<String, ExtractError> {
        if markup.trim().is_empty() {
            return Ok(String::new());
        }

        let mut state = RenderState::new(self.profile);
        let nodes = apply_rules(parse_fragment(markup), &self.rules, &mut state);
        let html = serialize_nodes(&nodes);

        let markdown = self
            .converter
            .convert(&html)
            .map_err(|e| ExtractError::render(url, "convert markdown", Some(e.into())))?;

        Ok(expand_placeholders(&markdown, &state.blocks))
    }
}

/// Render with the builtin profile.
pub fn render(markup: &str, meta: &ConversionMetadata) -> Result<String, ExtractError> {
    MarkdownRenderer::new(Profile::builtin()).render(markup, meta)
}

fn expand_placeholders(markdown: &str, blocks: &[String]) -> String {
    // Collapse before splicing blocks in; code keeps its own blank lines.
    let collapsed = BLANK_LINES.replace_all(markdown, "\n\n");
    let inline = collapsed.replace(LINE_BREAK, "<br>").replace(EMPHASIS, "*");

    let mut out = String::with_capacity(inline.len());
    for (i, line) in inline.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match expand_block(line, blocks) {
            Some(expanded) => out.push_str(&expanded),
            None => out.push_str(line),
        }
    }
    out.trim().to_string()
}

/// Replace a line holding a block token with the stored block.
///
/// The text before the token (a quote marker or list indent) prefixes the
/// first line; later lines get the same prefix with non-quote characters
/// turned into spaces. Text after the token stays on the closing line.
fn expand_block(line: &str, blocks: &[String]) -> Option<String> {
    let start = line.find(BLOCK_MARK)?;
    let rest = &line[start + BLOCK_MARK.len_utf8()..];
    let end = rest.find(BLOCK_MARK)?;
    let block = blocks.get(rest[..end].parse::<usize>().ok()?)?;
    let tail = &rest[end + BLOCK_MARK.len_utf8()..];

    let prefix = &line[..start];
    let continuation: String = prefix
        .chars()
        .map(|c| if c == '>' { '>' } else { ' ' })
        .collect();

    let mut expanded = String::new();
    for (i, block_line) in block.lines().enumerate() {
        if i > 0 {
            expanded.push('\n');
            expanded.push_str(&continuation);
        } else {
            expanded.push_str(prefix);
        }
        expanded.push_str(block_line);
    }
    expanded.push_str(tail);
    Some(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::Element;
    use crate::dom::rewrite::Rewrite;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn meta() -> ConversionMetadata {
        ConversionMetadata::new("https://example.com/doc").with_title("Test Doc")
    }

    fn body(markup: &str) -> String {
        MarkdownRenderer::new(Profile::builtin())
            .render_body(markup, "https://example.com/doc")
            .unwrap()
    }

    #[test]
    fn renders_apex_code_fence() {
        let md = body(r#"<pre><code class="language-apex">System.debug('hi');</code></pre>"#);
        assert_eq!(md, "```apex\nSystem.debug('hi');\n```");
    }

    #[test]
    fn code_keeps_markdown_characters_verbatim() {
        let md = body("<pre><code>a_b * c &lt;T&gt;</code></pre>");
        assert!(md.contains("a_b * c <T>"));
    }

    #[test]
    fn breaks_stay_inline() {
        let md = body("<p>Line 1<br>Line 2</p>");
        assert_eq!(md, "Line 1<br>Line 2");
    }

    #[test]
    fn headings_use_leading_markers() {
        let md = body("<h2>Fields</h2><p>Text</p>");
        assert!(md.starts_with("## Fields"));
    }

    #[test]
    fn callout_renders_as_labeled_quote() {
        let md = body(r#"<div class="box-tip"><p>Use bulk queries.</p></div>"#);
        assert_eq!(md, "> **Tip:** Use bulk queries.");
    }

    #[test]
    fn code_inside_callout_keeps_quote_prefix() {
        let md = body(
            r#"<div class="box-note"><p>Example:</p><pre><code>a
b</code></pre></div>"#,
        );
        assert!(md.contains("> ```\n> a\n> b\n> ```"));
    }

    #[test]
    fn empty_anchor_renders_nothing() {
        let md = body(r#"<p>Before<a href="/anchor"></a> after</p>"#);
        assert!(!md.contains("/anchor"));
        assert!(!md.contains("[]"));
    }

    #[test]
    fn emphasis_uses_single_asterisk() {
        let md = body("<p>An <em>important</em> word</p>");
        assert_eq!(md, "An *important* word");
    }

    #[test]
    fn frontmatter_precedes_body() {
        let renderer = MarkdownRenderer::new(Profile::builtin());
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let doc = renderer
            .render_document_at("<h1>Title</h1><p>Content</p>", &meta(), at)
            .unwrap();
        assert_eq!(
            doc.to_markdown(),
            "---\ntitle: \"Test Doc\"\nurl: \"https://example.com/doc\"\nfetched_at: \"2024-05-01T10:00:00.000Z\"\n---\n\n# Title\n\nContent\n"
        );
    }

    #[test]
    fn missing_title_uses_fallback() {
        let md = render("<p>x</p>", &ConversionMetadata::new("https://example.com")).unwrap();
        assert!(md.contains("title: \"Untitled\""));
    }

    #[test]
    fn empty_markup_renders_empty_string() {
        assert_eq!(render("", &meta()).unwrap(), "");
        assert_eq!(render("  \n ", &meta()).unwrap(), "");
    }

    #[test]
    fn custom_rule_overrides_builtin() {
        let renderer = MarkdownRenderer::new(Profile::builtin()).with_rule(Rule {
            name: "drop-br",
            applies: |el: &Element, _| el.is("br"),
            replace: |_, _| Rewrite::Remove,
        });
        let md = renderer.render_body("<p>a<br>b</p>", "").unwrap();
        assert_eq!(md, "ab");
    }

    #[test]
    fn block_token_expansion_uses_prefix() {
        let blocks = vec!["```\nx\ny\n```".to_string()];
        let line = format!("1. {}", rules::block_token(0));
        assert_eq!(
            expand_block(&line, &blocks).unwrap(),
            "1. ```\n   x\n   y\n   ```"
        );
        assert_eq!(expand_block("plain", &blocks), None);
    }

    #[test]
    fn block_token_keeps_trailing_text() {
        let blocks = vec!["```\nx\n```".to_string()];
        let line = format!("| {} |", rules::block_token(0));
        assert_eq!(expand_block(&line, &blocks).unwrap(), "| ```\n  x\n  ``` |");
    }

    #[test]
    fn code_keeps_consecutive_blank_lines() {
        let md = body("<pre><code>a\n\n\n\nb</code></pre><p>After</p>");
        assert_eq!(md, "```\na\n\n\n\nb\n```\n\nAfter");
    }
}
