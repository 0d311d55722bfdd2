// ABOUTME: End-to-end tests for the locate → sanitize → render pipeline.
// ABOUTME: Covers landmark selection, boundary flattening, code fences, table cells and frontmatter.

use chrono::{TimeZone, Utc};
use docmark::dom::Pattern;
use docmark::locator::boundary::flatten;
use docmark::{
    locator, sanitizer, ConversionMetadata, Document, Extractor, MarkdownRenderer, Profile, Tier,
};
use pretty_assertions::assert_eq;

const PAGE_URL: &str = "https://developer.salesforce.com/docs/atlas.en-us.apexref.meta/apexref/intro.htm";

#[test]
fn main_landmark_beats_navigation_header() {
    let doc = Document::parse(
        r#"<header id="nav">Navigation</header><main>Primary documentation content</main>"#,
    );
    let located = locator::locate(&doc);
    assert_eq!(located.tier, Tier::Direct);

    let md = docmark::extract(&doc, "https://example.com/doc", None).unwrap();
    assert!(md.body.contains("Primary documentation content"));
    assert!(!md.body.contains("Navigation"));
}

#[test]
fn flattening_exposes_boundary_content() {
    let doc = Document::parse(
        r#"<div id="host"><template shadowrootmode="open"><span>Inner content</span></template></div>"#,
    );
    let host = doc.root().query(&Pattern::attr("id", "host")).unwrap();
    let flat = flatten(host).unwrap();
    assert!(flat.text().contains("Inner content"));
    assert!(flat.boundary.is_none());
}

#[test]
fn apex_code_renders_as_tagged_fence() {
    let md = docmark::render::render(
        r#"<pre><code class="language-apex">System.debug('hi');</code></pre>"#,
        &ConversionMetadata::new("https://example.com/doc").with_title("Code"),
    )
    .unwrap();
    assert!(md.contains("```apex\nSystem.debug('hi');\n```"));
}

#[test]
fn definition_list_in_cell_is_flattened() {
    let doc = Document::parse(
        "<main><table><tr><td><dl><dt>Type</dt><dd>String</dd></dl></td></tr></table></main>",
    );
    let main = doc.root().query(&Pattern::tag("main")).unwrap();
    let html = sanitizer::clean(main, None);
    assert!(html.contains("<strong>Type:</strong>"));
    assert!(html.contains("String<br>"));
    assert!(!html.contains("<dl>"));
}

#[test]
fn definition_term_renders_as_bold_before_description() {
    let md = Extractor::default()
        .extract_html(
            "<main><table><tr><th>Field</th><th>Details</th></tr><tr><td>x</td><td><dl><dt>Type</dt><dd>String</dd></dl></td></tr></table></main>",
            "https://example.com/doc",
        )
        .unwrap();
    assert!(md.body.contains("**Type:** String<br>"), "{}", md.body);
}

#[test]
fn open_boundary_inside_main_is_inlined() {
    let doc = Document::parse(
        r#"<html><head><title>Widgets</title></head><body>
<nav>Menu</nav>
<main>
  <h1>Widget Guide</h1>
  <doc-widget><template shadowrootmode="open">
    <p>Widget body text</p>
    <pre><code class="language-apex">Integer i = 0;</code></pre>
  </template><p>fallback</p></doc-widget>
</main>
</body></html>"#,
    );
    let located = locator::locate(&doc);
    assert_eq!(located.tier, Tier::Direct);
    assert!(located.element().is("main"));

    let md = docmark::extract(&doc, "https://example.com/doc", None).unwrap();
    assert_eq!(md.title, "Widgets");
    assert!(md.body.starts_with("# Widget Guide"));
    assert!(md.body.contains("Widget body text"));
    assert!(md.body.contains("```apex\nInteger i = 0;\n```"));
    assert!(!md.body.contains("fallback"));
    assert!(!md.body.contains("Menu"));
}

#[test]
fn breadcrumb_span_keeps_page_body() {
    let md = Extractor::default()
        .extract_html(
            "<main><div><span>You are here: Home</span><p>Real documentation body</p></div></main>",
            "https://example.com/doc",
        )
        .unwrap();
    assert_eq!(md.body, "Real documentation body");
}

#[test]
fn frontmatter_and_body() {
    let renderer = MarkdownRenderer::new(Profile::builtin());
    let meta = ConversionMetadata::new("https://example.com/doc").with_title("Test Doc");
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    let md = renderer
        .render_document_at("<h1>Title</h1><p>Content</p>", &meta, at)
        .unwrap()
        .to_markdown();
    assert!(md.starts_with("---\n"));
    assert!(md.contains("title: \"Test Doc\""));
    assert!(md.contains("url: \"https://example.com/doc\""));
    assert!(md.contains("fetched_at: \"2024-05-01T10:00:00.000Z\""));
    assert!(md.contains("Content"));

    assert_eq!(renderer.render("", &meta).unwrap(), "");
}

#[test]
fn nested_boundary_page_end_to_end() {
    let html = r#"<!DOCTYPE html>
<html>
<head><title>Apex Reference Guide</title></head>
<body>
<div class="site-header">Salesforce Developers</div>
<doc-xml-content><template shadowrootmode="open">
  <doc-content><template shadowrootmode="open">
    <div class="main-container">
      <h1>Apex Reference</h1>
      <div class="breadcrumbs">Home</div>
      <p>Read the <a href="guide.htm" title="Guide">guide</a> first.</p>
      <div class="box-note"><p>Limits apply per transaction.</p></div>
      <pre><code class="language-apex">Integer i = 0;</code></pre>
      <h2>See Also</h2>
      <ul><li><a href="other.htm">Other</a></li></ul>
    </div>
  </template></doc-content>
</template></doc-xml-content>
</body>
</html>"#;

    let doc = Document::parse(html);
    assert_eq!(locator::locate(&doc).tier, Tier::Boundary);

    let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    let md = Extractor::default()
        .extract_at(&doc, PAGE_URL, None, at)
        .unwrap();

    assert_eq!(md.title, "Apex Reference Guide");
    assert!(md.body.starts_with("# Apex Reference"));
    assert!(md.body.contains(
        "[guide](https://developer.salesforce.com/docs/atlas.en-us.apexref.meta/apexref/guide.htm)"
    ));
    assert!(md.body.contains("> **Note:** Limits apply per transaction."));
    assert!(md.body.contains("```apex\nInteger i = 0;\n```"));
    assert!(!md.body.contains("Salesforce Developers"));
    assert!(!md.body.contains("Home"));
    assert!(!md.body.contains("See Also"));
    assert!(!md.body.contains("other.htm"));
}

#[test]
fn capability_table_renders_as_quote() {
    let md = Extractor::default()
        .extract_html(
            r#"<main><h1>Bulk API</h1><table class="featureTable"><tr><td>Available in: Enterprise, Unlimited</td></tr></table></main>"#,
            "https://example.com/doc",
        )
        .unwrap();
    assert!(md.body.contains("> **Availability:**"));
    assert!(md.body.contains("> Available in: Enterprise, Unlimited"));
}

#[test]
fn table_cells_keep_inline_breaks() {
    let md = Extractor::default()
        .extract_html(
            "<main><table><tr><th>Field</th><th>Details</th></tr><tr><td>Name</td><td><ul><li>Item A</li><li>Item B</li></ul></td></tr></table></main>",
            "https://example.com/doc",
        )
        .unwrap();
    assert!(md.body.contains("• Item A<br>• Item B<br>"));
}

#[test]
fn empty_page_yields_empty_markdown() {
    let md = docmark::extract(
        &Document::parse("<html><body></body></html>"),
        "https://example.com/doc",
        Some("Nothing"),
    )
    .unwrap();
    assert!(md.is_empty());
    assert_eq!(md.to_markdown(), "");
}
