// ABOUTME: Pipeline orchestration: locate the content root, sanitize it, render markdown.
// ABOUTME: Only rendering can fail; locator and sanitizer problems degrade and are logged.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use url::Url;

use crate::dom::parse::Document;
use crate::error::ExtractError;
use crate::locator::BoundaryLocator;
use crate::options::{ExtractorBuilder, Options};
use crate::profile::Profile;
use crate::render::MarkdownRenderer;
use crate::result::{ConversionMetadata, MarkdownDocument};
use crate::sanitizer::ContentSanitizer;

/// Runs Locator → Sanitizer → Renderer over one document.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    opts: Options,
}

impl Extractor {
    /// Create a new ExtractorBuilder for configuring the extractor.
    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::new()
    }

    pub fn new(opts: Options) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn profile(&self) -> &Profile {
        &self.opts.profile
    }

    /// Convert a parsed document to markdown.
    ///
    /// `title` wins when non-blank; otherwise the document's `<title>`, then
    /// the configured default title.
    pub fn extract(
        &self,
        doc: &Document,
        url: &str,
        title: Option<&str>,
    ) -> Result<MarkdownDocument, ExtractError> {
        self.extract_at(doc, url, title, Utc::now())
    }

    /// [`extract`](Self::extract) with an explicit timestamp.
    pub fn extract_at(
        &self,
        doc: &Document,
        url: &str,
        title: Option<&str>,
        fetched_at: DateTime<Utc>,
    ) -> Result<MarkdownDocument, ExtractError> {
        let profile = self.profile();

        let located = BoundaryLocator::new(profile).locate(doc);
        info!(url, tier = %located.tier, tag = %located.element().name, "content root selected");

        let base = if self.opts.resolve_references {
            base_address(url)
        } else {
            None
        };
        let markup = ContentSanitizer::new(profile).clean(located.element(), base.as_ref());

        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .or_else(|| doc.title())
            .unwrap_or_else(|| self.opts.default_title().to_string());
        let meta = ConversionMetadata::new(url).with_title(title);

        MarkdownRenderer::new(profile).render_document_at(&markup, &meta, fetched_at)
    }

    /// Parse `html` and convert it.
    pub fn extract_html(&self, html: &str, url: &str) -> Result<MarkdownDocument, ExtractError> {
        let doc = Document::parse(html);
        self.extract(&doc, url, None)
    }
}

fn base_address(url: &str) -> Option<Url> {
    match Url::parse(url) {
        Ok(base) => Some(base),
        Err(e) => {
            warn!(url, error = %e, "page address is not absolute; references left as-is");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn caller_title_wins() {
        let doc = Document::parse("<title>Page</title><main><p>Body</p></main>");
        let md = Extractor::default()
            .extract_at(&doc, "https://example.com/doc", Some("Given"), at())
            .unwrap();
        assert_eq!(md.title, "Given");
    }

    #[test]
    fn document_title_then_default() {
        let doc = Document::parse("<title> Page </title><main><p>Body</p></main>");
        let md = Extractor::default()
            .extract_at(&doc, "https://example.com/doc", Some("  "), at())
            .unwrap();
        assert_eq!(md.title, "Page");

        let doc = Document::parse("<main><p>Body</p></main>");
        let md = Extractor::default()
            .extract_at(&doc, "https://example.com/doc", None, at())
            .unwrap();
        assert_eq!(md.title, "Salesforce Documentation");
    }

    #[test]
    fn relative_links_resolve_against_page() {
        let md = Extractor::default()
            .extract_html(
                r#"<main><p>See <a href="../api/test.html">the API</a>.</p></main>"#,
                "https://example.com/doc",
            )
            .unwrap();
        assert!(md.body.contains("(https://example.com/api/test.html)"));
    }

    #[test]
    fn resolution_can_be_disabled() {
        let md = Extractor::builder()
            .resolve_references(false)
            .build()
            .extract_html(
                r#"<main><p>See <a href="../api/test.html">the API</a>.</p></main>"#,
                "https://example.com/doc",
            )
            .unwrap();
        assert!(md.body.contains("(../api/test.html)"));
    }

    #[test]
    fn non_absolute_address_is_tolerated() {
        let md = Extractor::default()
            .extract_html(r#"<main><a href="x.html">X</a></main>"#, "not a url")
            .unwrap();
        assert!(md.body.contains("x.html"));
    }
}
