// ABOUTME: Conversion metadata and the rendered markdown document with its frontmatter header.
// ABOUTME: Serializable for JSON output; Display yields the final markdown text.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Page metadata supplied alongside the cleaned markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionMetadata {
    pub title: Option<String>,
    pub url: String,
}

impl ConversionMetadata {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            title: None,
            url: url.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The trimmed title, or None when absent or blank.
    pub fn title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// A rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownDocument {
    pub title: String,
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    /// Markdown body without the frontmatter header.
    pub body: String,
}

impl MarkdownDocument {
    /// True when there is no body; such documents render as an empty string.
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Timestamp in RFC 3339 with millisecond precision.
    pub fn timestamp(&self) -> String {
        self.fetched_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// The header block, including the trailing blank line.
    pub fn frontmatter(&self) -> String {
        format!(
            "---\ntitle: \"{}\"\nurl: \"{}\"\nfetched_at: \"{}\"\n---\n\n",
            escape_value(&self.title),
            escape_value(&self.url),
            self.timestamp()
        )
    }

    /// Frontmatter followed by the body, or `""` for an empty document.
    pub fn to_markdown(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let mut out = self.frontmatter();
        out.push_str(self.body.trim_end());
        out.push('\n');
        out
    }

    /// Download name derived from the timestamp, e.g. `doc-2024-05-01T10-00-00-000Z.md`.
    pub fn suggested_filename(&self) -> String {
        let stamp: String = self
            .timestamp()
            .chars()
            .map(|c| if c == ':' || c == '.' { '-' } else { c })
            .collect();
        format!("doc-{}.md", stamp)
    }
}

impl fmt::Display for MarkdownDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markdown())
    }
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' | '\r' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}
