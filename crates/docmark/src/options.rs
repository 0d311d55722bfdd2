// ABOUTME: Configuration for the extraction pipeline: Options and the fluent ExtractorBuilder.
// ABOUTME: Holds the active Profile plus per-call defaults such as the fallback title.

use std::path::Path;

use crate::error::ExtractError;
use crate::pipeline::Extractor;
use crate::profile::Profile;

/// Configuration options for an [`Extractor`].
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub profile: Profile,
    /// Title used when neither the caller nor the document supplies one.
    /// Falls back to the profile's `default_title` when unset.
    pub default_title: Option<String>,
    /// Rewrite relative links and images against the page address.
    pub resolve_references: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            default_title: None,
            resolve_references: true,
        }
    }
}

impl Options {
    /// The effective default title.
    pub fn default_title(&self) -> &str {
        self.default_title
            .as_deref()
            .unwrap_or(self.profile.default_title.as_str())
    }
}

/// Builder for constructing Extractor instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ExtractorBuilder {
    opts: Options,
}

impl ExtractorBuilder {
    /// Create a new ExtractorBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom profile.
    pub fn profile(mut self, profile: Profile) -> Self {
        self.opts.profile = profile;
        self
    }

    /// Load the profile from a JSON file.
    pub fn profile_file(self, path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ExtractError::config(
                format!("read profile {}", path.display()),
                Some(anyhow::Error::new(e)),
            )
        })?;
        Ok(self.profile(Profile::from_json(&json)?))
    }

    /// Set the title used when the page has none.
    pub fn default_title(mut self, title: impl Into<String>) -> Self {
        self.opts.default_title = Some(title.into());
        self
    }

    /// Enable or disable reference resolution.
    pub fn resolve_references(mut self, enabled: bool) -> Self {
        self.opts.resolve_references = enabled;
        self
    }

    /// Build the Extractor with the configured options.
    pub fn build(self) -> Extractor {
        Extractor::new(self.opts)
    }
}
