// ABOUTME: Site profile: selector lists, score tables, thresholds and vocabularies as serde data.
// ABOUTME: The builtin profile is embedded from data/builtin_profile.json; custom profiles load from JSON.

//! Extraction profiles.
//!
//! Everything the locator, sanitizer and renderer treat as fixed configuration
//! lives here as plain data. Heuristic scoring is a table of
//! [`ScoreRule`]s, so rules can be added without touching traversal code.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::dom::node::Element;
use crate::dom::pattern::{matches_any, Pattern};
use crate::error::ExtractError;

/// Embedded JSON for the builtin documentation-site profile.
const BUILTIN_PROFILE_JSON: &str = include_str!("../data/builtin_profile.json");

static BUILTIN: Lazy<Profile> = Lazy::new(|| {
    Profile::from_json(BUILTIN_PROFILE_JSON).expect("failed to parse builtin profile")
});

/// Complete configuration for one extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    /// Title used by the pipeline when the document has none.
    pub default_title: String,
    pub locator: LocatorProfile,
    pub sanitizer: SanitizerProfile,
    pub renderer: RendererProfile,
}

/// Locator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorProfile {
    /// Chain of boundary hosts; each is searched inside the previous one.
    #[serde(default)]
    pub boundary_hosts: Vec<Pattern>,
    /// Inner content markers tried in order inside the last host.
    #[serde(default)]
    pub boundary_content: Vec<Pattern>,
    pub direct_selectors: Vec<Pattern>,
    /// Selectors accepted with any non-empty text when no direct match is long enough.
    #[serde(default)]
    pub landmark_selectors: Vec<Pattern>,
    pub min_direct_text_len: usize,
    #[serde(default)]
    pub noise_phrases: Vec<String>,
    pub candidate_tags: Vec<String>,
    pub min_candidate_text_len: usize,
    pub accept_score: i32,
    pub score_rules: Vec<ScoreRule>,
}

/// One `{predicate, weight}` entry of the heuristic score table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRule {
    pub when: RuleCondition,
    pub weight: i32,
}

/// Predicates available to score rules. Text comparisons are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCondition {
    TextLongerThan(usize),
    TextContains(String),
    IdOrClassContains(String),
}

impl RuleCondition {
    /// Evaluate against pre-lowercased text, id and class.
    pub fn holds(&self, text_len: usize, text_lower: &str, id_class_lower: &str) -> bool {
        match self {
            RuleCondition::TextLongerThan(n) => text_len > *n,
            RuleCondition::TextContains(needle) => text_lower.contains(&needle.to_lowercase()),
            RuleCondition::IdOrClassContains(needle) => {
                id_class_lower.contains(&needle.to_lowercase())
            }
        }
    }
}

/// Sanitizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitizerProfile {
    pub junk_tags: Vec<String>,
    pub junk_selectors: Vec<Pattern>,
    #[serde(default)]
    pub boilerplate_headings: Vec<String>,
    #[serde(default)]
    pub boilerplate_prefixes: Vec<String>,
    #[serde(default)]
    pub icon_vocabulary: Vec<String>,
    #[serde(default)]
    pub tooltip_attrs: Vec<String>,
    #[serde(default)]
    pub capability_classes: Vec<String>,
    #[serde(default)]
    pub capability_phrases: Vec<String>,
    pub capability_label: String,
}

impl SanitizerProfile {
    /// Junk classifier: blacklisted tag or blacklisted selector.
    pub fn is_junk(&self, el: &Element) -> bool {
        self.junk_tags.iter().any(|t| el.is(t)) || matches_any(&self.junk_selectors, el)
    }
}

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererProfile {
    pub fallback_title: String,
    #[serde(default)]
    pub callout_markers: Vec<String>,
    #[serde(default)]
    pub callout_labels: Vec<CalloutLabel>,
    pub default_callout_label: String,
}

impl RendererProfile {
    /// Label for a callout container, or None when `class` carries no marker.
    pub fn callout_label(&self, class: &str) -> Option<&str> {
        if !self.callout_markers.iter().any(|m| class.contains(m.as_str())) {
            return None;
        }
        let label = self
            .callout_labels
            .iter()
            .find(|l| class.contains(l.marker.as_str()))
            .map(|l| l.label.as_str())
            .unwrap_or(self.default_callout_label.as_str());
        Some(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalloutLabel {
    pub marker: String,
    pub label: String,
}

impl Profile {
    /// The builtin profile, parsed once.
    ///
    /// # Panics
    ///
    /// Panics if the embedded JSON is malformed.
    pub fn builtin() -> &'static Profile {
        &BUILTIN
    }

    /// Parse a profile from JSON text.
    pub fn from_json(json: &str) -> Result<Profile, ExtractError> {
        serde_json::from_str(json)
            .map_err(|e| ExtractError::config("parse profile", Some(anyhow::Error::new(e))))
    }
}

impl Default for Profile {
    fn default() -> Self {
        Profile::builtin().clone()
    }
}

/// Case-insensitive multi-phrase matcher.
#[derive(Debug, Clone)]
pub struct PhraseSet {
    matcher: Option<AhoCorasick>,
}

impl PhraseSet {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases: Vec<String> = phrases
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if phrases.is_empty() {
            return Self { matcher: None };
        }
        let matcher = match AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&phrases)
        {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(error = %e, "failed to build phrase matcher; phrases ignored");
                None
            }
        };
        Self { matcher }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.as_ref().map_or(false, |m| m.is_match(text))
    }
}
