// ABOUTME: Typed element patterns (tag, class, id, attribute) used as data by profiles.
// ABOUTME: Patterns serialize as small JSON objects and render CSS-like text for logs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dom::node::Element;

/// A single-element match condition.
///
/// Profiles store selectors as these typed patterns rather than CSS strings,
/// so they can be matched against the owned tree (including boundary content)
/// without a selector engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// `tag`
    Tag(String),
    /// `.class`
    Class(String),
    /// `[class*="fragment"]`
    ClassContains(String),
    /// `#id`
    Id(String),
    /// `[name]` or `[name="value"]`
    Attr {
        name: String,
        #[serde(default)]
        value: Option<String>,
    },
}

impl Pattern {
    pub fn tag(tag: &str) -> Self {
        Pattern::Tag(tag.to_string())
    }

    pub fn class(class: &str) -> Self {
        Pattern::Class(class.to_string())
    }

    pub fn attr(name: &str, value: &str) -> Self {
        Pattern::Attr {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }

    pub fn matches(&self, el: &Element) -> bool {
        match self {
            Pattern::Tag(tag) => el.is(tag),
            Pattern::Class(class) => el.has_class(class),
            Pattern::ClassContains(fragment) => el
                .attr("class")
                .map_or(false, |c| c.contains(fragment.as_str())),
            Pattern::Id(id) => el.attr("id") == Some(id.as_str()),
            Pattern::Attr { name, value: None } => el.attr(name).is_some(),
            Pattern::Attr {
                name,
                value: Some(value),
            } => el.attr(name) == Some(value.as_str()),
        }
    }
}

/// True when any pattern in `patterns` matches `el`.
pub fn matches_any(patterns: &[Pattern], el: &Element) -> bool {
    patterns.iter().any(|p| p.matches(el))
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Tag(tag) => write!(f, "{}", tag),
            Pattern::Class(class) => write!(f, ".{}", class),
            Pattern::ClassContains(fragment) => write!(f, "[class*=\"{}\"]", fragment),
            Pattern::Id(id) => write!(f, "#{}", id),
            Pattern::Attr { name, value: None } => write!(f, "[{}]", name),
            Pattern::Attr {
                name,
                value: Some(value),
            } => write!(f, "[{}=\"{}\"]", name, value),
        }
    }
}
