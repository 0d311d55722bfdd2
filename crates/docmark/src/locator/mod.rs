// ABOUTME: Tiered content locator: boundary search, direct selectors, heuristic scan, body fallback.
// ABOUTME: Never fails; tier errors are logged and treated as a miss.

//! Content location.
//!
//! [`BoundaryLocator::locate`] walks four tiers in order and returns the first
//! success:
//!
//! 1. vendor boundary search through nested attached sub-trees,
//! 2. direct semantic selectors,
//! 3. heuristic scoring of block-level candidates,
//! 4. the document body.
//!
//! Content found inside a boundary is returned as a flattened, owned copy;
//! everything else borrows from the live document.

pub mod boundary;
pub mod scoring;

use std::borrow::Cow;
use std::fmt;

use tracing::{debug, info, warn};

use crate::dom::node::Element;
use crate::dom::parse::Document;
use crate::error::TraversalError;
use crate::profile::{LocatorProfile, PhraseSet, Profile, SanitizerProfile};

use self::boundary::{contains_boundary, find_deep, find_within, flatten, DeepMatch};
use self::scoring::best_candidate;

/// The tier that produced a located root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Boundary,
    Direct,
    Heuristic,
    Fallback,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Boundary => "boundary",
            Tier::Direct => "direct",
            Tier::Heuristic => "heuristic",
            Tier::Fallback => "fallback",
        };
        write!(f, "{}", s)
    }
}

/// The chosen content root.
#[derive(Debug, Clone)]
pub struct Located<'a> {
    pub node: Cow<'a, Element>,
    pub tier: Tier,
}

impl Located<'_> {
    pub fn element(&self) -> &Element {
        &self.node
    }

    /// True when the root is a flattened copy rather than a live node.
    pub fn is_flattened(&self) -> bool {
        matches!(self.node, Cow::Owned(_))
    }
}

/// Finds the primary content root of a document.
#[derive(Debug, Clone)]
pub struct BoundaryLocator<'p> {
    profile: &'p LocatorProfile,
    junk: &'p SanitizerProfile,
    noise: PhraseSet,
}

impl<'p> BoundaryLocator<'p> {
    pub fn new(profile: &'p Profile) -> Self {
        Self {
            profile: &profile.locator,
            junk: &profile.sanitizer,
            noise: PhraseSet::new(&profile.locator.noise_phrases),
        }
    }

    /// Locate the content root. Always returns a node.
    pub fn locate<'a>(&self, doc: &'a Document) -> Located<'a> {
        match self.boundary_tier(doc) {
            Ok(Some(node)) => {
                info!(tier = %Tier::Boundary, flattened = matches!(node, Cow::Owned(_)), "content located");
                return Located {
                    node,
                    tier: Tier::Boundary,
                };
            }
            Ok(None) => debug!(tier = %Tier::Boundary, "tier missed"),
            Err(e) => warn!(tier = %Tier::Boundary, error = %e, "tier failed"),
        }

        if let Some(el) = self.direct_tier(doc) {
            return Located {
                node: Cow::Borrowed(el),
                tier: Tier::Direct,
            };
        }
        debug!(tier = %Tier::Direct, "tier missed");

        if let Some(candidate) = best_candidate(doc.root(), self.profile, |el| self.junk.is_junk(el))
        {
            info!(
                tier = %Tier::Heuristic,
                tag = %candidate.element.name,
                score = candidate.score,
                "content located"
            );
            return Located {
                node: Cow::Borrowed(candidate.element),
                tier: Tier::Heuristic,
            };
        }
        debug!(tier = %Tier::Heuristic, "tier missed");

        info!(tier = %Tier::Fallback, "falling back to document body");
        Located {
            node: Cow::Borrowed(doc.body().unwrap_or_else(|| doc.root())),
            tier: Tier::Fallback,
        }
    }

    /// Tier 1: resolve the host chain through nested boundaries, then the
    /// inner content marker inside the deepest host.
    fn boundary_tier<'a>(
        &self,
        doc: &'a Document,
    ) -> Result<Option<Cow<'a, Element>>, TraversalError> {
        let mut host: Option<DeepMatch<'a>> = None;
        for pattern in &self.profile.boundary_hosts {
            let found = match host {
                None => find_deep(&doc.root().children, pattern)?,
                Some(current) => find_within(current.element, pattern, current.in_boundary)?,
            };
            match found {
                Some(m) => host = Some(m),
                None => {
                    debug!(marker = %pattern, "boundary host not found");
                    return Ok(None);
                }
            }
        }
        let Some(host) = host else {
            return Ok(None);
        };

        for pattern in &self.profile.boundary_content {
            if let Some(m) = find_within(host.element, pattern, host.in_boundary)? {
                debug!(marker = %pattern, in_boundary = m.in_boundary, "boundary content found");
                return materialize(m).map(Some);
            }
        }

        debug!(host = %host.element.name, "no inner content marker; flattening host");
        let flat = flatten(host.element)?;
        if flat.text().trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(Cow::Owned(flat)))
    }

    /// Tier 2: first direct selector with enough text that is not noise,
    /// then any landmark with non-empty text.
    fn direct_tier<'a>(&self, doc: &'a Document) -> Option<&'a Element> {
        let root = doc.root();
        let passes = [
            (&self.profile.direct_selectors, self.profile.min_direct_text_len),
            (&self.profile.landmark_selectors, 1),
        ];
        for (selectors, min_len) in passes {
            for pattern in selectors.iter() {
                let Some(el) = root.query(pattern) else {
                    continue;
                };
                if self.validate(el, min_len) {
                    info!(tier = %Tier::Direct, selector = %pattern, "content located");
                    return Some(el);
                }
                debug!(selector = %pattern, "direct match rejected");
            }
        }
        None
    }

    fn validate(&self, el: &Element, min_len: usize) -> bool {
        let text = el.text();
        let trimmed = text.trim();
        if trimmed.chars().count() < min_len {
            return false;
        }
        !self.is_noise(el, trimmed)
    }

    fn is_noise(&self, el: &Element, text: &str) -> bool {
        self.junk.is_junk(el) || self.noise.is_match(text)
    }
}

/// Borrow a live match, or flatten it when boundaries are involved.
fn materialize(m: DeepMatch<'_>) -> Result<Cow<'_, Element>, TraversalError> {
    if m.in_boundary || contains_boundary(m.element) {
        Ok(Cow::Owned(flatten(m.element)?))
    } else {
        Ok(Cow::Borrowed(m.element))
    }
}

/// Locate with the builtin profile.
pub fn locate(doc: &Document) -> Located<'_> {
    BoundaryLocator::new(Profile::builtin()).locate(doc)
}
