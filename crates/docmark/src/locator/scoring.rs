// ABOUTME: Heuristic candidate scoring driven by the profile's score-rule table.
// ABOUTME: Scans block-level candidates, skipping junk, and keeps the first maximum.

use crate::dom::node::{Element, Node};
use crate::profile::LocatorProfile;

/// A node under heuristic evaluation.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub element: &'a Element,
    pub score: i32,
}

/// Score `el`, or None when its text is below the length floor.
pub fn score_element(el: &Element, profile: &LocatorProfile) -> Option<i32> {
    let text = el.text();
    let text_len = text.chars().count();
    if text_len < profile.min_candidate_text_len {
        return None;
    }

    let text_lower = text.to_lowercase();
    let id_class_lower = format!(
        "{} {}",
        el.attr("id").unwrap_or(""),
        el.attr("class").unwrap_or("")
    )
    .to_lowercase();

    let score = profile
        .score_rules
        .iter()
        .filter(|rule| rule.when.holds(text_len, &text_lower, &id_class_lower))
        .map(|rule| rule.weight)
        .sum();
    Some(score)
}

/// Find the best-scoring candidate under `root`.
///
/// Candidates are the profile's `candidate_tags` in the ordinary tree.
/// Sub-trees rooted at junk elements are not entered. Ties keep the
/// first-seen candidate. Returns None unless the maximum exceeds
/// `accept_score`.
pub fn best_candidate<'a, F>(
    root: &'a Element,
    profile: &LocatorProfile,
    is_junk: F,
) -> Option<Candidate<'a>>
where
    F: Fn(&Element) -> bool,
{
    let mut best: Option<Candidate<'a>> = None;
    let mut stack: Vec<&'a Node> = root.children.iter().rev().collect();

    while let Some(node) = stack.pop() {
        let Node::Element(el) = node else {
            continue;
        };
        if is_junk(el) {
            continue;
        }
        stack.extend(el.children.iter().rev());

        if !profile.candidate_tags.iter().any(|t| el.is(t)) {
            continue;
        }
        let Some(score) = score_element(el, profile) else {
            continue;
        };
        if best.map_or(true, |b| score > b.score) {
            best = Some(Candidate { element: el, score });
        }
    }

    best.filter(|c| c.score > profile.accept_score)
}
