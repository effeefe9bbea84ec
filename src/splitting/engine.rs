//! The recursive subsection splitter.
//!
//! One engine serves every jurisdiction: the profile supplies per-depth
//! marker-style priorities and cleanup hooks, the engine does the rest.
//! Splitting is pure and stateless; the same text always yields the same
//! tree.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::profile::{profile_for, MarkerProfile};
use super::style::{roman_value, Marker, MarkerStyle};
use crate::config::MAX_NESTING_DEPTH;
use crate::types::Subsection;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static BOLD_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\*\*([^*]{1,80})\*\*\s*").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static COLON_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Z][^:.\n]{0,59}):\s+").expect("valid regex"));

/// Splits raw section text into a nested [`Subsection`] tree.
pub struct SplitEngine {
    profile: &'static MarkerProfile,
}

impl SplitEngine {
    /// Create an engine from an explicit profile.
    #[must_use]
    pub fn new(profile: &'static MarkerProfile) -> Self {
        Self { profile }
    }

    /// Create an engine for a jurisdiction, falling back to the default
    /// profile when the jurisdiction has no bespoke table.
    #[must_use]
    pub fn for_jurisdiction(jurisdiction: &str) -> Self {
        Self::new(profile_for(jurisdiction))
    }

    /// Split `text` into the section's own leading text plus its subsections.
    ///
    /// The returned string is the text before the first top-level marker;
    /// when no marker style matches at all it is the whole (cleaned) text
    /// and the subsection list is empty.
    #[must_use]
    pub fn split(&self, text: &str) -> (String, Vec<Subsection>) {
        let cleaned = self.profile.clean(text);
        self.build_nodes(&cleaned, 0)
    }

    /// Recursive worker: returns the span's direct text (before the first
    /// marker) and the subsections built from the rest.
    fn build_nodes(&self, text: &str, depth: usize) -> (String, Vec<Subsection>) {
        if depth >= MAX_NESTING_DEPTH {
            // Structure deeper than the cap is flattened into direct text.
            debug!(depth, "nesting depth cap reached, flattening remainder");
            return (text.trim().to_string(), Vec::new());
        }

        let Some((_, markers)) = self.select_style(text, depth) else {
            return (text.trim().to_string(), Vec::new());
        };

        let prefix = text[..markers[0].start].trim().to_string();
        let mut nodes = Vec::new();

        for (i, marker) in markers.iter().enumerate() {
            let end = markers.get(i + 1).map_or(text.len(), |next| next.start);
            let chunk = &text[marker.content_start..end];

            let (mut own_text, children) = self.build_nodes(chunk, depth + 1);

            let mut heading = None;
            if self.profile.detect_headings {
                let (found, rest) = extract_heading(&own_text);
                heading = found;
                own_text = rest;
            }

            // A marker that captured nothing never yields a node.
            if own_text.is_empty() && children.is_empty() && heading.is_none() {
                debug!(
                    identifier = %marker.identifier,
                    depth,
                    "dropping empty chunk"
                );
                continue;
            }

            let mut node = Subsection::new(marker.identifier.clone(), own_text);
            if let Some(heading) = heading {
                node = node.with_heading(heading);
            }
            nodes.push(node.with_children(children));
        }

        (prefix, nodes)
    }

    /// Pick the marker style for this span at this depth.
    ///
    /// First style in the profile's priority order with at least one
    /// boundary-valid occurrence wins, except that a letter style yields to
    /// a roman style matching at the same position when the roman reading
    /// is sustained for at least two consecutive markers (telling "(i)" the
    /// roman numeral apart from "(i)" the letter after "(h)").
    fn select_style(&self, text: &str, depth: usize) -> Option<(MarkerStyle, Vec<Marker>)> {
        let mut candidates: Vec<(MarkerStyle, Vec<Marker>)> = self
            .profile
            .styles_at(depth)
            .iter()
            .map(|style| {
                let markers = filter_roman_collisions(*style, style.find_markers(text), text);
                (*style, markers)
            })
            .filter(|(_, markers)| !markers.is_empty())
            .collect();

        if candidates.is_empty() {
            return None;
        }
        if candidates.len() == 1 {
            return candidates.pop();
        }

        let winner = resolve_ambiguity(&candidates);
        let (style, markers) = candidates.swap_remove(winner);

        let losers: Vec<&MarkerStyle> = candidates.iter().map(|(s, _)| s).collect();
        if winner != 0 || candidates.iter().any(|(_, m)| m[0].start == markers[0].start) {
            warn!(
                depth,
                chosen = ?style,
                also_matched = ?losers,
                "multiple marker styles matched, ambiguity resolved"
            );
        }

        Some((style, markers))
    }
}

/// Index of the winning candidate among two or more matching styles.
fn resolve_ambiguity(candidates: &[(MarkerStyle, Vec<Marker>)]) -> usize {
    let roman = candidates
        .iter()
        .position(|(s, _)| matches!(s, MarkerStyle::LowerRoman | MarkerStyle::UpperRoman));
    let alpha = candidates
        .iter()
        .position(|(s, _)| matches!(s, MarkerStyle::LowerAlpha | MarkerStyle::UpperAlpha));

    if let (Some(roman), Some(alpha)) = (roman, alpha) {
        let (_, roman_markers) = &candidates[roman];
        let (_, alpha_markers) = &candidates[alpha];
        if roman_markers[0].start == alpha_markers[0].start {
            // Roman wins only when the roman reading holds for two
            // consecutive markers; a lone "(i)" is a letter.
            let sustained = roman_run_positions(roman_markers).contains(&roman_markers[0].start);
            return if sustained { roman } else { alpha };
        }
    }

    // Priority-order default for every other tie.
    0
}

/// Marker positions covered by a sustained roman reading: two or more
/// markers in a row whose roman values are consecutive.
fn roman_run_positions(markers: &[Marker]) -> HashSet<usize> {
    let mut positions = HashSet::new();
    for pair in markers.windows(2) {
        let values = (
            roman_value(&pair[0].identifier),
            roman_value(&pair[1].identifier),
        );
        if let (Some(a), Some(b)) = values {
            if b == a + 1 {
                positions.insert(pair[0].start);
                positions.insert(pair[1].start);
            }
        }
    }
    positions
}

/// Drop letter markers that sit where a sustained roman sequence matches.
///
/// A letter style applied high in the tree would otherwise swallow roman
/// markers belonging to a deeper level, since "(i)" is also a well-formed
/// letter marker.
fn filter_roman_collisions(
    style: MarkerStyle,
    mut markers: Vec<Marker>,
    text: &str,
) -> Vec<Marker> {
    let roman = match style {
        MarkerStyle::LowerAlpha => MarkerStyle::LowerRoman,
        MarkerStyle::UpperAlpha => MarkerStyle::UpperRoman,
        _ => return markers,
    };
    let positions = roman_run_positions(&roman.find_markers(text));
    if !positions.is_empty() {
        markers.retain(|m| !positions.contains(&m.start));
    }
    markers
}

/// Pull an inline heading off the front of a chunk's direct text.
///
/// Recognizes a boldfaced lead (`**Definitions**`) or a short
/// colon-terminated lead (`Definitions: ...`); everything else is left as
/// ordinary text.
fn extract_heading(text: &str) -> (Option<String>, String) {
    if let Some(caps) = BOLD_HEADING.captures(text) {
        if let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) {
            let rest = text[whole.end()..].trim().to_string();
            return (Some(inner.as_str().trim().to_string()), rest);
        }
    }
    if let Some(caps) = COLON_HEADING.captures(text) {
        if let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) {
            let rest = text[whole.end()..].trim().to_string();
            return (Some(inner.as_str().trim().to_string()), rest);
        }
    }
    (None, text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn engine(jurisdiction: &str) -> SplitEngine {
        SplitEngine::for_jurisdiction(jurisdiction)
    }

    #[test]
    fn test_two_level_split() {
        let text = "(a) First rule. (1) Sub one. (2) Sub two. (b) Second rule.";
        let (lead, subs) = engine("us").split(text);

        assert_eq!(lead, "");
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].identifier, "a");
        assert_eq!(subs[0].text, "First rule.");
        assert_eq!(subs[0].children.len(), 2);
        assert_eq!(subs[0].children[0].identifier, "1");
        assert_eq!(subs[0].children[0].text, "Sub one.");
        assert_eq!(subs[0].children[1].identifier, "2");
        assert_eq!(subs[1].identifier, "b");
        assert_eq!(subs[1].text, "Second rule.");
        assert!(subs[1].children.is_empty());
    }

    #[test]
    fn test_leading_text_belongs_to_parent() {
        let text = "This section applies statewide. (a) First. (b) Second.";
        let (lead, subs) = engine("us").split(text);
        assert_eq!(lead, "This section applies statewide.");
        assert_eq!(subs.len(), 2);
    }

    #[test]
    fn test_no_markers_yields_flat_text() {
        let text = "A flat section with no subsection structure at all.";
        let (lead, subs) = engine("us").split(text);
        assert_eq!(lead, text);
        assert!(subs.is_empty());
    }

    #[test]
    fn test_empty_chunks_dropped() {
        let text = "(a) (b) Actual content.";
        let (_, subs) = engine("us").split(text);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].identifier, "b");
    }

    #[test]
    fn test_source_order_preserved_not_sorted() {
        // New York interleaves suffixed identifiers; order is occurrence order.
        let text = "1. First.\n1-a. Inserted later.\n2. Second.";
        let (_, subs) = engine("us-ny").split(text);
        let ids: Vec<&str> = subs.iter().map(|s| s.identifier.as_str()).collect();
        assert_eq!(ids, vec!["1", "1-a", "2"]);
    }

    #[test]
    fn test_roman_wins_with_two_consecutive() {
        // Depth 2 of the default stack prefers UpperAlpha, then LowerRoman;
        // depth 3 sees lone lowercase markers. Two consecutive roman-valid
        // markers force the roman reading.
        let text = "(a) Lead. (1) Sub. (A) Deep. (i) one (ii) two";
        let (_, subs) = engine("us").split(text);
        let deep = &subs[0].children[0].children[0];
        assert_eq!(deep.identifier, "A");
        let ids: Vec<&str> = deep.children.iter().map(|s| s.identifier.as_str()).collect();
        assert_eq!(ids, vec!["i", "ii"]);
    }

    #[test]
    fn test_letter_i_after_h_stays_alpha() {
        let text = "(g) Gee. (h) Aitch. (i) Eye. (j) Jay.";
        let (_, subs) = engine("us").split(text);
        let ids: Vec<&str> = subs.iter().map(|s| s.identifier.as_str()).collect();
        assert_eq!(ids, vec!["g", "h", "i", "j"]);
    }

    #[test]
    fn test_depth_capped_and_flattened() {
        // Six levels of structure; the sixth is flattened into level five.
        let text = "(a) L1. (1) L2. (A) L3. (i) L4a. (ii) L4b. \
                    (I) L5a. (II) L5b. (1.1) L6 flattened.";
        let (_, subs) = engine("us").split(text);

        assert_eq!(subs.len(), 1);
        let mut node = &subs[0];
        while let Some(last) = node.children.last() {
            node = last;
        }
        assert!(node.text.contains("L6 flattened."));
        assert!(subs[0].depth() <= crate::config::MAX_NESTING_DEPTH);
    }

    #[test]
    fn test_suffixed_identifier_atomic() {
        let text = "(1) One. (1-A) One-A. (2) Two.";
        let (_, subs) = engine("us-ny").split(text);
        let ids: Vec<&str> = subs.iter().map(|s| s.identifier.as_str()).collect();
        assert_eq!(ids, vec!["1", "1-A", "2"]);
        assert!(subs[1].children.is_empty());
    }

    #[test]
    fn test_named_ordinal_with_headings() {
        let text = "Subd. 1. Scope: This chapter applies to individuals.\nSubd. 2. Definitions: Terms have the meanings given.";
        let (_, subs) = engine("us-mn").split(text);
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].identifier, "1");
        assert_eq!(subs[0].heading.as_deref(), Some("Scope"));
        assert_eq!(subs[0].text, "This chapter applies to individuals.");
        assert_eq!(subs[1].heading.as_deref(), Some("Definitions"));
    }

    #[test]
    fn test_bold_heading_extracted() {
        let (heading, rest) = extract_heading("**Definitions** Terms apply.");
        assert_eq!(heading.as_deref(), Some("Definitions"));
        assert_eq!(rest, "Terms apply.");
    }

    #[test]
    fn test_heading_not_extracted_from_prose() {
        // No colon within the length bound, no bold lead.
        let (heading, rest) =
            extract_heading("the department shall adopt rules under this part.");
        assert!(heading.is_none());
        assert_eq!(rest, "the department shall adopt rules under this part.");
    }

    #[test]
    fn test_sibling_branches_reselect_styles() {
        // One branch uses digits for its children, the sibling uses letters;
        // each branch is evaluated from its own text.
        let text = "(a) Lead. (1) One. (2) Two. (b) Lead. (A) Aye. (B) Bee.";
        let (_, subs) = engine("us-il").split(text);
        assert_eq!(subs[0].children[0].identifier, "1");
        assert_eq!(subs[1].children[0].identifier, "A");
    }

    #[test]
    fn test_split_deterministic() {
        let text = "(a) First rule. (1) Sub one. (2) Sub two. (b) Second rule.";
        let engine = engine("us");
        assert_eq!(engine.split(text), engine.split(text));
    }

    #[test]
    fn test_cleanup_applied_before_split() {
        let text = "(a)  Double  spaced. (b) Fine.";
        let (_, subs) = engine("us").split(text);
        assert_eq!(subs[0].text, "Double spaced.");
    }

    #[test]
    fn test_wisconsin_digit_top_level() {
        let text = "(1) Top one. (a) Child a. (b) Child b. (2) Top two.";
        let (_, subs) = engine("us-wi").split(text);
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].identifier, "1");
        assert_eq!(subs[0].children.len(), 2);
        assert_eq!(subs[0].children[0].identifier, "a");
    }
}
