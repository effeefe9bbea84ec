//! Per-jurisdiction marker profiles.
//!
//! A jurisdiction contributes only a prioritized list of marker styles per
//! nesting depth plus a few text-cleanup hooks; the split engine is shared.
//! This is what collapses thirty bespoke per-state parsers into one engine
//! and thirty small tables.

use regex::Regex;
use std::sync::LazyLock;

use super::style::MarkerStyle;
use crate::config::MAX_NESTING_DEPTH;

/// A text-cleanup hook applied to raw fetcher output before splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupRule {
    /// Collapse runs of spaces and tabs. Newlines are kept; they carry
    /// line-start boundary information.
    CollapseSpaces,
    /// Fix "word,word" typography from sloppy source HTML.
    FixCommaSpacing,
    /// Strip a leading "Sec. 12." / "§ 12." label repeated from the heading.
    StripSectionLabel,
}

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static MISSING_SPACE_AFTER_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z]),([a-zA-Z])").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SECTION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:Sec\.|Section|§)\s*[0-9A-Za-z.\-]+\.?\s*").expect("valid regex")
});

impl CleanupRule {
    /// Apply this rule to `text`.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::CollapseSpaces => SPACE_RUN.replace_all(text, " ").to_string(),
            Self::FixCommaSpacing => {
                // Loop until stable to handle overlapping cases like "a,b,c"
                let mut result = text.to_string();
                loop {
                    let replaced = MISSING_SPACE_AFTER_COMMA
                        .replace_all(&result, "$1, $2")
                        .to_string();
                    if replaced == result {
                        break;
                    }
                    result = replaced;
                }
                result
            }
            Self::StripSectionLabel => SECTION_LABEL.replace(text, "").to_string(),
        }
    }
}

/// Splitting configuration for one jurisdiction.
#[derive(Debug, Clone)]
pub struct MarkerProfile {
    /// Jurisdiction id this profile belongs to.
    pub jurisdiction: &'static str,

    /// Prioritized marker styles per depth (index 0 = section root level).
    pub levels: Vec<Vec<MarkerStyle>>,

    /// Whether to extract inline headings after markers.
    pub detect_headings: bool,

    /// Cleanup hooks applied before splitting, in order.
    pub cleanup: Vec<CleanupRule>,
}

impl MarkerProfile {
    /// Create a profile with the given per-depth style priorities.
    #[must_use]
    pub fn new(
        jurisdiction: &'static str,
        levels: impl IntoIterator<Item = Vec<MarkerStyle>>,
    ) -> Self {
        Self {
            jurisdiction,
            levels: levels.into_iter().take(MAX_NESTING_DEPTH).collect(),
            detect_headings: false,
            cleanup: vec![CleanupRule::CollapseSpaces],
        }
    }

    /// Enable inline-heading extraction.
    #[must_use]
    pub fn with_headings(mut self) -> Self {
        self.detect_headings = true;
        self
    }

    /// Replace the cleanup hook list.
    #[must_use]
    pub fn with_cleanup(mut self, cleanup: impl IntoIterator<Item = CleanupRule>) -> Self {
        self.cleanup = cleanup.into_iter().collect();
        self
    }

    /// Styles attempted at `depth`, in priority order.
    #[must_use]
    pub fn styles_at(&self, depth: usize) -> &[MarkerStyle] {
        self.levels.get(depth).map_or(&[], Vec::as_slice)
    }

    /// Run all cleanup hooks over `text`.
    #[must_use]
    pub fn clean(&self, text: &str) -> String {
        let mut result = text.to_string();
        for rule in &self.cleanup {
            result = rule.apply(&result);
        }
        result
    }
}

/// The common bracket-delimited stack: (a)(1)(A)(i)(I).
fn paren_stack() -> Vec<Vec<MarkerStyle>> {
    vec![
        vec![MarkerStyle::LowerAlpha],
        vec![MarkerStyle::Digit],
        vec![MarkerStyle::UpperAlpha, MarkerStyle::LowerRoman],
        vec![MarkerStyle::LowerRoman],
        vec![MarkerStyle::UpperRoman],
    ]
}

/// Digit-first stack: (1)(a)(A)(i).
fn digit_first_stack() -> Vec<Vec<MarkerStyle>> {
    vec![
        vec![MarkerStyle::Digit],
        vec![MarkerStyle::LowerAlpha],
        vec![MarkerStyle::UpperAlpha, MarkerStyle::LowerRoman],
        vec![MarkerStyle::LowerRoman],
        vec![MarkerStyle::UpperRoman],
    ]
}

/// Upper-alpha-first stack: (A)(1)(a)(i), the Ohio convention.
fn upper_first_stack() -> Vec<Vec<MarkerStyle>> {
    vec![
        vec![MarkerStyle::UpperAlpha],
        vec![MarkerStyle::Digit],
        vec![MarkerStyle::LowerAlpha, MarkerStyle::LowerRoman],
        vec![MarkerStyle::LowerRoman],
        vec![MarkerStyle::UpperRoman],
    ]
}

/// All jurisdiction profiles.
static PROFILES: LazyLock<Vec<MarkerProfile>> = LazyLock::new(|| {
    vec![
        MarkerProfile::new("us", paren_stack()),
        MarkerProfile::new("us-al", paren_stack()),
        MarkerProfile::new("us-az", upper_first_stack()),
        MarkerProfile::new("us-ca", paren_stack())
            .with_cleanup([CleanupRule::CollapseSpaces, CleanupRule::StripSectionLabel]),
        MarkerProfile::new("us-co", digit_first_stack()),
        // Connecticut clause letters appear dash-separated below the roman level
        MarkerProfile::new(
            "us-ct",
            vec![
                vec![MarkerStyle::LowerAlpha],
                vec![MarkerStyle::Digit],
                vec![MarkerStyle::UpperAlpha],
                vec![MarkerStyle::DashLetter, MarkerStyle::LowerRoman],
                vec![MarkerStyle::UpperRoman],
            ],
        ),
        // Florida: (1)(a)1.a.
        MarkerProfile::new(
            "us-fl",
            vec![
                vec![MarkerStyle::Digit],
                vec![MarkerStyle::LowerAlpha],
                vec![MarkerStyle::Digit],
                vec![MarkerStyle::LowerAlpha],
                vec![MarkerStyle::LowerRoman],
            ],
        ),
        MarkerProfile::new("us-ga", paren_stack()),
        // Illinois mixes digit and letter children under one subsection index
        MarkerProfile::new(
            "us-il",
            vec![
                vec![MarkerStyle::LowerAlpha],
                vec![MarkerStyle::Digit, MarkerStyle::UpperAlpha],
                vec![MarkerStyle::UpperAlpha, MarkerStyle::LowerRoman],
                vec![MarkerStyle::LowerRoman],
                vec![MarkerStyle::UpperRoman],
            ],
        ),
        MarkerProfile::new("us-in", paren_stack()),
        MarkerProfile::new("us-ky", digit_first_stack()),
        MarkerProfile::new("us-la", upper_first_stack()),
        MarkerProfile::new("us-ma", paren_stack()),
        MarkerProfile::new("us-md", paren_stack()),
        MarkerProfile::new("us-mi", digit_first_stack()),
        // Minnesota: "Subd. 1." top level, headings preserved by the source
        MarkerProfile::new(
            "us-mn",
            vec![
                vec![MarkerStyle::NamedOrdinal("Subd.")],
                vec![MarkerStyle::LowerAlpha],
                vec![MarkerStyle::Digit],
                vec![MarkerStyle::LowerRoman],
                vec![MarkerStyle::UpperRoman],
            ],
        )
        .with_headings(),
        MarkerProfile::new("us-mo", digit_first_stack()),
        MarkerProfile::new("us-nc", paren_stack())
            .with_cleanup([CleanupRule::CollapseSpaces, CleanupRule::FixCommaSpacing]),
        MarkerProfile::new("us-nj", paren_stack()),
        // New York: "1. (a) (1) (i)", suffixed identifiers like "1-a" common
        MarkerProfile::new(
            "us-ny",
            vec![
                vec![MarkerStyle::Digit],
                vec![MarkerStyle::LowerAlpha],
                vec![MarkerStyle::Digit],
                vec![MarkerStyle::LowerRoman],
                vec![MarkerStyle::UpperRoman],
            ],
        )
        .with_headings(),
        MarkerProfile::new("us-oh", upper_first_stack()),
        MarkerProfile::new("us-ok", digit_first_stack()),
        MarkerProfile::new("us-or", digit_first_stack()),
        MarkerProfile::new("us-pa", paren_stack()),
        MarkerProfile::new("us-sc", upper_first_stack()),
        MarkerProfile::new("us-tn", paren_stack()),
        MarkerProfile::new("us-tx", paren_stack()),
        // Utah numbers some subsections with decimal-dotted identifiers
        MarkerProfile::new(
            "us-ut",
            vec![
                vec![MarkerStyle::DecimalDotted, MarkerStyle::Digit],
                vec![MarkerStyle::LowerAlpha],
                vec![MarkerStyle::LowerRoman],
                vec![MarkerStyle::UpperAlpha],
                vec![MarkerStyle::UpperRoman],
            ],
        ),
        MarkerProfile::new("us-va", upper_first_stack()),
        MarkerProfile::new("us-wa", digit_first_stack()),
        // Wisconsin: (1)(a)1.a.
        MarkerProfile::new(
            "us-wi",
            vec![
                vec![MarkerStyle::Digit],
                vec![MarkerStyle::LowerAlpha],
                vec![MarkerStyle::Digit],
                vec![MarkerStyle::LowerAlpha],
                vec![MarkerStyle::LowerRoman],
            ],
        ),
    ]
});

/// Default profile for jurisdictions without a bespoke table.
static DEFAULT_PROFILE: LazyLock<MarkerProfile> =
    LazyLock::new(|| MarkerProfile::new("default", paren_stack()));

/// The profile for a jurisdiction, falling back to the common
/// bracket-delimited stack when none is registered.
#[must_use]
pub fn profile_for(jurisdiction: &str) -> &'static MarkerProfile {
    PROFILES
        .iter()
        .find(|p| p.jurisdiction == jurisdiction)
        .unwrap_or(&DEFAULT_PROFILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_lookup() {
        assert_eq!(profile_for("us-ca").jurisdiction, "us-ca");
        assert_eq!(profile_for("us-mn").levels[0], vec![MarkerStyle::NamedOrdinal("Subd.")]);
    }

    #[test]
    fn test_profile_fallback() {
        let profile = profile_for("us-nv");
        assert_eq!(profile.jurisdiction, "default");
        assert_eq!(profile.styles_at(0), &[MarkerStyle::LowerAlpha]);
    }

    #[test]
    fn test_styles_at_beyond_configured_depth() {
        let profile = profile_for("us-ca");
        assert!(profile.styles_at(7).is_empty());
    }

    #[test]
    fn test_no_profile_exceeds_max_depth() {
        for profile in PROFILES.iter() {
            assert!(profile.levels.len() <= crate::config::MAX_NESTING_DEPTH);
        }
    }

    #[test]
    fn test_cleanup_collapse_spaces() {
        assert_eq!(
            CleanupRule::CollapseSpaces.apply("a  b\t\tc\nd"),
            "a b c\nd"
        );
    }

    #[test]
    fn test_cleanup_comma_spacing() {
        assert_eq!(CleanupRule::FixCommaSpacing.apply("a,b,c"), "a, b, c");
        assert_eq!(CleanupRule::FixCommaSpacing.apply("1,000"), "1,000");
    }

    #[test]
    fn test_cleanup_strip_section_label() {
        assert_eq!(
            CleanupRule::StripSectionLabel.apply("Sec. 17041. (a) Tax imposed."),
            "(a) Tax imposed."
        );
        assert_eq!(
            CleanupRule::StripSectionLabel.apply("§ 5747.01. (A) As used here."),
            "(A) As used here."
        );
    }

    #[test]
    fn test_profile_clean_applies_in_order() {
        let profile = MarkerProfile::new("test", vec![])
            .with_cleanup([CleanupRule::StripSectionLabel, CleanupRule::CollapseSpaces]);
        assert_eq!(profile.clean("Sec. 1.  (a)  text"), "(a) text");
    }
}
