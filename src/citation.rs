//! Citation formatting, inverse parsing, and stable path generation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::LazyLock;

use crate::error::{ConvertError, Result};
use crate::jurisdiction;
use crate::types::{JurisdictionType, Section, Statute};

/// A structured citation: jurisdiction + code + section, with an optional
/// subsection path from the section root down to one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Jurisdiction id, e.g. "us-ca".
    pub jurisdiction: String,

    /// Code or title identifier, e.g. "RTC" or "26".
    pub code: String,

    /// Section number; non-empty, may contain letters and decimals.
    pub section: String,

    /// Ordered identifiers from root to a specific subsection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsection_path: Option<Vec<String>>,
}

/// USC citation: "26 USC § 32" or "26 USC § 32(a)(1)".
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static USC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<code>[0-9A-Za-z]+) USC § (?<section>[0-9A-Za-z.\-]+)(?<path>(?:\([^()]+\))*)$")
        .expect("valid regex")
});

/// State citation body after the jurisdiction label: "RTC § 17041(a)".
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static STATE_BODY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<code>[0-9A-Za-z.\-]+) § (?<section>[0-9A-Za-z.\-]+)(?<path>(?:\([^()]+\))*)$")
        .expect("valid regex")
});

/// Generic state citation: "OH REV § 5747.01".
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static GENERIC_STATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?<st>[A-Z]{2}) (?<code>[0-9A-Za-z.\-]+) § (?<section>[0-9A-Za-z.\-]+)(?<path>(?:\([^()]+\))*)$",
    )
    .expect("valid regex")
});

/// One parenthesized path segment.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PATH_SEGMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]+)\)").expect("valid regex"));

/// Whitespace runs (collapsed to a single underscore).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Characters outside the stable-identifier alphabet.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static INVALID_ID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_-]").expect("valid regex"));

/// Repeated dashes.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DASH_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("valid regex"));

/// Repeated underscores.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_{2,}").expect("valid regex"));

impl Citation {
    /// Create a citation without a subsection path.
    #[must_use]
    pub fn new(
        jurisdiction: impl Into<String>,
        code: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            jurisdiction: jurisdiction.into(),
            code: code.into(),
            section: section.into(),
            subsection_path: None,
        }
    }

    /// Set the subsection path.
    #[must_use]
    pub fn with_path(mut self, path: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.subsection_path = Some(path.into_iter().map(Into::into).collect());
        self
    }

    /// Format the citation string.
    ///
    /// Federal: `"{code} USC § {section}{(path)}"`. State:
    /// `"{label} {code} § {section}{(path)}"` where the label is the
    /// jurisdiction's reporter abbreviation or uppercased postal code.
    /// Never fails for registered jurisdictions with a section number;
    /// unregistered ids and empty section numbers raise.
    pub fn format(&self) -> Result<String> {
        let jur = jurisdiction::get(&self.jurisdiction)?;
        self.validate()?;

        let mut out = match jur.kind {
            JurisdictionType::Federal => format!("{} USC § {}", self.code, self.section),
            _ => format!("{} {} § {}", jur.citation_label(), self.code, self.section),
        };

        if let Some(path) = &self.subsection_path {
            for segment in path {
                // Infallible write into a String
                let _ = write!(out, "({segment})");
            }
        }

        Ok(out)
    }

    /// Check the citation invariants: the section number and every
    /// subsection path segment must be non-empty.
    fn validate(&self) -> Result<()> {
        let path_ok = self
            .subsection_path
            .as_deref()
            .unwrap_or_default()
            .iter()
            .all(|segment| !segment.trim().is_empty());
        if self.section.trim().is_empty() || !path_ok {
            return Err(ConvertError::EmptySection(self.code.clone()));
        }
        Ok(())
    }

    /// Parse a citation string.
    ///
    /// Supports the USC pattern, labeled state patterns ("Cal. RTC § 17041"),
    /// and the generic "ST CODE § N" pattern. Anything else is a
    /// [`ConvertError::CitationFormat`]; callers must not guess.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();

        if let Some(caps) = USC_PATTERN.captures(text) {
            return Ok(Self {
                jurisdiction: "us".to_string(),
                code: caps["code"].to_string(),
                section: caps["section"].to_string(),
                subsection_path: parse_path(&caps["path"]),
            });
        }

        // Labeled state pattern: a registered citation label (reporter
        // abbreviation or postal code) followed by the code/section body.
        if let Some((label, body)) = text.split_once(' ') {
            if let Some(jur) = jurisdiction::by_citation_label(label) {
                if let Some(caps) = STATE_BODY_PATTERN.captures(body) {
                    return Ok(Self {
                        jurisdiction: jur.id.to_string(),
                        code: caps["code"].to_string(),
                        section: caps["section"].to_string(),
                        subsection_path: parse_path(&caps["path"]),
                    });
                }
            }
        }

        if let Some(caps) = GENERIC_STATE_PATTERN.captures(text) {
            let id = format!("us-{}", caps["st"].to_lowercase());
            if jurisdiction::lookup(&id).is_some() {
                return Ok(Self {
                    jurisdiction: id,
                    code: caps["code"].to_string(),
                    section: caps["section"].to_string(),
                    subsection_path: parse_path(&caps["path"]),
                });
            }
        }

        Err(ConvertError::CitationFormat(text.to_string()))
    }
}

/// Parse a "(a)(1)(A)" suffix into its segments.
fn parse_path(path: &str) -> Option<Vec<String>> {
    if path.is_empty() {
        return None;
    }
    let segments: Vec<String> = PATH_SEGMENT_PATTERN
        .captures_iter(path)
        .map(|c| c[1].to_string())
        .collect();
    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

/// Sanitize free text into a stable identifier segment.
///
/// Lowercases, collapses whitespace runs to `_`, strips characters outside
/// `[a-z0-9_-]`, collapses repeated dashes and underscores, and truncates to
/// 50 characters. Idempotent: `sanitize_id(sanitize_id(x)) == sanitize_id(x)`.
///
/// # Examples
/// ```
/// use statute_xml::citation::sanitize_id;
///
/// assert_eq!(sanitize_id("Chapter 12-Tax! Section"), "chapter_12-tax_section");
/// ```
#[must_use]
pub fn sanitize_id(text: &str) -> String {
    let lowered = text.to_lowercase();
    let underscored = WHITESPACE_RUN.replace_all(&lowered, "_");
    let stripped = INVALID_ID_CHARS.replace_all(&underscored, "");
    let dashes = DASH_RUN.replace_all(&stripped, "-");
    let collapsed = UNDERSCORE_RUN.replace_all(&dashes, "_");
    collapsed.chars().take(50).collect()
}

/// Rules-as-code path: `{jurisdiction}/statute/{code}/{section}[/{seg}...]`.
///
/// A pure function of its inputs; equal inputs always yield equal paths.
#[must_use]
pub fn rac_path(citation: &Citation) -> String {
    let mut path = format!(
        "{}/statute/{}/{}",
        citation.jurisdiction,
        sanitize_id(&citation.code),
        sanitize_id(&citation.section)
    );
    append_path_segments(&mut path, citation);
    path
}

/// Database path: `statute/{jurisdiction}/{code}/{section}[/{seg}...]`.
///
/// Identical to [`rac_path`] modulo where the jurisdiction namespace prefix
/// sits.
#[must_use]
pub fn db_path(citation: &Citation) -> String {
    let mut path = format!(
        "statute/{}/{}/{}",
        citation.jurisdiction,
        sanitize_id(&citation.code),
        sanitize_id(&citation.section)
    );
    append_path_segments(&mut path, citation);
    path
}

fn append_path_segments(path: &mut String, citation: &Citation) {
    if let Some(segments) = &citation.subsection_path {
        for segment in segments {
            path.push('/');
            path.push_str(&sanitize_id(segment));
        }
    }
}

impl Statute {
    /// Project a [`Section`] into its rendering-time form with derived
    /// citation and path strings.
    pub fn from_section(section: &Section) -> Result<Self> {
        let citation = Citation::new(
            section.jurisdiction.clone(),
            section.code.clone(),
            section.section_number.clone(),
        );
        Ok(Self {
            citation: citation.format()?,
            rac_path: rac_path(&citation),
            db_path: db_path(&citation),
            section: section.clone(),
        })
    }
}
