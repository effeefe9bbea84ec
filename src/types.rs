//! Core data types for statute conversion.
//!
//! These types are the canonical, jurisdiction-neutral representation that
//! per-state fetchers produce and the serializer and storage backend consume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of jurisdiction in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JurisdictionType {
    Federal,
    State,
    Territory,
    Local,
}

/// A registry entry for one jurisdiction.
///
/// Entries are immutable and process-wide; see [`crate::jurisdiction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jurisdiction {
    /// Identifier, e.g. "us" or "us-ca".
    pub id: &'static str,

    /// Display name, e.g. "California".
    pub name: &'static str,

    /// Federal, state, territory, or local.
    pub kind: JurisdictionType,

    /// Base URL of the source legislature website, if known.
    pub base_url: Option<&'static str>,

    /// Reporter-style citation abbreviation (e.g. "Cal." for us-ca).
    ///
    /// Jurisdictions without one are cited by their uppercased postal code.
    pub citation_abbrev: Option<&'static str>,
}

impl Jurisdiction {
    /// Postal code portion of the id ("ca" for "us-ca"), or "us" for federal.
    #[must_use]
    pub fn postal_code(&self) -> &'static str {
        self.id.strip_prefix("us-").unwrap_or(self.id)
    }

    /// The abbreviation used when formatting citations.
    #[must_use]
    pub fn citation_label(&self) -> String {
        match self.citation_abbrev {
            Some(abbrev) => abbrev.to_string(),
            None => self.postal_code().to_uppercase(),
        }
    }
}

/// A recursively nested subsection of a statute section.
///
/// Children are ordered by first occurrence in the source text, never by a
/// sort of their identifiers: numbering conventions are not always monotonic
/// (e.g. "1-A" follows "1" in New York). All children of one node share the
/// same marker style, one level deeper than the parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsection {
    /// Marker identifier, e.g. "a", "1", "iv", "1-A".
    pub identifier: String,

    /// Inline heading, if the source preserved one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    /// Text belonging to this node before any child marker.
    #[serde(default)]
    pub text: String,

    /// Nested subsections, in source order.
    #[serde(default)]
    pub children: Vec<Subsection>,
}

impl Subsection {
    /// Create a leaf subsection with no heading.
    #[must_use]
    pub fn new(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            heading: None,
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Attach an inline heading.
    #[must_use]
    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    /// Attach children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Subsection>) -> Self {
        self.children = children;
        self
    }

    /// Depth of the deepest descendant, counting this node as one level.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Subsection::depth).max().unwrap_or(0)
    }
}

/// Flat structural ancestry of a section.
///
/// Fetchers can reliably extract at most one label per level, so this is a
/// set of optional strings rather than a nested tree. Serializers rebuild
/// the nesting from which labels are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHierarchy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subchapter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
}

impl SectionHierarchy {
    /// Present levels, top-down, as (level-name, label) pairs.
    #[must_use]
    pub fn levels(&self) -> Vec<(&'static str, &str)> {
        let mut levels = Vec::new();
        if let Some(v) = self.division.as_deref() {
            levels.push(("division", v));
        }
        if let Some(v) = self.part.as_deref() {
            levels.push(("part", v));
        }
        if let Some(v) = self.chapter.as_deref() {
            levels.push(("chapter", v));
        }
        if let Some(v) = self.subchapter.as_deref() {
            levels.push(("subchapter", v));
        }
        if let Some(v) = self.article.as_deref() {
            levels.push(("article", v));
        }
        levels
    }

    /// True when no level is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels().is_empty()
    }
}

/// One statute section, constructed once per fetch and immutable afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Jurisdiction id, e.g. "us-ca".
    pub jurisdiction: String,

    /// Code identifier, e.g. "RTC".
    pub code: String,

    /// Human-readable code name, e.g. "Revenue and Taxation Code".
    #[serde(default)]
    pub code_name: String,

    /// Section number; may contain letters and decimals (e.g. "17041.5").
    pub section_number: String,

    /// Section title or heading.
    #[serde(default)]
    pub title: String,

    /// Structural ancestry labels supplied by the fetcher.
    #[serde(default)]
    pub hierarchy: SectionHierarchy,

    /// Full flat text; rendered only when no subsections were recognized.
    #[serde(default)]
    pub text: String,

    /// Parsed subsections, in source order.
    #[serde(default)]
    pub subsections: Vec<Subsection>,

    /// Legislative history note, if the source carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<String>,

    /// URL the text was fetched from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    /// Retrieval timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieved_at: Option<DateTime<Utc>>,
}

impl Section {
    /// Create a minimal section; remaining fields via struct update or builders.
    #[must_use]
    pub fn new(
        jurisdiction: impl Into<String>,
        code: impl Into<String>,
        section_number: impl Into<String>,
    ) -> Self {
        Self {
            jurisdiction: jurisdiction.into(),
            code: code.into(),
            code_name: String::new(),
            section_number: section_number.into(),
            title: String::new(),
            hierarchy: SectionHierarchy::default(),
            text: String::new(),
            subsections: Vec::new(),
            history: None,
            source_url: None,
            retrieved_at: None,
        }
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the flat text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the subsections.
    #[must_use]
    pub fn with_subsections(mut self, subsections: Vec<Subsection>) -> Self {
        self.subsections = subsections;
        self
    }

    /// Set the legislative history note.
    #[must_use]
    pub fn with_history(mut self, history: impl Into<String>) -> Self {
        self.history = Some(history.into());
        self
    }
}

/// Rendering-time projection of a [`Section`] with derived strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statute {
    /// The underlying section.
    #[serde(flatten)]
    pub section: Section,

    /// Formatted citation string, e.g. "Cal. RTC § 17041".
    pub citation: String,

    /// Rules-as-code path, e.g. "us-ca/statute/rtc/17041".
    pub rac_path: String,

    /// Database path, e.g. "statute/us-ca/rtc/17041".
    pub db_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_subsection_depth() {
        let tree = Subsection::new("a", "top").with_children(vec![
            Subsection::new("1", "mid")
                .with_children(vec![Subsection::new("A", "leaf")]),
        ]);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_subsection_json_round_trip() {
        let tree = Subsection::new("a", "First rule.")
            .with_heading("Definitions")
            .with_children(vec![
                Subsection::new("1", "Sub one."),
                Subsection::new("1-A", "Sub one-A."),
                Subsection::new("2", "Sub two."),
            ]);

        let json = serde_json::to_string(&tree).unwrap();
        let back: Subsection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);

        // The storage contract's field names must be exactly these.
        assert!(json.contains("\"identifier\""));
        assert!(json.contains("\"heading\""));
        assert!(json.contains("\"text\""));
        assert!(json.contains("\"children\""));
    }

    #[test]
    fn test_subsection_json_minimal_fields() {
        // A storage-side mapping without heading deserializes cleanly.
        let json = r#"{"identifier":"b","text":"Second rule.","children":[]}"#;
        let sub: Subsection = serde_json::from_str(json).unwrap();
        assert_eq!(sub.identifier, "b");
        assert!(sub.heading.is_none());
        assert!(sub.children.is_empty());
    }

    #[test]
    fn test_hierarchy_levels_sparse() {
        let hierarchy = SectionHierarchy {
            chapter: Some("2".to_string()),
            article: Some("5".to_string()),
            ..SectionHierarchy::default()
        };
        assert_eq!(
            hierarchy.levels(),
            vec![("chapter", "2"), ("article", "5")]
        );
    }

    #[test]
    fn test_hierarchy_empty() {
        assert!(SectionHierarchy::default().is_empty());
    }

    #[test]
    fn test_section_builders() {
        let section = Section::new("us-ca", "RTC", "17041")
            .with_title("Imposition of tax")
            .with_text("Flat text.")
            .with_history("Added by Stats. 1943, Ch. 659.");
        assert_eq!(section.jurisdiction, "us-ca");
        assert_eq!(section.section_number, "17041");
        assert_eq!(section.history.as_deref(), Some("Added by Stats. 1943, Ch. 659."));
    }

    #[test]
    fn test_section_json_round_trip() {
        let section = Section::new("us-mn", "STAT", "290.01")
            .with_subsections(vec![Subsection::new("1", "Scope.")]);
        let json = serde_json::to_string(&section).unwrap();
        let back: Section = serde_json::from_str(&json).unwrap();
        assert_eq!(back, section);
    }

    #[test]
    fn test_jurisdiction_citation_label() {
        let with_abbrev = Jurisdiction {
            id: "us-ca",
            name: "California",
            kind: JurisdictionType::State,
            base_url: None,
            citation_abbrev: Some("Cal."),
        };
        assert_eq!(with_abbrev.citation_label(), "Cal.");

        let without = Jurisdiction {
            id: "us-oh",
            name: "Ohio",
            kind: JurisdictionType::State,
            base_url: None,
            citation_abbrev: None,
        };
        assert_eq!(without.citation_label(), "OH");
        assert_eq!(without.postal_code(), "oh");
    }
}
