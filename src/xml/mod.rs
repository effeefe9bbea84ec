//! Legal XML serialization.
//!
//! Two target schemas, one contract: a metadata block with FRBR-style
//! Work/Expression/Manifestation identification, a sparse structural
//! hierarchy down to a `section` element, and the subsection tree rendered
//! with a fixed depth-to-tag mapping. [`akn`] emits Akoma Ntoso 3.0,
//! [`uslm`] emits USLM 1.0.

pub mod akn;
pub mod uslm;

use std::collections::HashMap;

use tracing::warn;

use crate::citation::sanitize_id;
use crate::config::{cap_text, AKN_TEXT_CAP, PARAGRAPH_CAP, USLM_TEXT_CAP};
use crate::types::Statute;

/// Target serialization schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegalXmlFormat {
    AkomaNtoso,
    Uslm,
}

impl LegalXmlFormat {
    /// Direct-text cap for this format, in characters.
    #[must_use]
    pub fn text_cap(&self) -> usize {
        match self {
            Self::AkomaNtoso => AKN_TEXT_CAP,
            Self::Uslm => USLM_TEXT_CAP,
        }
    }

    /// Short display name used in logs and CLI output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AkomaNtoso => "akn",
            Self::Uslm => "uslm",
        }
    }
}

/// Serialize a statute to the chosen schema.
///
/// `generated_on` is the generation date (YYYY-MM-DD), injected by the
/// caller so repeated serialization of the same statute is byte-identical.
/// Serialization never fails: a writer error degrades to the raw-tree
/// fallback document, logged but not propagated.
#[must_use]
pub fn serialize(statute: &Statute, format: LegalXmlFormat, generated_on: &str) -> String {
    let result = match format {
        LegalXmlFormat::AkomaNtoso => akn::write_document(statute, generated_on),
        LegalXmlFormat::Uslm => uslm::write_document(statute, generated_on),
    };
    match result {
        Ok(xml) => xml,
        Err(err) => {
            warn!(
                format = format.name(),
                citation = %statute.citation,
                error = %err,
                "pretty serialization failed, falling back to raw tree"
            );
            fallback_document(statute)
        }
    }
}

/// Minimal declaration-plus-raw-tree document used when the pretty writer
/// fails; keeps batch conversion going on one bad section.
fn fallback_document(statute: &Statute) -> String {
    let tree = serde_json::to_string_pretty(&statute.section)
        .unwrap_or_else(|_| format!("{:?}", statute.section));
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<raw citation=\"{}\">\n{}\n</raw>\n",
        quick_xml::escape::escape(&statute.citation),
        quick_xml::escape::escape(&tree),
    )
}

/// Depth-to-element-name mapping shared by both schemas; depths past the
/// table render as the deepest entry.
const LEVEL_TAGS: [&str; 5] = ["subsection", "paragraph", "subparagraph", "clause", "subclause"];

/// Level-specific id prefixes matching [`LEVEL_TAGS`].
const ID_PREFIXES: [&str; 5] = ["subsec", "para", "subpara", "clause", "subclause"];

pub(crate) fn level_tag(depth: usize) -> &'static str {
    LEVEL_TAGS[depth.min(LEVEL_TAGS.len() - 1)]
}

/// Tracks sibling-id collisions within one serialization call.
///
/// Duplicate sibling identifiers are a fetch anomaly, not a normal input;
/// the second and later occurrences get a monotonically increasing suffix
/// so every node id in a document is unique.
#[derive(Default)]
pub(crate) struct IdAllocator {
    seen: HashMap<String, u32>,
}

impl IdAllocator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stable id for a node: parent id, level prefix, sanitized identifier.
    pub(crate) fn node_id(&mut self, parent: &str, depth: usize, identifier: &str) -> String {
        let prefix = ID_PREFIXES[depth.min(ID_PREFIXES.len() - 1)];
        let base = format!("{parent}__{prefix}_{}", sanitize_id(identifier));
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{base}_{count}")
        }
    }
}

/// Split flat text into length-capped paragraphs on blank lines.
pub(crate) fn flat_paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| cap_text(p, PARAGRAPH_CAP))
        .collect()
}

/// Structural hierarchy level names mapped to (element, id prefix).
pub(crate) fn hierarchy_parts(level: &str) -> (&'static str, &'static str) {
    match level {
        "division" => ("division", "dvs"),
        "part" => ("part", "prt"),
        "chapter" => ("chapter", "chp"),
        "subchapter" => ("subchapter", "subchp"),
        _ => ("article", "art"),
    }
}
