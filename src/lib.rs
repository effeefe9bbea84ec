//! Statute XML - convert fetched statute sections into legal XML.
//!
//! This crate takes plain-text statute sections (as produced by
//! per-jurisdiction fetchers), splits them into nested subsection trees
//! using declarative per-jurisdiction marker profiles, and serializes the
//! result as Akoma Ntoso 3.0 or USLM 1.0 documents with FRBR
//! identification metadata.
//!
//! # Example
//!
//! ```
//! use statute_xml::splitting::SplitEngine;
//!
//! let engine = SplitEngine::for_jurisdiction("us-ca");
//! let (lead, subsections) = engine.split("(a) First rule. (b) Second rule.");
//! assert!(lead.is_empty());
//! assert_eq!(subsections.len(), 2);
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants and validation
//! - [`types`]: Core data types (Section, Subsection, Statute, ...)
//! - [`error`]: Error types and Result alias
//! - [`jurisdiction`]: The process-wide jurisdiction registry
//! - [`citation`]: Citation formatting, parsing, and stable paths
//! - [`splitting`]: Marker grammar, profiles, and the split engine
//! - [`xml`]: Akoma Ntoso and USLM serialization
//! - [`batch`]: Parallel batch conversion with atomic file writes
//! - [`cli`]: Command-line interface

pub mod batch;
pub mod citation;
pub mod cli;
pub mod config;
pub mod error;
pub mod jurisdiction;
pub mod splitting;
pub mod types;
pub mod xml;

// Re-export main entry points
pub use batch::{convert_section, convert_sections, BatchOptions, BatchReport};
pub use xml::{serialize, LegalXmlFormat};

// Re-export commonly used items
pub use citation::{sanitize_id, Citation};
pub use config::{validate_date, validate_jurisdiction_id};
pub use error::{ConvertError, Result};
pub use types::{Section, SectionHierarchy, Statute, Subsection};
