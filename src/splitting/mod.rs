//! Declarative subsection splitting.
//!
//! The marker grammar ([`style`]) defines the recognized numbering
//! conventions, per-jurisdiction [`profile`]s declare which conventions
//! apply at which depth, and the shared [`engine`] turns raw section text
//! into a nested subsection tree.

pub mod engine;
pub mod profile;
pub mod style;

pub use engine::SplitEngine;
pub use profile::{profile_for, CleanupRule, MarkerProfile};
pub use style::{Marker, MarkerStyle};
