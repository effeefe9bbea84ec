//! Configuration constants and validation functions.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{ConvertError, Result};

/// Akoma Ntoso 3.0 namespace URI.
pub const AKN_NS: &str = "http://docs.oasis-open.org/legaldocml/ns/akn/3.0";

/// USLM 1.0 namespace URI.
pub const USLM_NS: &str = "http://xml.house.gov/schemas/uslm/1.0";

/// Maximum subsection nesting depth.
///
/// Markers found below this depth are not split out; their text stays
/// verbatim in the deepest node's direct text.
pub const MAX_NESTING_DEPTH: usize = 5;

/// Direct-text cap for Akoma Ntoso output, in characters.
pub const AKN_TEXT_CAP: usize = 10_000;

/// Direct-text cap for USLM output, in characters.
///
/// USLM consumers downstream choke on very large inline text runs, so the
/// cap is tighter than for Akoma Ntoso.
pub const USLM_TEXT_CAP: usize = 2_000;

/// Appended to direct text that was cut at the cap.
pub const TRUNCATION_MARKER: &str = " [truncated]";

/// Maximum length of a flat-text paragraph (`p` element) in either format.
pub const PARAGRAPH_CAP: usize = 2_000;

/// Jurisdiction id pattern: "us" or "us-" plus a two-letter code.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static JURISDICTION_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^us(-[a-z]{2})?$").expect("valid regex"));

/// Date pattern: YYYY-MM-DD.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Validate a jurisdiction id's format.
///
/// This checks the shape only; whether the id is actually registered is
/// decided by [`crate::jurisdiction::lookup`].
///
/// # Examples
/// ```
/// use statute_xml::config::validate_jurisdiction_id;
///
/// assert!(validate_jurisdiction_id("us-ca").is_ok());
/// assert!(validate_jurisdiction_id("us").is_ok());
/// assert!(validate_jurisdiction_id("california").is_err());
/// ```
pub fn validate_jurisdiction_id(id: &str) -> Result<()> {
    if JURISDICTION_ID_PATTERN.is_match(id) {
        Ok(())
    } else {
        Err(ConvertError::UnknownJurisdiction(id.to_string()))
    }
}

/// Validate a generation date (YYYY-MM-DD).
///
/// # Examples
/// ```
/// use statute_xml::config::validate_date;
///
/// assert!(validate_date("2025-01-01").is_ok());
/// assert!(validate_date("2025-13-01").is_err()); // Invalid month
/// ```
pub fn validate_date(date_str: &str) -> Result<()> {
    if !DATE_PATTERN.is_match(date_str) {
        return Err(ConvertError::InvalidDate(date_str.to_string()));
    }

    // Parse and validate it's a real date
    chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| ConvertError::InvalidDate(date_str.to_string()))?;

    Ok(())
}

/// Truncate text at `cap` characters, appending the truncation marker.
///
/// Cuts at a char boundary; text at or under the cap is returned unchanged.
pub fn cap_text(text: &str, cap: usize) -> String {
    if text.chars().count() <= cap {
        return text.to_string();
    }
    let cut: String = text.chars().take(cap).collect();
    format!("{}{}", cut.trim_end(), TRUNCATION_MARKER)
}
