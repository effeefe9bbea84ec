//! Marker styles: the recognized subsection-identifier conventions.
//!
//! Each style is a (regex, ordering function, display formatter) triple plus
//! a boundary rule deciding where a match counts as a real marker rather
//! than ordinary prose.

use regex::Regex;
use std::sync::LazyLock;

/// A recognized subsection numbering convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// "(1)", "(2)", with atomic suffixed forms like "(1-A)" or "(5A)";
    /// dotted line-start forms "1. " and "1-a. " as used by New York
    /// top levels.
    Digit,
    /// "(a)" ... "(z)", or dotted "a. " at line start.
    LowerAlpha,
    /// "(A)" ... "(Z)", or dotted "A. " at line start.
    UpperAlpha,
    /// "(i)", "(ii)", ... validated against a strict roman grammar.
    LowerRoman,
    /// "(I)", "(II)", ... validated against a strict roman grammar.
    UpperRoman,
    /// Citation-like numbers: "(12.1)" or line-start "12.1 ".
    DecimalDotted,
    /// A literal keyword plus a digit, e.g. `NamedOrdinal("Subd.")` for
    /// Minnesota's "Subd. 1." top level.
    NamedOrdinal(&'static str),
    /// Em-dash separated clause letters: "—a." (double hyphen accepted).
    DashLetter,
}

/// One marker occurrence inside a text span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Byte offset of the marker token in the span.
    pub start: usize,
    /// Byte offset of the first content character after the token.
    pub content_start: usize,
    /// The captured identifier, e.g. "a", "1-A", "iv".
    pub identifier: String,
}

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((\d+(?:-?[A-Za-z]+)?)\)|(\d+(?:-?[A-Za-z]+)?)\.(?:\s|$)").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LOWER_ALPHA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([a-z])\)|([a-z])\.(?:\s|$)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static UPPER_ALPHA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([A-Z])\)|([A-Z])\.(?:\s|$)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LOWER_ROMAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([ivxlcdm]+)\)|([ivxlcdm]+)\.(?:\s|$)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static UPPER_ROMAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([IVXLCDM]+)\)|([IVXLCDM]+)\.(?:\s|$)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+(?:\.\d+)?)\)|(\d+\.\d+)(?:\s|$)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DASH_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:—|--)\s*([a-z])\.").expect("valid regex"));

/// Strict roman numeral grammar; rejects malformed runs like "IIII" or "VV".
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ROMAN_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^M{0,3}(CM|CD|D?C{0,3})(XC|XL|L?X{0,3})(IX|IV|V?I{0,3})$").expect("valid regex")
});

/// Validate a roman numeral (either case, not mixed).
#[must_use]
pub fn is_valid_roman(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let upper = text.to_uppercase();
    if upper != text && text.to_lowercase() != text {
        return false; // mixed case
    }
    ROMAN_GRAMMAR.is_match(&upper)
}

/// Numeric value of a strictly valid roman numeral.
#[must_use]
pub fn roman_value(text: &str) -> Option<u32> {
    if !is_valid_roman(text) {
        return None;
    }
    let mut total: u32 = 0;
    let mut prev: u32 = 0;
    for c in text.to_uppercase().chars().rev() {
        let value = match c {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        };
        if value < prev {
            total = total.checked_sub(value)?;
        } else {
            total = total.checked_add(value)?;
            prev = value;
        }
    }
    Some(total)
}

/// Render a number as a roman numeral (lowercase).
#[must_use]
pub fn to_roman(mut n: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = String::new();
    for (value, digits) in TABLE {
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    out
}

impl MarkerStyle {
    /// The compiled marker pattern for this style.
    ///
    /// Capture group 1 is the parenthesized (or dash/keyword) form, group 2
    /// the dotted line-start form where the style has one.
    #[must_use]
    pub fn regex(&self) -> Regex {
        match self {
            Self::Digit => DIGIT_RE.clone(),
            Self::LowerAlpha => LOWER_ALPHA_RE.clone(),
            Self::UpperAlpha => UPPER_ALPHA_RE.clone(),
            Self::LowerRoman => LOWER_ROMAN_RE.clone(),
            Self::UpperRoman => UPPER_ROMAN_RE.clone(),
            Self::DecimalDotted => DECIMAL_RE.clone(),
            #[allow(clippy::expect_used)] // Escaped literal prefix compiles
            Self::NamedOrdinal(prefix) => Regex::new(&format!(
                r"{}\s*(\d+[a-z]?)\.",
                regex::escape(prefix)
            ))
            .expect("valid regex"),
            Self::DashLetter => DASH_LETTER_RE.clone(),
        }
    }

    /// Find all boundary-valid marker occurrences in `text`.
    #[must_use]
    pub fn find_markers(&self, text: &str) -> Vec<Marker> {
        let regex = self.regex();
        let mut markers = Vec::new();

        for caps in regex.captures_iter(text) {
            #[allow(clippy::expect_used)] // Group 0 always exists on a match
            let whole = caps.get(0).expect("match");
            let (group, line_start_only) = match (caps.get(1), caps.get(2)) {
                (Some(g), _) => {
                    // Keyword forms are anchored to line starts like dotted
                    // forms; bracketed and dash forms float mid-span.
                    let anchored = matches!(self, Self::NamedOrdinal(_));
                    (g, anchored)
                }
                (None, Some(g)) => (g, true),
                (None, None) => continue,
            };

            if !boundary_ok(text, whole.start(), line_start_only) {
                continue;
            }

            let identifier = group.as_str().to_string();
            if matches!(self, Self::LowerRoman | Self::UpperRoman)
                && !is_valid_roman(&identifier)
            {
                continue;
            }

            markers.push(Marker {
                start: whole.start(),
                content_start: whole.end(),
                identifier,
            });
        }

        markers
    }

    /// Ordering function: the identifier's position in this style's sequence.
    ///
    /// Returns `None` for forms without a simple ordinal (e.g. "1-A"), which
    /// fall back to lexical ordering where a comparison is needed.
    #[must_use]
    pub fn ordinal(&self, identifier: &str) -> Option<u32> {
        match self {
            Self::Digit | Self::NamedOrdinal(_) | Self::DecimalDotted => {
                identifier.parse::<u32>().ok()
            }
            Self::LowerAlpha | Self::DashLetter => letter_ordinal(identifier, b'a'),
            Self::UpperAlpha => letter_ordinal(identifier, b'A'),
            Self::LowerRoman | Self::UpperRoman => roman_value(identifier),
        }
    }

    /// Display formatter: render the n-th identifier of this style (1-based).
    #[must_use]
    pub fn format_ordinal(&self, n: u32) -> String {
        match self {
            Self::Digit | Self::NamedOrdinal(_) | Self::DecimalDotted => n.to_string(),
            Self::LowerAlpha | Self::DashLetter => letter_for(n, b'a'),
            Self::UpperAlpha => letter_for(n, b'A'),
            Self::LowerRoman => to_roman(n),
            Self::UpperRoman => to_roman(n).to_uppercase(),
        }
    }
}

/// A marker counts only at span start, after whitespace, or (for dotted and
/// keyword forms) at a line start.
fn boundary_ok(text: &str, start: usize, line_start_only: bool) -> bool {
    if start == 0 {
        return true;
    }
    let Some(prev) = text[..start].chars().next_back() else {
        return true;
    };
    if line_start_only {
        prev == '\n'
    } else {
        prev.is_whitespace()
    }
}

fn letter_ordinal(identifier: &str, base: u8) -> Option<u32> {
    let mut chars = identifier.bytes();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    if (base..=base + 25).contains(&c) {
        Some(u32::from(c - base) + 1)
    } else {
        None
    }
}

fn letter_for(n: u32, base: u8) -> String {
    if (1..=26).contains(&n) {
        #[allow(clippy::expect_used)] // base + 0..25 is always valid ASCII
        char::from_u32(u32::from(base) + n - 1)
            .expect("ascii letter")
            .to_string()
    } else {
        n.to_string()
    }
}
