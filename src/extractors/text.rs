// src/extractors/text.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use serde::{Serialize, Serializer};

// --- Constants ---
/// Cell contents that mean "no value" on the scraped pages.
const NOT_AVAILABLE: [&str; 4] = ["", "-", "N/A", "n/a"];

/// Characters removed anywhere in a token before numeric parsing.
const STRIPPED_CHARS: &[char] = &[',', '$', '%', '(', ')'];

/// Magnitude suffixes, checked in this order.
const MAGNITUDE_SUFFIXES: [(char, f64); 4] = [
    ('K', 1_000.0),
    ('M', 1_000_000.0),
    ('B', 1_000_000_000.0),
    ('T', 1_000_000_000_000.0),
];

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE"));

// --- Data Structures ---
/// A scraped value after coercion.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CoercedValue {
    /// Empty cell or a "not available" marker.
    #[default]
    None,
    Float(f64),
    Integer(i64),
    /// Original text, kept when no numeric reading applies.
    Text(String),
}

// JSON has no representation for inf/NaN, so those are written as strings.
impl Serialize for CoercedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CoercedValue::None => serializer.serialize_none(),
            CoercedValue::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            CoercedValue::Float(v) => serializer.collect_str(v),
            CoercedValue::Integer(v) => serializer.serialize_i64(*v),
            CoercedValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

// --- Functions ---
/// Collapses every whitespace run to a single space and trims the ends.
pub fn normalize(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Normalized text of an element's whole subtree. A missing element gives "".
pub fn element_text(element: Option<ElementRef<'_>>) -> String {
    element
        .map(|el| normalize(&el.text().collect::<String>()))
        .unwrap_or_default()
}

/// Converts a cleaned token into a number where possible.
///
/// Rules, applied in order:
/// 1. empty, `-`, `N/A` and `n/a` are [`CoercedValue::None`];
/// 2. `,` `$` `%` `(` `)` are dropped wherever they appear;
/// 3. a trailing `K`/`M`/`B`/`T` scales the numeric prefix (always a float);
/// 4. text containing `.` is read as a float, anything else as an integer;
/// 5. otherwise the input is returned untouched as [`CoercedValue::Text`].
pub fn coerce(text: &str) -> CoercedValue {
    let trimmed = text.trim();
    if NOT_AVAILABLE.contains(&trimmed) {
        return CoercedValue::None;
    }

    let stripped: String = trimmed
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();
    let cleaned = stripped.trim();

    // Only one suffix can match since each is a single trailing char.
    for (suffix, multiplier) in MAGNITUDE_SUFFIXES {
        if let Some(prefix) = cleaned.strip_suffix(suffix) {
            if let Ok(value) = prefix.trim().parse::<f64>() {
                return CoercedValue::Float(value * multiplier);
            }
            break;
        }
    }

    if cleaned.contains('.') {
        if let Ok(value) = cleaned.parse::<f64>() {
            return CoercedValue::Float(value);
        }
    } else if let Ok(value) = cleaned.parse::<i64>() {
        return CoercedValue::Integer(value);
    }

    CoercedValue::Text(text.to_string())
}
