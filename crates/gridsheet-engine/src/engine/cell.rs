//! Cell data structures for the spreadsheet grid.
//!
//! - [`Cell`] - A cell record: text content plus its visual formatting
//! - [`is_valid_input`] - The typed-input rule (empty, numeric or alphabetic)
//! - [`parse_number`] - Leading-prefix number parsing used by range functions

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::style::{FontFamily, FontSize, Rgb, TextAlign};

/// A cell in the spreadsheet grid.
///
/// The serialized field names match the JSON interchange format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CellRecord")]
pub struct Cell {
    pub content: String,
    pub font_family: FontFamily,
    pub font_size: FontSize,
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_underlined: bool,
    pub text_align: TextAlign,
    pub color: Rgb,
    pub background_color: Rgb,
}

/// Incoming cell record. Every field is optional, and older exports spell the
/// font fields `fontFamily_data` / `fontSize_data`. When both spellings are
/// present the current one wins.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CellRecord {
    content: Option<String>,
    font_family: Option<FontFamily>,
    #[serde(rename = "fontFamily_data")]
    legacy_font_family: Option<FontFamily>,
    font_size: Option<FontSize>,
    #[serde(rename = "fontSize_data")]
    legacy_font_size: Option<FontSize>,
    is_bold: Option<bool>,
    is_italic: Option<bool>,
    is_underlined: Option<bool>,
    text_align: Option<TextAlign>,
    color: Option<Rgb>,
    background_color: Option<Rgb>,
}

impl From<CellRecord> for Cell {
    fn from(record: CellRecord) -> Self {
        let defaults = Cell::default();
        Cell {
            content: record.content.unwrap_or(defaults.content),
            font_family: record
                .font_family
                .or(record.legacy_font_family)
                .unwrap_or(defaults.font_family),
            font_size: record
                .font_size
                .or(record.legacy_font_size)
                .unwrap_or(defaults.font_size),
            is_bold: record.is_bold.unwrap_or(defaults.is_bold),
            is_italic: record.is_italic.unwrap_or(defaults.is_italic),
            is_underlined: record.is_underlined.unwrap_or(defaults.is_underlined),
            text_align: record.text_align.unwrap_or(defaults.text_align),
            color: record.color.unwrap_or(defaults.color),
            background_color: record.background_color.unwrap_or(defaults.background_color),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            content: String::new(),
            font_family: FontFamily::default(),
            font_size: FontSize::DEFAULT,
            is_bold: false,
            is_italic: false,
            is_underlined: false,
            text_align: TextAlign::default(),
            color: Rgb::BLACK,
            background_color: Rgb::WHITE,
        }
    }
}

impl Cell {
    pub fn new_text(text: &str) -> Cell {
        Cell {
            content: text.to_string(),
            ..Cell::default()
        }
    }

    /// Numeric value of the content, if it has one.
    pub fn number(&self) -> Option<f64> {
        parse_number(&self.content)
    }
}

fn numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?\s*$")
            .expect("numeric input regex must compile")
    })
}

fn alphabetic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z]+$").expect("alphabetic input regex must compile"))
}

fn number_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
            .expect("number prefix regex must compile")
    })
}

/// Whether typed input is acceptable cell content.
///
/// Accepts the empty (or all-whitespace) string, a decimal number, or a run of
/// ASCII letters. Anything else (mixed text, punctuation, spaces between
/// words) is rejected.
pub fn is_valid_input(value: &str) -> bool {
    value.trim().is_empty() || numeric_re().is_match(value) || alphabetic_re().is_match(value)
}

/// Parse the leading number of `content`.
///
/// Mirrors a lenient float parse: leading whitespace is skipped and trailing
/// garbage ignored, so `"12abc"` is 12. Returns `None` when no number starts
/// the string or the value is not finite.
pub fn parse_number(content: &str) -> Option<f64> {
    let caps = number_prefix_re().captures(content)?;
    caps[1].parse::<f64>().ok().filter(|n| n.is_finite())
}
