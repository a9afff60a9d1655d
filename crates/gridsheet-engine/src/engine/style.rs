//! Visual formatting attributes of a cell.
//!
//! Every attribute parses from the same strings the interchange format uses,
//! so front ends and the JSON layer share one vocabulary.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Font families offered by the toolbar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    #[default]
    Monospace,
    SansSerif,
    Fantasy,
    Cursive,
}

impl FontFamily {
    pub const ALL: [FontFamily; 4] = [
        FontFamily::Monospace,
        FontFamily::SansSerif,
        FontFamily::Fantasy,
        FontFamily::Cursive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FontFamily::Monospace => "monospace",
            FontFamily::SansSerif => "sans-serif",
            FontFamily::Fantasy => "fantasy",
            FontFamily::Cursive => "cursive",
        }
    }
}

impl FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FontFamily::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown font family: {}", s))
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Font size in pixels.
///
/// Serialized with a `px` unit suffix (`"16px"`). Deserialization also accepts
/// the bare forms older exports contain (`"16"` or `16`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontSize(u32);

impl FontSize {
    pub const DEFAULT: FontSize = FontSize(14);
    pub const MAX: u32 = 400;
    /// Sizes offered by the toolbar.
    pub const PRESETS: [u32; 4] = [14, 16, 18, 20];

    pub fn new(px: u32) -> Option<FontSize> {
        (1..=Self::MAX).contains(&px).then_some(FontSize(px))
    }

    pub fn px(&self) -> u32 {
        self.0
    }
}

impl Default for FontSize {
    fn default() -> Self {
        FontSize::DEFAULT
    }
}

impl FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix("px").unwrap_or(trimmed).trim_end();
        digits
            .parse::<u32>()
            .ok()
            .and_then(FontSize::new)
            .ok_or_else(|| format!("Invalid font size: {}", s))
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

impl Serialize for FontSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FontSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FontSizeVisitor;

        impl Visitor<'_> for FontSizeVisitor {
            type Value = FontSize;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a font size such as \"14px\", \"14\" or 14")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<FontSize, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<FontSize, E> {
                u32::try_from(v)
                    .ok()
                    .and_then(FontSize::new)
                    .ok_or_else(|| E::custom(format!("Invalid font size: {}", v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<FontSize, E> {
                u64::try_from(v)
                    .map_err(|_| E::custom(format!("Invalid font size: {}", v)))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<FontSize, E> {
                if v.fract() == 0.0 && v >= 0.0 {
                    self.visit_u64(v as u64)
                } else {
                    Err(E::custom(format!("Invalid font size: {}", v)))
                }
            }
        }

        deserializer.deserialize_any(FontSizeVisitor)
    }
}

/// Horizontal text alignment inside a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Start => "start",
            TextAlign::Center => "center",
            TextAlign::End => "end",
        }
    }
}

impl FromStr for TextAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "left" => Ok(TextAlign::Start),
            "center" | "centre" => Ok(TextAlign::Center),
            "end" | "right" => Ok(TextAlign::End),
            _ => Err(format!("Unknown alignment: {}", s)),
        }
    }
}

impl fmt::Display for TextAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An RGB color written as a `#rrggbb` hex string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }
}

impl FromStr for Rgb {
    type Err = String;

    /// Accepts `#rrggbb` and the `#rgb` shorthand, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid color: {} (expected #rrggbb)", s);
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Rgb::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 0x11);
                Ok(Rgb::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
