//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell references
//! (e.g., "A1", "B2", "Z100") and zero-indexed column/row coordinates.
//! The grid is fixed at [`MAX_COLS`] columns (A-Z) by [`MAX_ROWS`] rows.
//!
//! # Examples
//!
//! ```
//! use gridsheet_engine::engine::CellRef;
//!
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.col, 1); // 0-indexed
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// Number of columns in a sheet (A-Z).
pub const MAX_COLS: usize = 26;

/// Number of rows in a sheet (1-100).
pub const MAX_ROWS: usize = 100;

/// A reference to a cell by column and row indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

fn a1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letter>[A-Za-z])(?<number>[0-9]{1,3})$")
            .expect("cell reference regex must compile")
    })
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Build a reference only if it lies inside the grid.
    pub fn checked(col: usize, row: usize) -> Option<CellRef> {
        (col < MAX_COLS && row < MAX_ROWS).then_some(CellRef { row, col })
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A1", "z100").
    /// Returns None if the input is invalid or outside the grid.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        Self::parse_a1(name.trim())
    }

    fn parse_a1(name: &str) -> Option<CellRef> {
        let caps = a1_re().captures(name)?;
        let letter = caps["letter"].as_bytes()[0].to_ascii_uppercase();
        let col = (letter - b'A') as usize;
        let row = caps["number"].parse::<usize>().ok()?.checked_sub(1)?;
        CellRef::checked(col, row)
    }

    /// Convert column index to its letter (0 -> A, 25 -> Z).
    ///
    /// Indices past the grid wrap into multi-letter names so that display code
    /// never panics on an out-of-range column.
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }

    /// Iterate every address of the grid in row-major order (A1, B1, ... Z100).
    pub fn all() -> impl Iterator<Item = CellRef> {
        (0..MAX_ROWS).flat_map(|row| (0..MAX_COLS).map(move |col| CellRef::new(col, row)))
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s.trim()).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}

impl Serialize for CellRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CellRefVisitor;

        impl Visitor<'_> for CellRefVisitor {
            type Value = CellRef;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a cell address between A1 and Z100")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<CellRef, E> {
                CellRef::from_str(v)
                    .ok_or_else(|| E::custom(format!("invalid cell address: {}", v)))
            }
        }

        deserializer.deserialize_str(CellRefVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{CellRef, MAX_COLS, MAX_ROWS};

    #[test]
    fn test_parse_single_letter_columns() {
        assert_eq!(CellRef::from_str("A1"), Some(CellRef::new(0, 0)));
        assert_eq!(CellRef::from_str("B1"), Some(CellRef::new(1, 0)));
        assert_eq!(CellRef::from_str("Z1"), Some(CellRef::new(25, 0)));
    }

    #[test]
    fn test_parse_row_bounds() {
        assert_eq!(CellRef::from_str("A100"), Some(CellRef::new(0, 99)));
        assert!(CellRef::from_str("A101").is_none());
        assert!(CellRef::from_str("A0").is_none());
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(CellRef::from_str("c7"), Some(CellRef::new(2, 6)));
    }

    #[test]
    fn test_parse_rejects_multi_letter_and_garbage() {
        assert!(CellRef::from_str("").is_none());
        assert!(CellRef::from_str("AA1").is_none());
        assert!(CellRef::from_str("123").is_none());
        assert!(CellRef::from_str("1A").is_none());
        assert!(CellRef::from_str("A 1").is_none());
        assert!(CellRef::from_str("A0001").is_none());
    }

    #[test]
    fn test_display_round_trips() {
        for cell in [CellRef::new(0, 0), CellRef::new(25, 99), CellRef::new(7, 41)] {
            assert_eq!(CellRef::from_str(&cell.to_string()), Some(cell));
        }
    }

    #[test]
    fn test_checked_rejects_outside_grid() {
        assert!(CellRef::checked(MAX_COLS, 0).is_none());
        assert!(CellRef::checked(0, MAX_ROWS).is_none());
        assert!(CellRef::checked(MAX_COLS - 1, MAX_ROWS - 1).is_some());
    }

    #[test]
    fn test_all_covers_grid_in_row_major_order() {
        let all: Vec<CellRef> = CellRef::all().collect();
        assert_eq!(all.len(), 2600);
        assert_eq!(all[0].to_string(), "A1");
        assert_eq!(all[1].to_string(), "B1");
        assert_eq!(all[26].to_string(), "A2");
        assert_eq!(all[2599].to_string(), "Z100");
    }

    #[test]
    fn test_serde_uses_a1_string() {
        let json = serde_json::to_string(&CellRef::new(1, 2)).unwrap();
        assert_eq!(json, "\"B3\"");
        let back: CellRef = serde_json::from_str("\"b3\"").unwrap();
        assert_eq!(back, CellRef::new(1, 2));
        assert!(serde_json::from_str::<CellRef>("\"AA1\"").is_err());
    }
}
