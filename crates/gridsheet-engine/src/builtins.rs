//! Built-in range functions and text cleanup operations.
//!
//! Conventions:
//! - Spreadsheet-facing names are ALL CAPS (e.g. `SUM`, `REMOVE_DUPLICATES`).
//! - Range functions are pure reducers over an explicit list of addresses.
//! - Store-wide text operations return a new [`CellStore`]; they never mutate
//!   their input.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::engine::{CellRef, CellStore, parse_number};

/// Range functions offered by the function selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Aggregate {
    Sum,
    Average,
    Max,
    Min,
    Count,
}

impl Aggregate {
    pub const ALL: [Aggregate; 5] = [
        Aggregate::Sum,
        Aggregate::Average,
        Aggregate::Max,
        Aggregate::Min,
        Aggregate::Count,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Aggregate::Sum => "SUM",
            Aggregate::Average => "AVERAGE",
            Aggregate::Max => "MAX",
            Aggregate::Min => "MIN",
            Aggregate::Count => "COUNT",
        }
    }

    /// Evaluate over `range`. Only AVERAGE of an empty range yields `None`.
    pub fn evaluate(&self, store: &CellStore, range: &[CellRef]) -> Option<f64> {
        match self {
            Aggregate::Sum => Some(sum(store, range)),
            Aggregate::Average => average(store, range),
            Aggregate::Max => Some(max(store, range)),
            Aggregate::Min => Some(min(store, range)),
            Aggregate::Count => Some(count(store, range) as f64),
        }
    }
}

impl FromStr for Aggregate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Aggregate::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown function: {}", s))
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn numbers<'a>(store: &'a CellStore, range: &'a [CellRef]) -> impl Iterator<Item = Option<f64>> + 'a {
    range.iter().map(|r| parse_number(store.content(r)))
}

/// Total of the numeric contents; non-numeric and unset cells contribute 0.
pub fn sum(store: &CellStore, range: &[CellRef]) -> f64 {
    numbers(store, range).map(|n| n.unwrap_or(0.0)).sum()
}

/// `sum / |range|`, or `None` when the range is empty.
pub fn average(store: &CellStore, range: &[CellRef]) -> Option<f64> {
    if range.is_empty() {
        return None;
    }
    Some(sum(store, range) / range.len() as f64)
}

/// Largest numeric content. `-inf` when the range holds no numbers.
pub fn max(store: &CellStore, range: &[CellRef]) -> f64 {
    numbers(store, range)
        .map(|n| n.unwrap_or(f64::NEG_INFINITY))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Smallest numeric content. `+inf` when the range holds no numbers.
pub fn min(store: &CellStore, range: &[CellRef]) -> f64 {
    numbers(store, range)
        .map(|n| n.unwrap_or(f64::INFINITY))
        .fold(f64::INFINITY, f64::min)
}

/// Number of cells whose content reads as a finite number.
pub fn count(store: &CellStore, range: &[CellRef]) -> usize {
    numbers(store, range).filter(Option::is_some).count()
}

/// Single-cell content transforms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextTransform {
    Trim,
    Upper,
    Lower,
}

impl TextTransform {
    pub fn name(&self) -> &'static str {
        match self {
            TextTransform::Trim => "TRIM",
            TextTransform::Upper => "UPPER",
            TextTransform::Lower => "LOWER",
        }
    }

    pub fn apply(&self, content: &str) -> String {
        match self {
            TextTransform::Trim => content.trim().to_string(),
            TextTransform::Upper => content.to_uppercase(),
            TextTransform::Lower => content.to_lowercase(),
        }
    }
}

/// Keep only the first record (in insertion order) for each distinct content.
///
/// Surviving records stay under the address of that first occurrence.
pub fn remove_duplicates(store: &CellStore) -> CellStore {
    let mut seen: HashSet<&str> = HashSet::new();
    store
        .iter()
        .filter(|(_, cell)| seen.insert(cell.content.as_str()))
        .map(|(cell_ref, cell)| (*cell_ref, cell.clone()))
        .collect()
}

/// Replace every literal occurrence of `search` with `replace` in all cells.
///
/// `search` is never interpreted as a pattern. Returns the new store and the
/// number of cells that changed. An empty `search` changes nothing.
pub fn find_and_replace(store: &CellStore, search: &str, replace: &str) -> (CellStore, usize) {
    let mut out = store.clone();
    if search.is_empty() {
        return (out, 0);
    }
    let mut changed = 0;
    for (cell_ref, cell) in store.iter() {
        if cell.content.contains(search) {
            out.entry(*cell_ref).content = cell.content.replace(search, replace);
            changed += 1;
        }
    }
    (out, changed)
}
