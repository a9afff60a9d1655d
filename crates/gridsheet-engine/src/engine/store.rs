//! Sparse, insertion-ordered cell storage for one sheet.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use super::cell::Cell;
use super::cell_ref::CellRef;

/// Mapping from cell address to cell record.
///
/// Iteration follows the order in which addresses were first written, which
/// makes "first occurrence" operations deterministic and keeps the exported
/// JSON stable. Cloning is the copy-on-write primitive: mutations build a new
/// store and replace the old one wholesale.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(try_from = "IndexMap<String, Cell>")]
pub struct CellStore {
    cells: IndexMap<CellRef, Cell>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        self.cells.contains_key(cell_ref)
    }

    pub fn get(&self, cell_ref: &CellRef) -> Option<&Cell> {
        self.cells.get(cell_ref)
    }

    /// The stored record, or the default record for an unset address.
    pub fn get_or_default(&self, cell_ref: &CellRef) -> Cell {
        self.cells.get(cell_ref).cloned().unwrap_or_default()
    }

    /// Content of a cell; empty for an unset address.
    pub fn content(&self, cell_ref: &CellRef) -> &str {
        self.cells.get(cell_ref).map_or("", |c| c.content.as_str())
    }

    /// Mutable access to a record, creating the default record on first use.
    pub fn entry(&mut self, cell_ref: CellRef) -> &mut Cell {
        self.cells.entry(cell_ref).or_default()
    }

    /// Insert or replace a record. A replaced record keeps its position.
    pub fn insert(&mut self, cell_ref: CellRef, cell: Cell) {
        self.cells.insert(cell_ref, cell);
    }

    /// Addresses in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &CellRef> {
        self.cells.keys()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&CellRef, &Cell)> {
        self.cells.iter()
    }
}

// Order matters: two stores with the same records written in a different
// order export differently.
impl PartialEq for CellStore {
    fn eq(&self, other: &Self) -> bool {
        self.cells.len() == other.cells.len() && self.cells.iter().eq(other.cells.iter())
    }
}

impl FromIterator<(CellRef, Cell)> for CellStore {
    fn from_iter<I: IntoIterator<Item = (CellRef, Cell)>>(iter: I) -> Self {
        CellStore {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Serialize for CellStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.cells.serialize(serializer)
    }
}

/// Addresses are case-insensitive, so `a1` and `A1` in one object name the
/// same cell and are rejected rather than merged.
impl TryFrom<IndexMap<String, Cell>> for CellStore {
    type Error = String;

    fn try_from(raw: IndexMap<String, Cell>) -> Result<Self, Self::Error> {
        let mut cells = IndexMap::with_capacity(raw.len());
        for (key, cell) in raw {
            let cell_ref =
                CellRef::from_str(&key).ok_or_else(|| format!("invalid cell address: {}", key))?;
            if cells.insert(cell_ref, cell).is_some() {
                return Err(format!("duplicate cell address: {}", cell_ref));
            }
        }
        Ok(CellStore { cells })
    }
}
