//! The session's cell store: completed, flagged and selected sets.
//!
//! Each set is an insertion-ordered list keyed by [`CellKey`]; membership is a
//! linear scan over at most 54 slots. Sets may overlap freely.

use serde::{Deserialize, Serialize};

use crate::types::{Cell, CellKey};

/// Insertion-ordered set of cells with identity-based membership.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<Cell>", from = "Vec<Cell>")]
pub struct CellSet {
    cells: Vec<Cell>,
}

impl From<Vec<Cell>> for CellSet {
    fn from(cells: Vec<Cell>) -> Self {
        Self::from_cells(cells)
    }
}

impl From<CellSet> for Vec<Cell> {
    fn from(set: CellSet) -> Self {
        set.cells
    }
}

impl CellSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a restored list, dropping duplicate identities (first wins).
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        let mut set = Self::new();
        for cell in cells {
            set.insert(cell);
        }
        set
    }

    /// Insert `cell` unless its key is already present. Returns true if inserted.
    pub fn insert(&mut self, cell: Cell) -> bool {
        if self.contains(&cell.key) {
            return false;
        }
        self.cells.push(cell);
        true
    }

    /// Remove the cell with `key`. Returns true if something was removed.
    pub fn remove(&mut self, key: &CellKey) -> bool {
        let before = self.cells.len();
        self.cells.retain(|c| c.key != *key);
        self.cells.len() != before
    }

    pub fn contains(&self, key: &CellKey) -> bool {
        self.cells.iter().any(|c| c.key == *key)
    }

    /// 0-based insertion position of `key`.
    pub fn position(&self, key: &CellKey) -> Option<usize> {
        self.cells.iter().position(|c| c.key == *key)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.cells.iter().map(|c| c.key)
    }

    pub fn as_slice(&self) -> &[Cell] {
        &self.cells
    }
}

impl<'a> IntoIterator for &'a CellSet {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Persisted shape of the store: `{completedCells, flaggedCells, selectedCells}`.
///
/// On load every field is optional; a missing field leaves the corresponding
/// set untouched so partial restores compose.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_cells: Option<Vec<Cell>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flagged_cells: Option<Vec<Cell>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_cells: Option<Vec<Cell>>,
}

/// The three cell sets owned by one session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Store {
    completed: CellSet,
    flagged: CellSet,
    selected: CellSet,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ── completed ──

    /// Record a finished trial. Completion order is preserved.
    pub fn add_completed(&mut self, cell: Cell) -> bool {
        self.completed.insert(cell)
    }

    pub fn is_completed(&self, key: &CellKey) -> bool {
        self.completed.contains(key)
    }

    /// 1-based completion sequence number shown on the grid.
    pub fn sequence_number(&self, key: &CellKey) -> Option<usize> {
        self.completed.position(key).map(|p| p + 1)
    }

    pub fn completed(&self) -> &CellSet {
        &self.completed
    }

    // ── selected ──

    pub fn add_selected(&mut self, cell: Cell) -> bool {
        self.selected.insert(cell)
    }

    pub fn remove_selected(&mut self, key: &CellKey) -> bool {
        self.selected.remove(key)
    }

    pub fn is_selected(&self, key: &CellKey) -> bool {
        self.selected.contains(key)
    }

    pub fn clear_selected(&mut self) {
        self.selected.clear();
    }

    pub fn selected(&self) -> &CellSet {
        &self.selected
    }

    // ── flagged ──

    pub fn add_flagged(&mut self, cell: Cell) -> bool {
        self.flagged.insert(cell)
    }

    pub fn remove_flagged(&mut self, key: &CellKey) -> bool {
        self.flagged.remove(key)
    }

    pub fn is_flagged(&self, key: &CellKey) -> bool {
        self.flagged.contains(key)
    }

    pub fn clear_flagged(&mut self) {
        self.flagged.clear();
    }

    pub fn flagged(&self) -> &CellSet {
        &self.flagged
    }

    // ── wholesale sync ──

    /// Full payload for a save.
    pub fn snapshot(&self) -> StudentData {
        StudentData {
            completed_cells: Some(self.completed.as_slice().to_vec()),
            flagged_cells: Some(self.flagged.as_slice().to_vec()),
            selected_cells: Some(self.selected.as_slice().to_vec()),
        }
    }

    /// Replace each set present in `data`; absent sets keep their current contents.
    pub fn restore(&mut self, data: StudentData) {
        if let Some(cells) = data.completed_cells {
            self.completed = CellSet::from_cells(cells);
        }
        if let Some(cells) = data.flagged_cells {
            self.flagged = CellSet::from_cells(cells);
        }
        if let Some(cells) = data.selected_cells {
            self.selected = CellSet::from_cells(cells);
        }
    }
}
