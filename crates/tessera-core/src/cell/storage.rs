//! Cell storage implementation
//!
//! Sparse storage for a worksheet's cells. Only cells that were referenced are
//! stored, using a row-based BTreeMap structure so iteration is row-major.

use std::collections::BTreeMap;

use super::Cell;

/// Sparse, auto-vivifying grid of cells
///
/// Rows are allocated on first write; reading an address that was never
/// written returns `None` rather than failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetData {
    /// Row-based storage: row_index -> (col_index -> Cell)
    rows: BTreeMap<u32, BTreeMap<u32, Cell>>,
}

impl SheetData {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell
    pub fn get(&self, row: u32, col: u32) -> Option<&Cell> {
        self.rows.get(&row)?.get(&col)
    }

    /// Get a mutable reference to a cell
    pub fn get_mut(&mut self, row: u32, col: u32) -> Option<&mut Cell> {
        self.rows.get_mut(&row)?.get_mut(&col)
    }

    /// Get the cell at an address, creating an empty one on first reference
    pub fn get_or_create(&mut self, row: u32, col: u32) -> &mut Cell {
        self.rows
            .entry(row)
            .or_default()
            .entry(col)
            .or_insert_with(|| Cell::new(row, col))
    }

    /// Store a cell, replacing whatever was there
    ///
    /// The cell's own position is rewritten to the grid address.
    pub fn set(&mut self, row: u32, col: u32, mut cell: Cell) {
        cell.row = row;
        cell.col = col;
        self.rows.entry(row).or_default().insert(col, cell);
    }

    /// Allocate storage for a row without adding cells
    pub fn ensure_row(&mut self, row: u32) {
        self.rows.entry(row).or_default();
    }

    /// Drop an entire row
    pub fn clear_row(&mut self, row: u32) {
        self.rows.remove(&row);
    }

    /// Check whether a row has been allocated
    pub fn has_row(&self, row: u32) -> bool {
        self.rows.contains_key(&row)
    }

    /// Iterate over all cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.rows.values().flat_map(|cols| cols.values())
    }

    /// Iterate over cells in a row, in column order
    ///
    /// A row that was never allocated yields nothing.
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = &Cell> {
        self.rows.get(&row).into_iter().flat_map(|cols| cols.values())
    }

    /// Indices of allocated rows, ascending
    pub fn row_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.keys().copied()
    }

    /// Number of stored cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Check if no cells are stored
    pub fn is_empty(&self) -> bool {
        self.rows.values().all(BTreeMap::is_empty)
    }

    /// Bounding box of stored cells as (min_row, min_col, max_row, max_col)
    pub fn used_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;

        for (&row, cols) in &self.rows {
            let (Some(&first), Some(&last)) = (cols.keys().next(), cols.keys().next_back()) else {
                continue;
            };
            bounds = Some(match bounds {
                None => (row, first, row, last),
                Some((r0, c0, _, c1)) => (r0, c0.min(first), row, c1.max(last)),
            });
        }

        bounds
    }
}
