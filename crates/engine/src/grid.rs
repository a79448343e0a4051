use std::collections::HashMap;

use serde::Serialize;

use super::cell::{Cell, CellKind};
use super::events::GridChange;
use super::role::{self, Role};

/// Title a new document starts with.
pub const DEFAULT_TITLE: &str = "TITLE";

/// Rectangular RACI grid.
///
/// Every `(row, col)` inside `rows × cols` holds exactly one cell and nothing
/// exists outside it. Row 0 and column 0 are labels and can't be removed or
/// reordered. Mutators return the change they made, or `None` when the
/// request was invalid and nothing happened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    cells: HashMap<(usize, usize), Cell>,
    rows: usize,
    cols: usize,
}

/// Plain snapshot of a grid, row-major.
#[derive(Debug, Clone, Serialize)]
pub struct GridSnapshot {
    pub title: String,
    pub rows: usize,
    pub cols: usize,
    pub values: Vec<Vec<String>>,
    /// Style id per cell; labels are `None`
    pub styles: Vec<Vec<Option<&'static str>>>,
}

impl Grid {
    /// An empty grid (no cells at all).
    pub fn new() -> Self {
        Self::default()
    }

    /// A 1×1 grid holding only the origin cell.
    pub fn with_title(title: &str) -> Self {
        let mut grid = Self::new();
        grid.cells.insert((0, 0), Cell::new(0, 0, title));
        grid.rows = 1;
        grid.cols = 1;
        grid
    }

    /// Rebuild a grid from a rectangular table of strings.
    ///
    /// `title` replaces whatever `table[0][0]` holds. Returns `None` when the
    /// table is empty or any row's length differs from the first row's.
    pub fn from_table(title: &str, table: &[Vec<String>]) -> Option<Self> {
        let cols = table.first()?.len();
        if cols == 0 || table.iter().any(|row| row.len() != cols) {
            return None;
        }

        let mut grid = Self::new();
        for (r, row) in table.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let value = if (r, c) == (0, 0) { title } else { value.as_str() };
                grid.cells.insert((r, c), Cell::new(r, c, value));
            }
        }
        grid.rows = table.len();
        grid.cols = cols;
        Some(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Text at `(row, col)`, empty when out of range.
    pub fn value(&self, row: usize, col: usize) -> &str {
        self.cells
            .get(&(row, col))
            .map(|c| c.value())
            .unwrap_or_default()
    }

    /// Title held by the origin cell.
    pub fn title(&self) -> &str {
        self.value(0, 0)
    }

    /// Role of a data cell; `None` for labels or out of range.
    pub fn role(&self, row: usize, col: usize) -> Option<Role> {
        self.cells.get(&(row, col)).and_then(|c| c.role())
    }

    /// Iterate cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        (0..self.rows).flat_map(move |r| (0..self.cols).filter_map(move |c| self.cells.get(&(r, c))))
    }

    /// Number of cells actually stored.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Values as a row-major table.
    pub fn table(&self) -> Vec<Vec<String>> {
        (0..self.rows)
            .map(|r| (0..self.cols).map(|c| self.value(r, c).to_string()).collect())
            .collect()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        let styles = (0..self.rows)
            .map(|r| {
                (0..self.cols)
                    .map(|c| self.role(r, c).map(|role| role.style()))
                    .collect()
            })
            .collect();
        GridSnapshot {
            title: self.title().to_string(),
            rows: self.rows,
            cols: self.cols,
            values: self.table(),
            styles,
        }
    }

    /// Longest label (in chars) in column 0, title included.
    pub fn longest_row_label(&self) -> usize {
        (0..self.rows)
            .map(|r| self.value(r, 0).chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Longest column-header label (in chars).
    pub fn longest_col_label(&self) -> usize {
        (1..self.cols)
            .map(|c| self.value(0, c).chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Check the fully-populated invariant. Used by tests and debug builds.
    pub fn is_consistent(&self) -> bool {
        if self.cells.len() != self.rows * self.cols {
            return false;
        }
        self.cells.iter().all(|(&(r, c), cell)| {
            r < self.rows
                && c < self.cols
                && cell.row() == r
                && cell.col() == c
                && cell.kind() == CellKind::at(r, c)
        })
    }

    // =========================================================================
    // Boundary queries
    // =========================================================================

    pub fn can_delete_row(&self, row: usize) -> bool {
        row > 0 && row < self.rows
    }

    pub fn can_delete_col(&self, col: usize) -> bool {
        col > 0 && col < self.cols
    }

    pub fn can_move_row_up(&self, row: usize) -> bool {
        row > 1 && row < self.rows
    }

    pub fn can_move_row_down(&self, row: usize) -> bool {
        row >= 1 && row + 1 < self.rows
    }

    pub fn can_move_col_left(&self, col: usize) -> bool {
        col > 1 && col < self.cols
    }

    pub fn can_move_col_right(&self, col: usize) -> bool {
        col >= 1 && col + 1 < self.cols
    }

    // =========================================================================
    // Structural edits
    // =========================================================================

    /// Append a row labeled `ROW {n}` with empty data cells.
    pub fn add_row(&mut self) -> Option<GridChange> {
        if self.is_empty() {
            return None;
        }
        let row = self.rows;
        for col in 0..self.cols {
            let value = if col == 0 { format!("ROW {}", row) } else { String::new() };
            self.cells.insert((row, col), Cell::new(row, col, value));
        }
        self.rows += 1;
        log::debug!("added row {} ({}x{})", row, self.rows, self.cols);
        Some(GridChange::RowAdded { row })
    }

    /// Append a column labeled `COL {n}` with empty data cells.
    pub fn add_col(&mut self) -> Option<GridChange> {
        if self.is_empty() {
            return None;
        }
        let col = self.cols;
        for row in 0..self.rows {
            let value = if row == 0 { format!("COL {}", col) } else { String::new() };
            self.cells.insert((row, col), Cell::new(row, col, value));
        }
        self.cols += 1;
        log::debug!("added column {} ({}x{})", col, self.rows, self.cols);
        Some(GridChange::ColumnAdded { col })
    }

    /// Delete a data row, shifting the rows below it up.
    pub fn delete_row(&mut self, row: usize) -> Option<GridChange> {
        if !self.can_delete_row(row) {
            return None;
        }

        for col in 0..self.cols {
            self.cells.remove(&(row, col));
        }

        // Shift rows below up, in ascending order so no key is overwritten
        for r in row + 1..self.rows {
            for col in 0..self.cols {
                if let Some(mut cell) = self.cells.remove(&(r, col)) {
                    cell.relocate(r - 1, col);
                    self.cells.insert((r - 1, col), cell);
                }
            }
        }

        self.rows -= 1;
        log::debug!("deleted row {} ({}x{})", row, self.rows, self.cols);
        Some(GridChange::RowRemoved { row })
    }

    /// Delete a data column, shifting the columns right of it left.
    pub fn delete_col(&mut self, col: usize) -> Option<GridChange> {
        if !self.can_delete_col(col) {
            return None;
        }

        for row in 0..self.rows {
            self.cells.remove(&(row, col));
        }

        for c in col + 1..self.cols {
            for row in 0..self.rows {
                if let Some(mut cell) = self.cells.remove(&(row, c)) {
                    cell.relocate(row, c - 1);
                    self.cells.insert((row, c - 1), cell);
                }
            }
        }

        self.cols -= 1;
        log::debug!("deleted column {} ({}x{})", col, self.rows, self.cols);
        Some(GridChange::ColumnRemoved { col })
    }

    /// Exchange the full contents of two data rows.
    pub fn swap_rows(&mut self, a: usize, b: usize) -> Option<GridChange> {
        if a == b || !self.can_delete_row(a) || !self.can_delete_row(b) {
            return None;
        }
        for col in 0..self.cols {
            self.swap_cells((a, col), (b, col));
        }
        Some(GridChange::RowsSwapped { a, b })
    }

    /// Exchange the full contents of two data columns.
    pub fn swap_cols(&mut self, a: usize, b: usize) -> Option<GridChange> {
        if a == b || !self.can_delete_col(a) || !self.can_delete_col(b) {
            return None;
        }
        for row in 0..self.rows {
            self.swap_cells((row, a), (row, b));
        }
        Some(GridChange::ColumnsSwapped { a, b })
    }

    fn swap_cells(&mut self, a: (usize, usize), b: (usize, usize)) {
        if let (Some(mut cell_a), Some(mut cell_b)) = (self.cells.remove(&a), self.cells.remove(&b)) {
            cell_a.relocate(b.0, b.1);
            cell_b.relocate(a.0, a.1);
            self.cells.insert(b, cell_a);
            self.cells.insert(a, cell_b);
        }
    }

    // =========================================================================
    // Cell edits
    // =========================================================================

    /// Overwrite a cell's text. Any existing cell may be edited.
    pub fn set_value(&mut self, row: usize, col: usize, value: &str) -> Option<GridChange> {
        let cell = self.cells.get_mut(&(row, col))?;
        cell.set_value(value);
        Some(GridChange::CellChanged { row, col })
    }

    /// Advance a data cell to the next role.
    pub fn cycle_role(&mut self, row: usize, col: usize) -> Option<GridChange> {
        let cell = self.cells.get_mut(&(row, col)).filter(|c| c.is_data())?;
        let next = role::cycle(cell.value());
        cell.set_value(next.label());
        Some(GridChange::CellChanged { row, col })
    }
}
