//! Editor session state for one RACI document.
//!
//! `Document` owns the grid plus the metadata a front end needs (filename,
//! dirty flag, view mode) and is the only thing that mutates the grid. Every
//! editor command returns `true` when it changed something; invalid requests
//! return `false`, emit nothing and leave the dirty flag alone.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::events::{DocumentEvent, EventCallback, GridChange};
use crate::grid::{Grid, DEFAULT_TITLE};

/// Presentation toggle. Expanded shows reorder/delete controls on headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Compact,
    Expanded,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Compact => ViewMode::Expanded,
            ViewMode::Expanded => ViewMode::Compact,
        }
    }
}

pub struct Document {
    grid: Grid,
    filename: Option<PathBuf>,
    dirty: bool,
    view_mode: ViewMode,
    listeners: Vec<EventCallback>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("grid", &self.grid)
            .field("filename", &self.filename)
            .field("dirty", &self.dirty)
            .field("view_mode", &self.view_mode)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A new, clean, unsaved document holding a 1×1 grid.
    pub fn new() -> Self {
        Self {
            grid: Grid::with_title(DEFAULT_TITLE),
            filename: None,
            dirty: false,
            view_mode: ViewMode::default(),
            listeners: Vec::new(),
        }
    }

    /// Register an observer for document events.
    pub fn subscribe(&mut self, callback: EventCallback) {
        self.listeners.push(callback);
    }

    fn emit(&mut self, event: DocumentEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    fn set_dirty(&mut self, dirty: bool) {
        if self.dirty != dirty {
            self.dirty = dirty;
            self.emit(DocumentEvent::DirtyChanged(dirty));
        }
    }

    fn set_filename(&mut self, filename: Option<PathBuf>) {
        if self.filename != filename {
            self.filename = filename.clone();
            self.emit(DocumentEvent::FilenameChanged(filename));
        }
    }

    /// Record a grid edit: notify, then mark dirty.
    fn commit(&mut self, change: Option<GridChange>) -> bool {
        match change {
            Some(change) => {
                self.emit(DocumentEvent::Grid(change));
                self.set_dirty(true);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Title mirrored from the origin cell.
    pub fn title(&self) -> &str {
        self.grid.title()
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// True when discarding the document would lose user edits.
    ///
    /// A 1×1 grid never counts: there is nothing in it besides the title.
    pub fn has_unsaved_data(&self) -> bool {
        self.dirty && (self.grid.rows() > 1 || self.grid.cols() > 1)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// New-document command: 1×1 grid, no filename, clean.
    pub fn reset(&mut self) {
        self.install_grid(Grid::with_title(DEFAULT_TITLE), None);
    }

    /// Replace the grid wholesale after a successful load. Marks clean.
    pub fn install_grid(&mut self, grid: Grid, filename: Option<PathBuf>) {
        let (rows, cols) = (grid.rows(), grid.cols());
        self.grid = grid;
        self.emit(DocumentEvent::Grid(GridChange::Reset { rows, cols }));
        self.set_filename(filename);
        self.set_dirty(false);
    }

    /// Record a successful write to `filename`. Marks clean.
    pub fn mark_saved(&mut self, filename: PathBuf) {
        self.set_filename(Some(filename));
        self.set_dirty(false);
    }

    /// Tear the document down to an empty grid.
    pub fn close(&mut self) {
        self.grid = Grid::new();
        self.set_filename(None);
        self.set_dirty(false);
        self.emit(DocumentEvent::Closed);
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.view_mode != mode {
            self.view_mode = mode;
            self.emit(DocumentEvent::ViewModeChanged(mode));
        }
    }

    /// Toggle-view-mode command. Does not touch the dirty flag.
    pub fn toggle_view_mode(&mut self) -> ViewMode {
        self.set_view_mode(self.view_mode.toggled());
        self.view_mode
    }

    // =========================================================================
    // Editor commands
    // =========================================================================

    pub fn add_row(&mut self) -> bool {
        let change = self.grid.add_row();
        self.commit(change)
    }

    pub fn add_col(&mut self) -> bool {
        let change = self.grid.add_col();
        self.commit(change)
    }

    pub fn delete_row(&mut self, row: usize) -> bool {
        let change = self.grid.delete_row(row);
        self.commit(change)
    }

    pub fn delete_col(&mut self, col: usize) -> bool {
        let change = self.grid.delete_col(col);
        self.commit(change)
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) -> bool {
        let change = self.grid.swap_rows(a, b);
        self.commit(change)
    }

    pub fn swap_cols(&mut self, a: usize, b: usize) -> bool {
        let change = self.grid.swap_cols(a, b);
        self.commit(change)
    }

    pub fn move_row_up(&mut self, row: usize) -> bool {
        self.grid.can_move_row_up(row) && self.swap_rows(row, row - 1)
    }

    pub fn move_row_down(&mut self, row: usize) -> bool {
        self.grid.can_move_row_down(row) && self.swap_rows(row, row + 1)
    }

    pub fn move_col_left(&mut self, col: usize) -> bool {
        self.grid.can_move_col_left(col) && self.swap_cols(col, col - 1)
    }

    pub fn move_col_right(&mut self, col: usize) -> bool {
        self.grid.can_move_col_right(col) && self.swap_cols(col, col + 1)
    }

    pub fn set_cell_value(&mut self, row: usize, col: usize, value: &str) -> bool {
        let change = self.grid.set_value(row, col, value);
        self.commit(change)
    }

    pub fn cycle_role(&mut self, row: usize, col: usize) -> bool {
        let change = self.grid.cycle_role(row, col);
        self.commit(change)
    }
}
