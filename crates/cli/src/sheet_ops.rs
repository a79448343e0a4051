//! Editor commands as values.
//!
//! Each subcommand that edits a document becomes an [`EditOp`]; applying it
//! to a [`Document`] reports whether anything changed plus a one-line
//! description for the terminal.

use clap::ValueEnum;
use raci_engine::{CellKind, Document};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RowDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColDirection {
    Left,
    Right,
}

impl RowDirection {
    fn as_str(self) -> &'static str {
        match self {
            RowDirection::Up => "up",
            RowDirection::Down => "down",
        }
    }
}

impl ColDirection {
    fn as_str(self) -> &'static str {
        match self {
            ColDirection::Left => "left",
            ColDirection::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    SetValue { row: usize, col: usize, value: String },
    Cycle { row: usize, col: usize, times: usize },
    AddRow { label: Option<String> },
    AddCol { label: Option<String> },
    DeleteRow { row: usize },
    DeleteCol { col: usize },
    MoveRow { row: usize, direction: RowDirection },
    MoveCol { col: usize, direction: ColDirection },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub changed: bool,
    pub message: String,
}

impl EditOutcome {
    fn changed(message: impl Into<String>) -> Self {
        Self { changed: true, message: message.into() }
    }

    fn unchanged(message: impl Into<String>) -> Self {
        Self { changed: false, message: message.into() }
    }
}

impl EditOp {
    pub fn apply(&self, doc: &mut Document) -> EditOutcome {
        match self {
            EditOp::SetValue { row, col, value } => {
                if doc.set_cell_value(*row, *col, value) {
                    EditOutcome::changed(format!("({row},{col}) = {value:?}"))
                } else {
                    EditOutcome::unchanged(format!("no cell at ({row},{col})"))
                }
            }
            EditOp::Cycle { row, col, times } => {
                let is_data = doc
                    .grid()
                    .cell(*row, *col)
                    .map(|c| c.kind() == CellKind::Data)
                    .unwrap_or(false);
                if !is_data {
                    return EditOutcome::unchanged(format!("({row},{col}) is not a role cell"));
                }
                let mut cycled = 0;
                while cycled < *times && doc.cycle_role(*row, *col) {
                    cycled += 1;
                }
                if cycled == 0 {
                    return EditOutcome::unchanged("cycle count is zero");
                }
                EditOutcome::changed(format!("({row},{col}) = {:?}", doc.grid().value(*row, *col)))
            }
            EditOp::AddRow { label } => {
                if !doc.add_row() {
                    return EditOutcome::unchanged("document has no grid");
                }
                let row = doc.grid().rows() - 1;
                if let Some(label) = label {
                    doc.set_cell_value(row, 0, label);
                }
                EditOutcome::changed(format!("row {row} added: {:?}", doc.grid().value(row, 0)))
            }
            EditOp::AddCol { label } => {
                if !doc.add_col() {
                    return EditOutcome::unchanged("document has no grid");
                }
                let col = doc.grid().cols() - 1;
                if let Some(label) = label {
                    doc.set_cell_value(0, col, label);
                }
                EditOutcome::changed(format!("column {col} added: {:?}", doc.grid().value(0, col)))
            }
            EditOp::DeleteRow { row } => {
                let label = doc.grid().value(*row, 0).to_string();
                if doc.delete_row(*row) {
                    EditOutcome::changed(format!("row {row} deleted: {label:?}"))
                } else {
                    EditOutcome::unchanged(format!("row {row} cannot be deleted"))
                }
            }
            EditOp::DeleteCol { col } => {
                let label = doc.grid().value(0, *col).to_string();
                if doc.delete_col(*col) {
                    EditOutcome::changed(format!("column {col} deleted: {label:?}"))
                } else {
                    EditOutcome::unchanged(format!("column {col} cannot be deleted"))
                }
            }
            EditOp::MoveRow { row, direction } => {
                let (moved, to) = match direction {
                    RowDirection::Up => (doc.move_row_up(*row), row.wrapping_sub(1)),
                    RowDirection::Down => (doc.move_row_down(*row), row + 1),
                };
                let dir = direction.as_str();
                if moved {
                    EditOutcome::changed(format!("row {row} moved {dir} to {to}"))
                } else {
                    EditOutcome::unchanged(format!("row {row} cannot move {dir}"))
                }
            }
            EditOp::MoveCol { col, direction } => {
                let (moved, to) = match direction {
                    ColDirection::Left => (doc.move_col_left(*col), col.wrapping_sub(1)),
                    ColDirection::Right => (doc.move_col_right(*col), col + 1),
                };
                let dir = direction.as_str();
                if moved {
                    EditOutcome::changed(format!("column {col} moved {dir} to {to}"))
                } else {
                    EditOutcome::unchanged(format!("column {col} cannot move {dir}"))
                }
            }
        }
    }
}
