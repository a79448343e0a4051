use serde::{Deserialize, Serialize};

use super::role::Role;

/// What a cell represents, fixed by where it was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellKind {
    /// (0,0): holds the document title
    Origin,
    /// Column 0, row > 0
    RowHeader,
    /// Row 0, column > 0
    ColHeader,
    /// Row > 0, column > 0: holds a role
    Data,
}

impl CellKind {
    /// Kind a cell created at `(row, col)` gets.
    pub fn at(row: usize, col: usize) -> Self {
        match (row, col) {
            (0, 0) => CellKind::Origin,
            (_, 0) => CellKind::RowHeader,
            (0, _) => CellKind::ColHeader,
            _ => CellKind::Data,
        }
    }

    pub fn is_header(self) -> bool {
        matches!(self, CellKind::RowHeader | CellKind::ColHeader)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    kind: CellKind,
    row: usize,
    col: usize,
    value: String,
    /// Derived from `value`; only data cells carry one
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
}

impl Cell {
    pub fn new(row: usize, col: usize, value: impl Into<String>) -> Self {
        let kind = CellKind::at(row, col);
        let value = value.into();
        let role = (kind == CellKind::Data).then(|| Role::matched(&value));
        Self { kind, row, col, value, role }
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Matched role for data cells, `None` for labels.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_data(&self) -> bool {
        self.kind == CellKind::Data
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        if self.is_data() {
            self.role = Some(Role::matched(&self.value));
        }
    }

    /// Move the cell to a new key. Kind is unchanged.
    pub(crate) fn relocate(&mut self, row: usize, col: usize) {
        self.row = row;
        self.col = col;
    }
}
