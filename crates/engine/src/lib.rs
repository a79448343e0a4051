//! RACI matrix model: role table, grid and document session.

pub mod cell;
pub mod document;
pub mod events;
pub mod grid;
pub mod role;

pub use cell::{Cell, CellKind};
pub use document::{Document, ViewMode};
pub use events::{DocumentEvent, EventCallback, GridChange};
pub use grid::{Grid, GridSnapshot, DEFAULT_TITLE};
pub use role::Role;
