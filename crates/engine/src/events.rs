//! Event types for document change notifications.
//!
//! A front end subscribes to a [`Document`](crate::document::Document) and
//! redraws from these instead of the model holding references to widgets.
//! Requests that turn out to be no-ops emit nothing.

use std::path::PathBuf;

use crate::document::ViewMode;

/// A structural or value change to the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridChange {
    /// The grid was rebuilt from scratch (new document, open).
    Reset { rows: usize, cols: usize },
    /// A row was appended at `row`.
    RowAdded { row: usize },
    /// A column was appended at `col`.
    ColumnAdded { col: usize },
    /// Row `row` was removed; later rows moved up by one.
    RowRemoved { row: usize },
    /// Column `col` was removed; later columns moved left by one.
    ColumnRemoved { col: usize },
    RowsSwapped { a: usize, b: usize },
    ColumnsSwapped { a: usize, b: usize },
    /// A single cell's text changed (edit or role cycle).
    CellChanged { row: usize, col: usize },
}

/// Events emitted by a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    Grid(GridChange),
    /// Dirty flag flipped. Emitted only on transitions.
    DirtyChanged(bool),
    /// The path the document is associated with changed.
    FilenameChanged(Option<PathBuf>),
    ViewModeChanged(ViewMode),
    /// The document was torn down; the grid is empty.
    Closed,
}

/// Callback type for receiving document events.
pub type EventCallback = Box<dyn FnMut(&DocumentEvent) + Send>;

/// Simple event collector for testing.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<DocumentEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: DocumentEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[DocumentEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to only grid changes.
    pub fn grid_changes(&self) -> Vec<&GridChange> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DocumentEvent::Grid(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Filter to only dirty-flag transitions.
    pub fn dirty_changes(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DocumentEvent::DirtyChanged(d) => Some(*d),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_collector_filtering() {
        let mut collector = EventCollector::new();

        collector.push(DocumentEvent::Grid(GridChange::RowAdded { row: 1 }));
        collector.push(DocumentEvent::DirtyChanged(true));
        collector.push(DocumentEvent::Grid(GridChange::CellChanged { row: 1, col: 0 }));
        collector.push(DocumentEvent::ViewModeChanged(ViewMode::Expanded));

        assert_eq!(collector.len(), 4);
        assert_eq!(collector.grid_changes().len(), 2);
        assert_eq!(collector.dirty_changes(), vec![true]);

        collector.clear();
        assert!(collector.is_empty());
    }
}
