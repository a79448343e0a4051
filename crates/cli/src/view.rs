//! Terminal and JSON rendering of a document.

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use raci_engine::{Document, Grid, GridSnapshot, ViewMode};

const SEPARATOR: &str = " | ";

/// Controls a header offers in expanded view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowControls {
    pub row: usize,
    pub up: bool,
    pub down: bool,
    pub delete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColControls {
    pub col: usize,
    pub left: bool,
    pub right: bool,
    pub delete: bool,
}

#[derive(Debug, Serialize)]
pub struct Controls {
    pub rows: Vec<RowControls>,
    pub cols: Vec<ColControls>,
}

impl Controls {
    pub fn for_grid(grid: &Grid) -> Self {
        let rows = (1..grid.rows())
            .map(|row| RowControls {
                row,
                up: grid.can_move_row_up(row),
                down: grid.can_move_row_down(row),
                delete: grid.can_delete_row(row),
            })
            .collect();
        let cols = (1..grid.cols())
            .map(|col| ColControls {
                col,
                left: grid.can_move_col_left(col),
                right: grid.can_move_col_right(col),
                delete: grid.can_delete_col(col),
            })
            .collect();
        Controls { rows, cols }
    }
}

/// `show --json` payload
#[derive(Debug, Serialize)]
pub struct ShowJson {
    pub filename: Option<String>,
    pub view: ViewMode,
    #[serde(flatten)]
    pub grid: GridSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controls: Option<Controls>,
}

impl ShowJson {
    pub fn new(doc: &Document) -> Self {
        let expanded = doc.view_mode() == ViewMode::Expanded;
        ShowJson {
            filename: doc.filename().map(|p| p.display().to_string()),
            view: doc.view_mode(),
            grid: doc.grid().snapshot(),
            controls: expanded.then(|| Controls::for_grid(doc.grid())),
        }
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

fn flag(on: bool, mark: char) -> char {
    if on { mark } else { '.' }
}

/// Render rows of text as aligned columns.
fn render_rows(rows: &[Vec<String>]) -> String {
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..cols)
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|v| v.width())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(c, v)| pad(v, widths[c]))
            .collect();
        out.push_str(line.join(SEPARATOR).trim_end());
        out.push('\n');
        if i == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join("-+-"));
            out.push('\n');
        }
    }
    out
}

/// Plain table: one line per grid row, header rule under row 0.
pub fn render_compact(grid: &Grid) -> String {
    render_rows(&grid.table())
}

/// Table with a trailing control column for rows and a control line for
/// columns. `^ v x` / `< > x` mark available moves and deletes, `.` not.
pub fn render_expanded(grid: &Grid) -> String {
    let controls = Controls::for_grid(grid);
    let mut rows = grid.table();

    if let Some(header) = rows.first_mut() {
        header.push(String::new());
    }
    for ctl in &controls.rows {
        rows[ctl.row].push(format!(
            "{}{}{}",
            flag(ctl.up, '^'),
            flag(ctl.down, 'v'),
            flag(ctl.delete, 'x')
        ));
    }
    if !controls.cols.is_empty() {
        let mut line = vec![String::new()];
        line.extend(controls.cols.iter().map(|ctl| {
            format!(
                "{}{}{}",
                flag(ctl.left, '<'),
                flag(ctl.right, '>'),
                flag(ctl.delete, 'x')
            )
        }));
        rows.push(line);
    }
    render_rows(&rows)
}

pub fn render(doc: &Document) -> String {
    match doc.view_mode() {
        ViewMode::Compact => render_compact(doc.grid()),
        ViewMode::Expanded => render_expanded(doc.grid()),
    }
}
