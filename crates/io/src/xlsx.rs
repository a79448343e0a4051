// Excel export of a RACI grid (rust_xlsxwriter)

use std::path::Path;

use raci_config::theme::Palette;
use raci_engine::{Grid, Role};
use rust_xlsxwriter::{
    Color, ConditionalFormatCell, ConditionalFormatCellRule, Format, Workbook, Worksheet,
};

use crate::error::DocumentError;
use crate::file_ops::write_atomic;

/// Narrowest column, in characters
pub const MIN_COLUMN_WIDTH: usize = 12;

/// Excel's sheet limits
const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;
const MAX_SHEET_NAME: usize = 31;

/// Statistics from an XLSX export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportResult {
    pub sheet_name: String,
    pub cells_exported: usize,
    pub conditional_formats: usize,
}

impl ExportResult {
    /// Returns a summary message suitable for display
    pub fn summary(&self) -> String {
        format!(
            "sheet '{}', {} cells, {} role formats",
            self.sheet_name, self.cells_exported, self.conditional_formats
        )
    }
}

/// Make `title` acceptable as a worksheet name.
///
/// `[ ] : * ? / \` become `_` and the result is cut to 31 characters before
/// leading/trailing apostrophes and spaces are dropped, so the cut can't
/// expose one. Falls back to `Sheet1`.
pub fn sanitize_sheet_name(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    let cut: String = replaced.trim().chars().take(MAX_SHEET_NAME).collect();
    let name = cut.trim_matches(|c: char| c == '\'' || c.is_whitespace()).to_string();

    if name.is_empty() {
        "Sheet1".to_string()
    } else if name.eq_ignore_ascii_case("history") {
        // Reserved by Excel
        format!("{name}_")
    } else {
        name
    }
}

/// Column widths in characters: (label column, role columns)
pub fn column_widths(grid: &Grid) -> (usize, usize) {
    (
        grid.longest_row_label().max(MIN_COLUMN_WIDTH),
        grid.longest_col_label().max(MIN_COLUMN_WIDTH),
    )
}

/// Render `grid` into an in-memory workbook. `None` for an empty grid.
pub fn build_workbook(grid: &Grid, palette: &Palette) -> Result<Option<(Workbook, ExportResult)>, DocumentError> {
    if grid.is_empty() {
        return Ok(None);
    }
    if grid.rows() > MAX_ROWS || grid.cols() > MAX_COLS {
        return Err(DocumentError::Xlsx(format!(
            "{}x{} grid exceeds the worksheet size limit",
            grid.rows(),
            grid.cols()
        )));
    }

    let mut workbook = Workbook::new();
    let mut result = ExportResult {
        sheet_name: sanitize_sheet_name(grid.title()),
        ..ExportResult::default()
    };

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&result.sheet_name)?;

    let bold = Format::new().set_bold();
    let plain = Format::new();
    for cell in grid.cells() {
        let format = if cell.is_data() { &plain } else { &bold };
        worksheet.write_string_with_format(cell.row() as u32, cell.col() as u16, cell.value(), format)?;
        result.cells_exported += 1;
    }

    let (label_width, role_width) = column_widths(grid);
    worksheet.set_column_width(0, label_width as f64)?;
    for col in 1..grid.cols() {
        worksheet.set_column_width(col as u16, role_width as f64)?;
    }

    result.conditional_formats = add_role_formats(worksheet, grid, palette)?;
    Ok(Some((workbook, result)))
}

/// One "cell equals" rule per assignable role over the data range.
fn add_role_formats(worksheet: &mut Worksheet, grid: &Grid, palette: &Palette) -> Result<usize, DocumentError> {
    if grid.rows() < 2 || grid.cols() < 2 {
        return Ok(0);
    }
    let last_row = (grid.rows() - 1) as u32;
    let last_col = (grid.cols() - 1) as u16;

    let mut added = 0;
    for role in Role::assignable() {
        let fill = palette.style_or_default(role.style());
        let format = Format::new().set_background_color(Color::RGB(fill.to_rgb_u32()));
        let rule = ConditionalFormatCell::new()
            .set_rule(ConditionalFormatCellRule::EqualTo(format!("\"{}\"", role.label())))
            .set_format(&format);
        worksheet.add_conditional_format(1, 1, last_row, last_col, &rule)?;
        added += 1;
    }
    Ok(added)
}

/// Export `grid` to an `.xlsx` file. Returns `Ok(None)` and writes nothing
/// for an empty grid.
pub fn export(grid: &Grid, path: &Path, palette: &Palette) -> Result<Option<ExportResult>, DocumentError> {
    let Some((mut workbook, result)) = build_workbook(grid, palette)? else {
        log::debug!("skipping xlsx export of empty grid");
        return Ok(None);
    };

    let bytes = workbook.save_to_buffer()?;
    write_atomic(path, &bytes)?;
    log::info!("Exported {} ({})", path.display(), result.summary());
    Ok(Some(result))
}
