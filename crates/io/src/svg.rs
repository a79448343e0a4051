//! SVG image export.
//!
//! Each cell is a white-stroked rectangle plus a text element. Data cells
//! holding a role label are filled with the role's color, everything else
//! with the palette's `light` color.

use std::fmt::Write as _;
use std::path::Path;

use quick_xml::escape::escape;
use raci_config::theme::Palette;
use raci_engine::{CellKind, Grid, Role};

use crate::error::DocumentError;
use crate::file_ops::write_atomic;

pub const FONT_SIZE: u32 = 14;
const FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";
/// Shortest label length used for sizing, in characters
const MIN_LABEL_CHARS: usize = 12;

/// Pixel geometry derived from a grid's labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SvgLayout {
    pub row_height: u32,
    /// Width of column 0
    pub label_width: u32,
    /// Width of every other column
    pub col_width: u32,
    pub width: u32,
    pub height: u32,
}

impl SvgLayout {
    pub fn for_grid(grid: &Grid) -> Self {
        let label_chars = grid.longest_row_label().max(MIN_LABEL_CHARS) as f64;
        let col_chars = grid.longest_col_label().max(MIN_LABEL_CHARS) as f64;
        let font = FONT_SIZE as f64;

        let col_width = (col_chars * (font * 0.5)).ceil() as u32 + 6;
        let label_width = (label_chars * (font * 0.55)).ceil() as u32 + 6;
        let row_height = FONT_SIZE + 7;
        let data_cols = grid.cols().saturating_sub(1) as u32;

        SvgLayout {
            row_height,
            label_width,
            col_width,
            width: label_width + col_width * data_cols + 2,
            height: row_height * grid.rows() as u32 + 2,
        }
    }
}

/// Render `grid` as an SVG document. `None` for an empty grid.
pub fn render(grid: &Grid, palette: &Palette) -> Option<String> {
    if grid.is_empty() {
        return None;
    }
    let layout = SvgLayout::for_grid(grid);
    let light = palette.light.to_hex();
    let mut out = String::new();

    // `write!` into a String cannot fail
    let _ = writeln!(
        out,
        "<svg version=\"1.1\" width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">",
        layout.width, layout.height
    );

    let h = layout.row_height;
    let mut y = 1;
    for row in 0..grid.rows() {
        let mut x = 1;
        for col in 0..grid.cols() {
            let Some(cell) = grid.cell(row, col) else { continue };
            let w = if col == 0 { layout.label_width } else { layout.col_width };

            let fill = match cell.role() {
                Some(role) if Role::from_label(cell.value()).is_some() => {
                    palette.style_or_default(role.style()).to_hex()
                }
                _ => light.clone(),
            };
            let (text_x, anchor) = if col == 0 {
                (f64::from(x + 3), "start")
            } else {
                (f64::from(x) + f64::from(w) / 2.0, "middle")
            };
            let weight = if cell.kind() == CellKind::Origin { "bold" } else { "normal" };

            let _ = writeln!(
                out,
                "  <rect x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" fill=\"{fill}\" stroke=\"#ffffff\" stroke-width=\"2\" />"
            );
            let _ = writeln!(
                out,
                "  <text x=\"{text_x}\" y=\"{}\" font-size=\"{FONT_SIZE}\" font-family=\"{FONT_FAMILY}\" text-anchor=\"{anchor}\" font-weight=\"{weight}\" fill=\"#000000\">{}</text>",
                y + h - 6,
                escape(cell.value())
            );
            x += w;
        }
        y += h;
    }
    let _ = writeln!(out, "</svg>");
    Some(out)
}

/// Write `grid` as an `.svg` file. Returns `Ok(false)` and writes nothing
/// for an empty grid.
pub fn export(grid: &Grid, path: &Path, palette: &Palette) -> Result<bool, DocumentError> {
    let Some(svg) = render(grid, palette) else {
        log::debug!("skipping svg export of empty grid");
        return Ok(false);
    };
    write_atomic(path, svg.as_bytes())?;
    log::info!("Exported {}", path.display());
    Ok(true)
}
