//! HTML table document codec.
//!
//! A RACI document is a small XHTML page whose `<table id="RACI">` holds the
//! grid, one element per line. Decoding is a forward tag scan so hand-edited
//! files that put several cells on a line still load.

use std::borrow::Cow;
use std::fmt;
use std::fmt::Write as _;

use quick_xml::escape::{escape, unescape};
use raci_config::theme::Palette;
use raci_engine::role;
use raci_engine::{Grid, DEFAULT_TITLE};

/// Value of the `id` attribute that marks the matrix table.
pub const TABLE_ID: &str = "RACI";

/// Result of a successful decode: the title and a rectangular table.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTable {
    pub title: String,
    pub rows: Vec<Vec<String>>,
}

impl DecodedTable {
    /// Build the grid. The title replaces whatever the origin cell held.
    pub fn into_grid(self) -> Option<Grid> {
        Grid::from_table(&self.title, &self.rows)
    }
}

/// Why a document did not yield a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No `<table id="RACI">` tag.
    NoTable,
    /// The table ended before any cell.
    NoRows,
    /// The table (or one of its cells) is never closed.
    Unterminated,
    /// A row's cell count differs from the first row's.
    Ragged { row: usize, expected: usize, found: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTable => write!(f, "no <table id=\"{TABLE_ID}\"> element"),
            Self::NoRows => write!(f, "table has no rows"),
            Self::Unterminated => write!(f, "table is not terminated"),
            Self::Ragged { row, expected, found } => {
                write!(f, "row {row} has {found} cells, expected {expected}")
            }
        }
    }
}

/// Metadata written into the document head
#[derive(Debug, Clone, Default)]
pub struct HtmlOptions {
    pub generator: String,
    pub author: Option<String>,
    pub license: Option<String>,
}

impl HtmlOptions {
    pub fn new() -> Self {
        Self {
            generator: format!("raci {}", env!("CARGO_PKG_VERSION")),
            author: None,
            license: None,
        }
    }
}

// ============================================================================
// Decode
// ============================================================================

/// One `<...>` tag located in the source.
struct Tag<'a> {
    /// Lowercased text between `<` and `>`
    lower: &'a str,
    /// Original-case text between `<` and `>`
    raw: &'a str,
    /// Byte offset just past `>`
    end: usize,
}

impl Tag<'_> {
    fn name(&self) -> &str {
        self.lower
            .split(|c: char| c.is_ascii_whitespace() || c == '/')
            .next()
            .unwrap_or_default()
    }

    fn is_close(&self, name: &str) -> bool {
        self.lower
            .strip_prefix('/')
            .map(|rest| rest.trim_start().starts_with(name))
            .unwrap_or(false)
    }
}

/// Find the next tag at or after `from`.
fn next_tag<'a>(text: &'a str, lower: &'a str, from: usize) -> Option<Tag<'a>> {
    let start = from + lower.get(from..)?.find('<')?;
    let close = start + lower[start..].find('>')?;
    Some(Tag {
        lower: &lower[start + 1..close],
        raw: &text[start + 1..close],
        end: close + 1,
    })
}

/// Value of attribute `name` inside a tag's text.
fn attr_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let lower = tag.to_ascii_lowercase();
    let mut from = 0;
    while let Some(rel) = lower[from..].find(name) {
        let at = from + rel;
        from = at + name.len();

        let boundary = at == 0 || lower.as_bytes()[at - 1].is_ascii_whitespace();
        let rest = lower[from..].trim_start();
        if !boundary || !rest.starts_with('=') {
            continue;
        }

        // `lower` and `tag` share byte offsets
        let value = tag[tag.len() - rest.len() + 1..].trim_start();
        let quote = value.chars().next()?;
        if quote == '"' || quote == '\'' {
            let inner = &value[1..];
            return inner.find(quote).map(|end| &inner[..end]);
        }
        let end = value
            .find(|c: char| c.is_ascii_whitespace() || c == '/')
            .unwrap_or(value.len());
        return Some(&value[..end]);
    }
    None
}

/// Decode character entities. Text with unknown entities is kept verbatim.
fn decode_text(raw: &str) -> String {
    let trimmed = raw.trim();
    match unescape(trimmed) {
        Ok(text) => text.into_owned(),
        Err(e) => {
            log::debug!("keeping raw cell text {:?}: {}", trimmed, e);
            trimmed.to_string()
        }
    }
}

/// Decode a RACI document.
///
/// The first `<title>` before the table names the grid (default `TITLE`).
/// Every `<tr>` inside `<table id="RACI">` is a row and every `<th>`/`<td>`
/// a cell. Rows must all have the same number of cells.
pub fn decode(text: &str) -> Result<DecodedTable, DecodeError> {
    // ASCII lowercasing keeps byte offsets identical to `text`
    let lower = text.to_ascii_lowercase();
    let mut title: Option<String> = None;
    let mut title_seen = false;
    let mut pos = 0;

    // Before the table
    loop {
        let tag = next_tag(text, &lower, pos).ok_or(DecodeError::NoTable)?;
        pos = tag.end;
        match tag.name() {
            "title" if !title_seen => {
                title_seen = true;
                // Unclosed title: keep the default and go on looking for the table
                if let Some(close) = lower[pos..].find("</title") {
                    title = Some(decode_text(&text[pos..pos + close]));
                    pos += close;
                }
            }
            "table" if attr_value(tag.raw, "id") == Some(TABLE_ID) => break,
            _ => {}
        }
    }

    // In the table
    let mut rows: Vec<Vec<String>> = Vec::new();
    loop {
        let tag = next_tag(text, &lower, pos).ok_or(DecodeError::Unterminated)?;
        pos = tag.end;
        if tag.is_close("table") {
            break;
        }
        match tag.name() {
            "tr" => rows.push(Vec::new()),
            name @ ("th" | "td") => {
                let marker = format!("</{name}");
                let close = lower[pos..].find(&marker).ok_or(DecodeError::Unterminated)?;
                let value = decode_text(&text[pos..pos + close]);
                match rows.last_mut() {
                    Some(row) => row.push(value),
                    None => rows.push(vec![value]),
                }
                pos += close + marker.len();
            }
            _ => {}
        }
    }

    rows.retain(|row| !row.is_empty());
    let expected = rows.first().map(Vec::len).ok_or(DecodeError::NoRows)?;
    if let Some((row, found)) = rows
        .iter()
        .enumerate()
        .find(|(_, r)| r.len() != expected)
        .map(|(i, r)| (i, r.len()))
    {
        return Err(DecodeError::Ragged { row, expected, found });
    }

    let title = title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
    log::debug!("decoded {:?}: {}x{}", title, rows.len(), expected);
    Ok(DecodedTable { title, rows })
}

// ============================================================================
// Encode
// ============================================================================

fn esc(text: &str) -> Cow<'_, str> {
    escape(text)
}

/// Render `grid` as a RACI document.
pub fn encode(grid: &Grid, palette: &Palette, options: &HtmlOptions) -> String {
    let title = esc(grid.title());
    let mut out = String::new();

    // `write!` into a String cannot fail
    let _ = writeln!(out, "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.1//EN\"");
    let _ = writeln!(out, "  \"http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd\">");
    let _ = writeln!(out, "<html xmlns=\"http://www.w3.org/1999/xhtml\">");
    let _ = writeln!(out, "  <head>");
    let _ = writeln!(out, "    <title>{title}</title>");
    let _ = writeln!(out, "    <meta name=\"description\" content=\"{title}\" />");
    let _ = writeln!(out, "    <meta name=\"generator\"   content=\"{}\" />", esc(&options.generator));
    if let Some(author) = &options.author {
        let _ = writeln!(out, "    <link rel=\"author\"       href=\"{}\" />", esc(author));
    }
    if let Some(license) = &options.license {
        let _ = writeln!(out, "    <link rel=\"license\"      href=\"{}\" />", esc(license));
    }
    out.push_str(STYLESHEET_HEAD);
    for id in raci_config::theme::STYLE_IDS {
        let color = palette.style_or_default(id).to_hex();
        let selector = format!(".{id}");
        let _ = writeln!(out, "        {selector:<17} {{ background: {color}; }}");
    }
    let _ = writeln!(out, "    </style>");
    let _ = writeln!(out, "  </head>");

    let _ = writeln!(out, "  <body>");
    let _ = writeln!(out, "    <div>");
    let _ = writeln!(out, "      <h1>{title}</h1>");
    let _ = writeln!(out, "      <table id=\"{TABLE_ID}\" width=\"100%\">");
    let width = 100 / (grid.cols() + 1);
    for row in 0..grid.rows() {
        let _ = writeln!(out, "        <tr>");
        for col in 0..grid.cols() {
            let value = esc(grid.value(row, col));
            let _ = match (row, col) {
                (0, 0) => writeln!(out, "          <th></th>"),
                (0, _) => writeln!(out, "          <th width=\"{width}%\">{value}</th>"),
                (_, 0) => writeln!(out, "          <td class=\"left\">{value}</td>"),
                _ => {
                    let style = role::style_for(grid.value(row, col));
                    writeln!(out, "          <td class=\"{style}\">{value}</td>")
                }
            };
        }
        let _ = writeln!(out, "        </tr>");
    }
    let _ = writeln!(out, "      </table>");
    let _ = writeln!(out, "    </div>");
    let _ = writeln!(out, "  </body>");
    let _ = writeln!(out, "</html>");
    out
}

const STYLESHEET_HEAD: &str = "    <style>
        body              { font-size: 10pt; font-family: Calibri,Arial,Helvetica,sans-serif; }
        div               { page-break-inside: avoid; }
        h1                { font-size: 16pt; font-weight: bold; }
        table, tr, th, td { font-size: 10pt; text-align: center; vertical-align: top; border: 1px solid black; border-collapse: collapse; padding: 2pt; }
        .left             { text-align: left; }
";
