// File commands: open, save, save-as and sibling exports

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use raci_config::settings::Settings;
use raci_config::theme::Palette;
use raci_engine::{Document, Grid};

use crate::error::DocumentError;
use crate::html::{self, HtmlOptions};
use crate::{svg, xlsx};

/// How a save renders the document and which siblings it writes
#[derive(Debug, Clone)]
pub struct SaveOptions {
    pub palette: Palette,
    pub html: HtmlOptions,
    /// Write `<stem>.xlsx` next to the document
    pub xlsx: bool,
    /// Write `<stem>.svg` next to the document
    pub svg: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            html: HtmlOptions::new(),
            xlsx: true,
            svg: true,
        }
    }
}

impl SaveOptions {
    pub fn from_settings(settings: &Settings, palette: Palette) -> Self {
        Self {
            palette,
            html: HtmlOptions {
                author: settings.author.clone(),
                license: settings.license.clone(),
                ..HtmlOptions::new()
            },
            xlsx: settings.xlsx_on_save,
            svg: settings.svg_on_save,
        }
    }

    /// Same rendering, no sibling files
    pub fn without_exports(mut self) -> Self {
        self.xlsx = false;
        self.svg = false;
        self
    }
}

/// What a save wrote
#[derive(Debug, Default)]
pub struct SaveReport {
    pub document: PathBuf,
    pub xlsx: Option<PathBuf>,
    pub svg: Option<PathBuf>,
    /// Sibling exports that failed. The document itself was saved.
    pub export_errors: Vec<DocumentError>,
}

/// Read file and convert to UTF-8 if needed (falls back to Windows-1252)
pub fn read_file_as_utf8(path: &Path) -> Result<String, DocumentError> {
    let mut file = fs::File::open(path).map_err(|e| DocumentError::io(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| DocumentError::io(path, e))?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            log::debug!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Write through a sibling temp file and rename into place
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), DocumentError> {
    let ext = path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    let temp_path = path.with_extension(ext);

    fs::write(&temp_path, bytes).map_err(|e| DocumentError::io(path, e))?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(DocumentError::io(path, e));
    }
    Ok(())
}

/// `plan.html` -> `plan.<ext>`, or `None` when the document itself already
/// carries that extension and the export would overwrite it.
pub fn sibling_path(path: &Path, ext: &str) -> Option<PathBuf> {
    let collides = path
        .extension()
        .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(ext));
    (!collides).then(|| path.with_extension(ext))
}

/// Read and decode a document into a fresh grid.
pub fn load(path: &Path) -> Result<Grid, DocumentError> {
    let text = read_file_as_utf8(path)?;
    let decoded = html::decode(&text).map_err(|e| {
        log::warn!("{}: {}", path.display(), e);
        DocumentError::data_not_found(path)
    })?;
    decoded
        .into_grid()
        .ok_or_else(|| DocumentError::data_not_found(path))
}

/// Open-document command. On failure the document is left untouched.
pub fn open(doc: &mut Document, path: &Path) -> Result<(), DocumentError> {
    let grid = load(path)?;
    log::info!("Opened {} ({}x{})", path.display(), grid.rows(), grid.cols());
    doc.install_grid(grid, Some(path.to_path_buf()));
    Ok(())
}

/// Save-document command. Fails with `NoFilename` on a never-saved document.
pub fn save(doc: &mut Document, options: &SaveOptions) -> Result<SaveReport, DocumentError> {
    let path = doc.filename().map(Path::to_path_buf).ok_or(DocumentError::NoFilename)?;
    save_as(doc, &path, options)
}

/// Save-as command. The document is marked clean only once the HTML file is
/// in place; sibling export failures are reported but don't undo the save.
pub fn save_as(doc: &mut Document, path: &Path, options: &SaveOptions) -> Result<SaveReport, DocumentError> {
    let text = html::encode(doc.grid(), &options.palette, &options.html);
    write_atomic(path, text.as_bytes())?;
    doc.mark_saved(path.to_path_buf());
    log::info!("Saved {}", path.display());

    let mut report = SaveReport {
        document: path.to_path_buf(),
        ..SaveReport::default()
    };
    export_siblings(doc.grid(), path, options, &mut report);
    Ok(report)
}

/// Write the enabled sibling exports of `path`, recording outcomes in `report`.
pub fn export_siblings(grid: &Grid, path: &Path, options: &SaveOptions, report: &mut SaveReport) {
    let xlsx_target = options.xlsx.then(|| sibling_path(path, "xlsx")).flatten();
    let svg_target = options.svg.then(|| sibling_path(path, "svg")).flatten();
    if (options.xlsx && xlsx_target.is_none()) || (options.svg && svg_target.is_none()) {
        log::warn!("{}: not exporting over the document itself", path.display());
    }

    if let Some(target) = xlsx_target {
        match xlsx::export(grid, &target, &options.palette) {
            Ok(Some(_)) => report.xlsx = Some(target),
            Ok(None) => {}
            Err(e) => {
                log::warn!("{}", e);
                report.export_errors.push(e);
            }
        }
    }
    if let Some(target) = svg_target {
        match svg::export(grid, &target, &options.palette) {
            Ok(true) => report.svg = Some(target),
            Ok(false) => {}
            Err(e) => {
                log::warn!("{}", e);
                report.export_errors.push(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn edited_document() -> Document {
        let mut doc = Document::new();
        doc.set_cell_value(0, 0, "Launch");
        doc.add_row();
        doc.add_col();
        doc.add_col();
        doc.set_cell_value(1, 1, "Responsible");
        doc.cycle_role(1, 2);
        doc
    }

    #[test]
    fn test_save_as_then_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("launch.html");
        let mut doc = edited_document();

        let report = save_as(&mut doc, &path, &SaveOptions::default()).unwrap();
        assert!(!doc.is_dirty());
        assert_eq!(doc.filename(), Some(path.as_path()));
        assert_eq!(report.xlsx, Some(dir.path().join("launch.xlsx")));
        assert_eq!(report.svg, Some(dir.path().join("launch.svg")));
        assert!(report.export_errors.is_empty());
        assert!(dir.path().join("launch.xlsx").exists());
        assert!(dir.path().join("launch.svg").exists());

        let mut reopened = Document::new();
        open(&mut reopened, &path).unwrap();
        assert_eq!(reopened.grid(), doc.grid());
        assert_eq!(reopened.title(), "Launch");
        assert!(!reopened.is_dirty());
    }

    #[test]
    fn test_save_under_export_extension_keeps_document() {
        let dir = tempdir().unwrap();
        for name in ["plan.svg", "plan.xlsx", "plan.SVG"] {
            let path = dir.path().join(name);
            let mut doc = edited_document();
            let report = save_as(&mut doc, &path, &SaveOptions::default()).unwrap();
            assert!(report.export_errors.is_empty());
            assert_ne!(report.xlsx.as_deref(), Some(path.as_path()));
            assert_ne!(report.svg.as_deref(), Some(path.as_path()));
            assert_eq!(&load(&path).unwrap(), doc.grid(), "{name}");
        }
        assert!(dir.path().join("plan.svg").exists());
        assert!(dir.path().join("plan.xlsx").exists());
    }

    #[test]
    fn test_sibling_path() {
        let path = Path::new("dir/plan.html");
        assert_eq!(sibling_path(path, "svg"), Some(PathBuf::from("dir/plan.svg")));
        assert_eq!(sibling_path(Path::new("plan"), "xlsx"), Some(PathBuf::from("plan.xlsx")));
        assert_eq!(sibling_path(Path::new("plan.XLSX"), "xlsx"), None);
    }

    #[test]
    fn test_save_without_filename() {
        let mut doc = edited_document();
        assert!(matches!(
            save(&mut doc, &SaveOptions::default()),
            Err(DocumentError::NoFilename)
        ));
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_save_reuses_filename() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plan.html");
        let mut doc = edited_document();
        let options = SaveOptions::default().without_exports();
        save_as(&mut doc, &path, &options).unwrap();

        doc.add_row();
        assert!(doc.is_dirty());
        let report = save(&mut doc, &options).unwrap();
        assert_eq!(report.document, path);
        assert!(!doc.is_dirty());
        assert_eq!(load(&path).unwrap().rows(), 3);
        assert!(!dir.path().join("plan.xlsx").exists());
    }

    #[test]
    fn test_open_failure_leaves_document_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.html");
        fs::write(&path, "<html><body><p>No table here</p></body></html>").unwrap();

        let mut doc = edited_document();
        let before = doc.grid().clone();
        let err = open(&mut doc, &path).unwrap_err();
        assert!(matches!(err, DocumentError::DataNotFound { .. }));
        assert_eq!(doc.grid(), &before);
        assert!(doc.is_dirty());
        assert_eq!(doc.filename(), None);
    }

    #[test]
    fn test_open_missing_file() {
        let mut doc = Document::new();
        let err = open(&mut doc, Path::new("/no/such/dir/plan.html")).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }

    #[test]
    fn test_windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("legacy.html");
        // "Café" with 0xE9 as a single Windows-1252 byte
        let mut bytes = b"<title>Caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"</title><table id=\"RACI\"><tr><th></th><th>A</th></tr></table>");
        fs::write(&path, bytes).unwrap();

        let grid = load(&path).unwrap();
        assert_eq!(grid.title(), "Café");
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.svg");
        write_atomic(&path, b"<svg/>").unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["out.svg".to_string()]);
    }

    #[test]
    fn test_options_from_settings() {
        let settings = Settings {
            svg_on_save: false,
            author: Some("https://example.org/a".into()),
            ..Settings::default()
        };
        let options = SaveOptions::from_settings(&settings, Palette::dark());
        assert!(options.xlsx);
        assert!(!options.svg);
        assert_eq!(options.html.author.as_deref(), Some("https://example.org/a"));
        assert_eq!(options.palette, Palette::dark());
    }
}
