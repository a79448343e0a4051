use std::fmt;
use std::path::Path;

#[derive(Debug)]
pub enum DocumentError {
    /// The file holds no recognisable RACI table. The open grid is untouched.
    DataNotFound { path: String },
    /// File could not be read or written.
    Io { path: String, message: String },
    /// Workbook writer failure.
    Xlsx(String),
    /// `save` on a document that has never been saved.
    NoFilename,
}

impl DocumentError {
    pub(crate) fn io(path: &Path, err: impl fmt::Display) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn data_not_found(path: &Path) -> Self {
        Self::DataNotFound {
            path: path.display().to_string(),
        }
    }
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataNotFound { path } => write!(f, "{path}: no RACI table found"),
            Self::Io { path, message } => write!(f, "{path}: {message}"),
            Self::Xlsx(msg) => write!(f, "xlsx export failed: {msg}"),
            Self::NoFilename => write!(f, "document has no filename; use save-as"),
        }
    }
}

impl std::error::Error for DocumentError {}

impl From<rust_xlsxwriter::XlsxError> for DocumentError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Xlsx(err.to_string())
    }
}
