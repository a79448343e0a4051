//! CLI Exit Code Registry
//!
//! Single source of truth for `raci` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | Success (including edits that changed nothing)  |
//! | 1    | General error                                   |
//! | 2    | Usage error (bad arguments, refused overwrite)  |
//! | 3    | File holds no RACI table                        |
//! | 4    | File could not be read or written               |
//! | 5    | Spreadsheet or image export failed              |

use raci_io::DocumentError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, existing file without `--force`.
pub const EXIT_USAGE: u8 = 2;

/// The document has no `<table id="RACI">` or it is malformed.
pub const EXIT_DATA_NOT_FOUND: u8 = 3;

/// Read/write failure on the document or the settings file.
pub const EXIT_IO: u8 = 4;

/// xlsx or svg export failure.
pub const EXIT_EXPORT: u8 = 5;

/// Map a document error to its exit code.
pub fn document_exit_code(err: &DocumentError) -> u8 {
    match err {
        DocumentError::DataNotFound { .. } => EXIT_DATA_NOT_FOUND,
        DocumentError::Io { .. } => EXIT_IO,
        DocumentError::Xlsx(_) => EXIT_EXPORT,
        DocumentError::NoFilename => EXIT_USAGE,
    }
}
