// File I/O operations

pub mod error;
pub mod file_ops;
pub mod html;
pub mod svg;
pub mod xlsx;

pub use error::DocumentError;
pub use file_ops::{SaveOptions, SaveReport};
