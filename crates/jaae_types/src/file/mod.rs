//! File format support for the `jaae-rs` project.

mod error;

pub mod jaae;
pub mod lz77;

// Re-export unified error type
pub use error::{ErrorKind, FileType, JaaeError, JaaeResult};

// Re-export project file entry points
pub use jaae::{Header as ProjectHeader, open as open_project, save as save_project};
