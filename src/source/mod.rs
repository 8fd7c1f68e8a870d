//! Source discovery
//!
//! Language detection, single-file reading and folder scanning.

pub mod language;
pub mod reader;
pub mod scanner;

pub use language::Language;
pub use reader::{SourceFile, read_code_file};
pub use scanner::{FileScanner, ScannedFile};
