//! Source File Reader

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::language::Language;
use crate::types::{AgentError, Result};

/// One source file loaded for documentation
#[derive(Debug, Clone, Serialize)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Base name, used in prompts and report titles
    pub filename: String,
    pub language: Language,
    pub content: String,
}

/// Read a UTF-8 source file and detect its language
pub fn read_code_file(path: impl AsRef<Path>) -> Result<SourceFile> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AgentError::NotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => {
            AgentError::UnsupportedFile(format!("{} is not UTF-8 text", path.display()))
        }
        _ => AgentError::Io(e),
    })?;
    let language = Language::from_path(path);
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    debug!(file = %filename, language = %language, bytes = content.len(), "Read source file");

    Ok(SourceFile {
        path: path.to_path_buf(),
        filename,
        language,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_file_with_language() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("calculate_interest.py");
        fs::write(&path, "rate = 0.05\n").unwrap();

        let file = read_code_file(&path).unwrap();
        assert_eq!(file.filename, "calculate_interest.py");
        assert_eq!(file.language, Language::Python);
        assert_eq!(file.content, "rate = 0.05\n");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.sql");
        let err = read_code_file(&missing).unwrap_err();
        assert!(matches!(err, AgentError::NotFound(_)));
        assert!(err.to_string().starts_with("File not found: "));
    }

    #[test]
    fn test_non_utf8_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blob.sql");
        fs::write(&path, [0xC3, 0x28, 0xFF]).unwrap();
        let err = read_code_file(&path).unwrap_err();
        assert!(matches!(err, AgentError::UnsupportedFile(_)));
        assert!(err.to_string().ends_with("is not UTF-8 text"));
    }

    #[test]
    fn test_unknown_extension_still_reads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("readme.txt");
        fs::write(&path, "hello").unwrap();
        assert_eq!(read_code_file(&path).unwrap().language, Language::Unknown);
    }
}
