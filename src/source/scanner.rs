//! Source File Scanner
//!
//! Recursive, gitignore-aware discovery of documentable files.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::language::Language;
use crate::types::{AgentError, Result};

/// Default maximum file size (1MB)
const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

/// A discovered source file
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub size: u64,
    pub language: Language,
}

pub struct FileScanner {
    root: PathBuf,
    exclude: Vec<glob::Pattern>,
    max_file_size: u64,
}

impl FileScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            exclude: Vec::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Glob patterns matched against paths relative to the root.
    /// Invalid patterns are logged and ignored.
    pub fn with_exclude(mut self, patterns: &[String]) -> Self {
        self.exclude = patterns
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Ignoring invalid exclude pattern '{}': {}", p, e);
                    None
                }
            })
            .collect();
        self
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Supported files under the root, sorted by path
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root.is_dir() {
            return Err(AgentError::NotFound(self.root.display().to_string()));
        }

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false) // Security: prevent symlink traversal attacks
            .build();

        let mut files = Vec::new();

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();

            if !path.is_file() || self.should_exclude(path) {
                continue;
            }

            let language = Language::from_path(path);
            if !language.is_known() {
                continue;
            }

            if let Ok(metadata) = path.metadata() {
                if metadata.len() > self.max_file_size {
                    debug!("Skipping oversized file: {}", path.display());
                    continue;
                }

                files.push(ScannedFile {
                    path: path.to_path_buf(),
                    size: metadata.len(),
                    language,
                });
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.exclude.iter().any(|p| p.matches_path(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_finds_supported_files_sorted() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.sql", "SELECT 1;");
        touch(dir.path(), "a.py", "pass");
        touch(dir.path(), "nested/c.dax", "Total = SUM(x)");
        touch(dir.path(), "notes.txt", "skip");

        let files = FileScanner::new(dir.path()).scan().unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|f| f.path.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.py", "b.sql", "nested/c.dax"]);
        assert_eq!(files[2].language, Language::Dax);
    }

    #[test]
    fn test_exclude_is_relative_to_root() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "keep.sql", "SELECT 1;");
        touch(dir.path(), "output/old.sql", "SELECT 2;");

        let files = FileScanner::new(dir.path())
            .with_exclude(&["output/**".to_string()])
            .scan()
            .unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("keep.sql"));
    }

    #[test]
    fn test_size_limit() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "small.py", "x = 1");
        touch(dir.path(), "large.py", &"#".repeat(200));

        let files = FileScanner::new(dir.path())
            .with_max_file_size(100)
            .scan()
            .unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("small.py"));
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let result = FileScanner::new(dir.path().join("absent")).scan();
        assert!(matches!(result, Err(AgentError::NotFound(_))));
    }

    #[test]
    fn test_empty_folder() {
        let dir = TempDir::new().unwrap();
        assert!(FileScanner::new(dir.path()).scan().unwrap().is_empty());
    }
}
