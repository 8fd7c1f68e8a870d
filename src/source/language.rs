//! Language Detection
//!
//! Maps file extensions to the languages the agent documents. Detection is
//! by extension only and case-insensitive.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Language Metadata Table
// =============================================================================

struct LanguageMeta {
    /// Display name, also used in prompts and history records
    display_name: &'static str,
    extensions: &'static [&'static str],
    aliases: &'static [&'static str],
}

macro_rules! lang_meta {
    ($display:literal, [$($ext:literal),*], [$($alias:literal),*]) => {
        LanguageMeta {
            display_name: $display,
            extensions: &[$($ext),*],
            aliases: &[$($alias),*],
        }
    };
}

/// Source languages understood by the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    Sql,
    Python,
    Cpp,
    Dax,
    #[default]
    Unknown,
}

impl Language {
    fn meta(&self) -> LanguageMeta {
        match self {
            Language::Sql => lang_meta!("SQL", ["sql"], ["sql"]),
            Language::Python => lang_meta!("Python", ["py"], ["python", "py"]),
            // Headers are assumed to be C++
            Language::Cpp => lang_meta!("C++", ["cpp", "h"], ["cpp", "c++"]),
            // Power BI measure exports sometimes use .m
            Language::Dax => lang_meta!("DAX", ["dax", "m"], ["dax"]),
            Language::Unknown => lang_meta!("Unknown", [], ["unknown"]),
        }
    }

    const KNOWN: [Language; 4] = [Language::Sql, Language::Python, Language::Cpp, Language::Dax];

    /// Display name
    pub fn as_str(&self) -> &'static str {
        self.meta().display_name
    }

    /// Detect language from a file extension (without the dot)
    pub fn from_extension(ext: &str) -> Self {
        let ext_lower = ext.to_lowercase();
        Self::KNOWN
            .into_iter()
            .find(|lang| lang.meta().extensions.iter().any(|e| *e == ext_lower))
            .unwrap_or(Language::Unknown)
    }

    /// Detect language from file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Language::Unknown)
    }

    /// All supported extensions, dotted, for user-facing messages
    pub fn supported_extensions() -> Vec<String> {
        Self::KNOWN
            .iter()
            .flat_map(|lang| lang.meta().extensions.iter())
            .map(|ext| format!(".{}", ext))
            .collect()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s_lower = s.to_lowercase();
        Self::KNOWN
            .into_iter()
            .chain([Language::Unknown])
            .find(|lang| lang.meta().aliases.iter().any(|a| *a == s_lower))
            .ok_or(())
    }
}
