//! Error types for tagger

use std::fmt;
use std::path::PathBuf;

/// Main error type for tagger
// `Error` is implemented by hand: thiserror treats any field named `source`
// as the error source, which `DestinationInsideSource { source: PathBuf }`
// cannot satisfy.
#[derive(Debug)]
pub enum TaggerError {
    PathNotFound(PathBuf),
    NotADirectory(PathBuf),
    NoTags,
    NoFileName(PathBuf),
    DestinationInsideSource { dest: PathBuf, source: PathBuf },
    WriteFailure {
        path: PathBuf,
        source: std::io::Error,
    },
    Io(std::io::Error),
    Config(String),
    TomlDeserialize(toml::de::Error),
    Json(serde_json::Error),
}

impl fmt::Display for TaggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaggerError::PathNotFound(p) => write!(f, "Path not found: {}", p.display()),
            TaggerError::NotADirectory(p) => write!(f, "Not a directory: {}", p.display()),
            TaggerError::NoTags => write!(f, "No tags given"),
            TaggerError::NoFileName(p) => write!(f, "No file name: {}", p.display()),
            TaggerError::DestinationInsideSource { dest, source } => write!(
                f,
                "Destination {} lies inside {}",
                dest.display(),
                source.display()
            ),
            TaggerError::WriteFailure { path, source } => write!(
                f,
                "Failed to write tag record {}: {}",
                path.display(),
                source
            ),
            TaggerError::Io(e) => write!(f, "IO error: {}", e),
            TaggerError::Config(s) => write!(f, "Configuration error: {}", s),
            TaggerError::TomlDeserialize(e) => write!(f, "TOML deserialization error: {}", e),
            TaggerError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for TaggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaggerError::WriteFailure { source, .. } => Some(source),
            TaggerError::Io(e) => Some(e),
            TaggerError::TomlDeserialize(e) => Some(e),
            TaggerError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TaggerError {
    fn from(e: std::io::Error) -> Self {
        TaggerError::Io(e)
    }
}

impl From<toml::de::Error> for TaggerError {
    fn from(e: toml::de::Error) -> Self {
        TaggerError::TomlDeserialize(e)
    }
}

impl From<serde_json::Error> for TaggerError {
    fn from(e: serde_json::Error) -> Self {
        TaggerError::Json(e)
    }
}

impl TaggerError {
    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            TaggerError::PathNotFound(path) => {
                format!(
                    "Path not found: {}\n\n\
                    Suggestions:\n\
                    • Check the path spelling\n\
                    • Tags can only be attached to existing files and directories",
                    path.display()
                )
            }
            TaggerError::NotADirectory(path) => {
                format!(
                    "Not a directory: {}\n\n\
                    Suggestions:\n\
                    • merge needs a directory to search\n\
                    • Use 'tagger get' to inspect a single file",
                    path.display()
                )
            }
            TaggerError::NoTags => "No tags given\n\n\
                Example: tagger add notes.txt work urgent"
                .to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type using TaggerError
pub type Result<T> = std::result::Result<T, TaggerError>;
