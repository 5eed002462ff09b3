//! Error types for the storage boundary
//!
//! Reading a single document's frontmatter never fails (a malformed block is
//! an empty mapping). Errors here are about the corpus as a whole: a missing
//! root, a directory walk that breaks, or a configuration file that does not
//! parse.

use std::path::PathBuf;

/// Errors while listing or configuring a corpus
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Corpus root does not exist or is not a directory
    #[error("corpus root not found: {0}")]
    RootNotFound(PathBuf),

    /// Directory traversal failed
    #[error("failed to scan corpus: {0}")]
    Walk(#[from] walkdir::Error),

    /// IO error on a specific path
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create configuration error for path
    pub fn config_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_not_found_display() {
        let err = StoreError::RootNotFound(PathBuf::from("/nope/_blueprint"));
        assert_eq!(err.to_string(), "corpus root not found: /nope/_blueprint");
    }

    #[test]
    fn config_error_display() {
        let err = StoreError::config_error("blueprint.toml", "expected a table");
        assert!(err.to_string().contains("blueprint.toml"));
        assert!(err.to_string().contains("expected a table"));
    }
}
