//! Corpus configuration
//!
//! Layered resolution: built-in defaults, then an optional TOML file, then the
//! `BLUEPRINT_ROOT` environment variable. CLI flags are applied last by the
//! binary through the `with_*` builders.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the corpus root
pub const ROOT_ENV_VAR: &str = "BLUEPRINT_ROOT";

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "blueprint.toml";

/// Where the corpus lives and how it is read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceConfig {
    /// Root directory scanned for artifact documents
    pub corpus_root: PathBuf,
    /// Feedback directory, relative to `corpus_root` unless absolute
    pub feedback_dir: PathBuf,
    /// Characters of body text kept in index exports
    pub snippet_len: usize,
    /// File extensions treated as documents
    pub extensions: Vec<String>,
}

impl TraceConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With corpus root
    #[inline]
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.corpus_root = root.into();
        self
    }

    /// With feedback directory
    #[inline]
    #[must_use]
    pub fn with_feedback_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.feedback_dir = dir.into();
        self
    }

    /// With snippet length
    #[inline]
    #[must_use]
    pub fn with_snippet_len(mut self, len: usize) -> Self {
        self.snippet_len = len;
        self
    }

    /// Parse a TOML document; missing keys keep their defaults
    ///
    /// # Errors
    /// [`StoreError::Config`] when the text is not valid for this schema
    pub fn from_toml_str(text: &str, origin: &Path) -> StoreResult<Self> {
        toml::from_str(text).map_err(|e| StoreError::config_error(origin, e.to_string()))
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// IO failure reading `path`, or invalid contents
    pub fn from_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| StoreError::io_error(path, e))?;
        Self::from_toml_str(&text, path)
    }

    /// Defaults, overlaid with `file` (or `blueprint.toml` if present), then
    /// with `BLUEPRINT_ROOT`
    ///
    /// # Errors
    /// Only when an explicitly named file is missing, or any file is invalid
    pub fn resolve(file: Option<&Path>) -> StoreResult<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    Self::from_file(implicit)?
                } else {
                    Self::default()
                }
            }
        };
        if let Some(root) = std::env::var_os(ROOT_ENV_VAR).filter(|v| !v.is_empty()) {
            config.corpus_root = PathBuf::from(root);
        }
        Ok(config)
    }

    /// Absolute-or-root-relative feedback directory
    #[must_use]
    pub fn feedback_path(&self) -> PathBuf {
        if self.feedback_dir.is_absolute() {
            self.feedback_dir.clone()
        } else {
            self.corpus_root.join(&self.feedback_dir)
        }
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            corpus_root: PathBuf::from("_blueprint"),
            feedback_dir: PathBuf::from("inbound").join("User_Feedback"),
            snippet_len: 200,
            extensions: vec!["md".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = TraceConfig::new();
        assert_eq!(config.corpus_root, PathBuf::from("_blueprint"));
        assert_eq!(config.snippet_len, 200);
        assert_eq!(
            config.feedback_path(),
            PathBuf::from("_blueprint/inbound/User_Feedback")
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config =
            TraceConfig::from_toml_str("corpus_root = \"docs\"\n", Path::new("t.toml")).unwrap();
        assert_eq!(config.corpus_root, PathBuf::from("docs"));
        assert_eq!(config.extensions, vec!["md".to_string()]);
    }

    #[test]
    fn unknown_key_rejected() {
        let err = TraceConfig::from_toml_str("root = \"docs\"\n", Path::new("t.toml")).unwrap_err();
        assert!(matches!(err, StoreError::Config { .. }));
    }

    #[test]
    fn absolute_feedback_dir_wins() {
        let config = TraceConfig::new().with_feedback_dir("/var/feedback");
        assert_eq!(config.feedback_path(), PathBuf::from("/var/feedback"));
    }
}
