//! Document stores
//!
//! [`DocumentStore`] is the read contract the engine consumes. The engine
//! never writes through it.

use crate::config::TraceConfig;
use crate::error::{StoreError, StoreResult};
use crate::frontmatter::{parse_metadata, strip_metadata};
use blueprint_artifact::DocumentLocation;
use serde_yaml::Mapping;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Read access to a corpus of artifact documents
pub trait DocumentStore {
    /// Every candidate document, in a stable order
    ///
    /// # Errors
    /// When the corpus itself cannot be enumerated
    fn list_documents(&self) -> StoreResult<Vec<DocumentLocation>>;

    /// Metadata block of one document; empty when missing or malformed
    fn read_metadata(&self, location: &DocumentLocation) -> Mapping;

    /// Document content with the metadata block stripped; empty if unreadable
    fn read_body(&self, location: &DocumentLocation) -> String;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn list_documents(&self) -> StoreResult<Vec<DocumentLocation>> {
        (**self).list_documents()
    }

    fn read_metadata(&self, location: &DocumentLocation) -> Mapping {
        (**self).read_metadata(location)
    }

    fn read_body(&self, location: &DocumentLocation) -> String {
        (**self).read_body(location)
    }
}

/// Markdown documents under a directory tree
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
    extensions: Vec<String>,
    exclude: Vec<PathBuf>,
}

impl FsDocumentStore {
    /// Store over `root`, reading `.md` files
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: vec!["md".to_string()],
            exclude: Vec::new(),
        }
    }

    /// Store configured from [`TraceConfig`]
    ///
    /// The feedback directory is excluded from the scan: feedback records are
    /// not artifacts even when their names look like ids.
    #[must_use]
    pub fn from_config(config: &TraceConfig) -> Self {
        Self {
            root: config.corpus_root.clone(),
            extensions: config.extensions.clone(),
            exclude: vec![config.feedback_path()],
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_candidate(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| self.extensions.iter().any(|want| want == ext))
    }

    fn is_skipped(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        let hidden = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'));
        hidden || self.exclude.iter().any(|dir| entry.path() == dir)
    }

    fn read_text(location: &DocumentLocation) -> Option<String> {
        match std::fs::read_to_string(location.path()) {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::debug!(location = %location, "unreadable document: {err}");
                None
            }
        }
    }
}

impl DocumentStore for FsDocumentStore {
    fn list_documents(&self) -> StoreResult<Vec<DocumentLocation>> {
        if !self.root.is_dir() {
            return Err(StoreError::RootNotFound(self.root.clone()));
        }

        let mut found = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter()
            .filter_entry(|entry| !self.is_skipped(entry));
        for entry in walker {
            let entry = entry?;
            if self.is_candidate(&entry) {
                found.push(DocumentLocation::new(entry.into_path()));
            }
        }
        found.sort();
        Ok(found)
    }

    fn read_metadata(&self, location: &DocumentLocation) -> Mapping {
        Self::read_text(location)
            .map(|text| parse_metadata(&text))
            .unwrap_or_default()
    }

    fn read_body(&self, location: &DocumentLocation) -> String {
        Self::read_text(location)
            .map(|text| strip_metadata(&text).to_string())
            .unwrap_or_default()
    }
}

/// A corpus held in memory, keyed by location
///
/// Useful for tests and for callers that already hold document text.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    documents: BTreeMap<DocumentLocation, String>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document
    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.documents
            .insert(DocumentLocation::new(path), text.into());
    }

    /// Builder form of [`insert`](Self::insert)
    #[must_use]
    pub fn with_document(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn list_documents(&self) -> StoreResult<Vec<DocumentLocation>> {
        Ok(self.documents.keys().cloned().collect())
    }

    fn read_metadata(&self, location: &DocumentLocation) -> Mapping {
        self.documents
            .get(location)
            .map(|text| parse_metadata(text))
            .unwrap_or_default()
    }

    fn read_body(&self, location: &DocumentLocation) -> String {
        self.documents
            .get(location)
            .map(|text| strip_metadata(text).to_string())
            .unwrap_or_default()
    }
}
