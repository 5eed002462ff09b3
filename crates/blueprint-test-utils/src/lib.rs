//! Testing utilities for the blueprint workspace
//!
//! Document builders, temporary on-disk corpora and a canonical in-memory
//! hierarchy.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use blueprint_store::{MemoryDocumentStore, TraceConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Markdown document with a frontmatter block built from `fields`
///
/// Values are written verbatim, so `("dependencies", "[UC-1, UC-2]")` yields
/// a YAML list.
#[must_use]
pub fn doc(id: &str, fields: &[(&str, &str)]) -> String {
    let mut text = format!("---\nid: {id}\n");
    for (key, value) in fields {
        text.push_str(&format!("{key}: {value}\n"));
    }
    text.push_str("---\n");
    text.push_str(&format!("# {id}\n"));
    text
}

/// Document for `id` placed at `<id>.md`
#[must_use]
pub fn entry(id: &str, fields: &[(&str, &str)]) -> (String, String) {
    (format!("{id}.md"), doc(id, fields))
}

/// In-memory store holding `(path, text)` pairs
#[must_use]
pub fn memory_store<P: AsRef<str>, T: AsRef<str>>(docs: &[(P, T)]) -> MemoryDocumentStore {
    let mut store = MemoryDocumentStore::new();
    for (path, text) in docs {
        store.insert(path.as_ref(), text.as_ref());
    }
    store
}

/// A fully valid Goal → Feature → UseCase → Task chain plus a Research spike
///
/// `GL-001` → `FT-010` (research required) → `UC-100` (APPROVED) → `TSK-1000`,
/// and `RS-001` under `GL-001` with verdict `SUCCESS`. `UC-100` depends on
/// `RS-001`.
#[must_use]
pub fn sample_hierarchy() -> Vec<(String, String)> {
    vec![
        entry("GL-001", &[("title", "Ship checkout"), ("status", "APPROVED")]),
        entry(
            "FT-010",
            &[
                ("title", "One-click checkout"),
                ("status", "APPROVED"),
                ("parent_goal", "GL-001"),
                ("research_required", "true"),
            ],
        ),
        entry(
            "RS-001",
            &[
                ("hypothesis", "Users abandon multi-step checkouts"),
                ("verdict", "SUCCESS"),
                ("parent_goal", "GL-001"),
            ],
        ),
        entry(
            "UC-100",
            &[
                ("title", "Pay with saved card"),
                ("status", "APPROVED"),
                ("parent_feat", "FT-010"),
                ("dependencies", "[RS-001]"),
            ],
        ),
        entry(
            "TSK-1000",
            &[
                ("title", "Wire payment form"),
                ("status", "DRAFT"),
                ("parent_uc", "UC-100"),
            ],
        ),
    ]
}

/// A corpus on disk that is deleted when dropped
#[derive(Debug)]
pub struct TempCorpus {
    dir: TempDir,
}

impl TempCorpus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp corpus"),
        }
    }

    /// Corpus seeded with `docs`
    #[must_use]
    pub fn with_docs<P: AsRef<str>, T: AsRef<str>>(docs: &[(P, T)]) -> Self {
        let corpus = Self::new();
        for (path, text) in docs {
            corpus.write(path.as_ref(), text.as_ref());
        }
        corpus
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `text` at `relative`, creating parent directories
    pub fn write(&self, relative: impl AsRef<Path>, text: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create corpus directory");
        }
        fs::write(&path, text).expect("write corpus document");
        path
    }

    /// Write a feedback record for `artifact_id` in the default feedback dir
    pub fn write_feedback(&self, artifact_id: &str, read: bool) -> PathBuf {
        let relative = self
            .config()
            .feedback_dir
            .join(format!("FB-{artifact_id}.md"));
        self.write(relative, &format!("---\nread: {read}\n---\nPlease revise.\n"))
    }

    /// Default config rooted at this corpus
    #[must_use]
    pub fn config(&self) -> TraceConfig {
        TraceConfig::new().with_root(self.root())
    }
}

impl Default for TempCorpus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_store::DocumentStore;

    #[test]
    fn doc_renders_frontmatter() {
        let text = doc("UC-1", &[("status", "DRAFT")]);
        assert!(text.starts_with("---\nid: UC-1\nstatus: DRAFT\n---\n"));
    }

    #[test]
    fn temp_corpus_is_scannable() {
        let corpus = TempCorpus::with_docs(&sample_hierarchy());
        corpus.write_feedback("UC-100", false);
        let store = blueprint_store::FsDocumentStore::from_config(&corpus.config());
        assert_eq!(store.list_documents().unwrap().len(), 5);
    }

    #[test]
    fn memory_store_from_pairs() {
        let store = memory_store(&sample_hierarchy());
        assert_eq!(store.list_documents().unwrap().len(), 5);
    }
}
