//! Reviewer feedback records
//!
//! A reviewer who sends an artifact back (`NEEDS_FIX`, `REJECTED`) leaves a
//! record named `FB-<artifact id>.md` in the feedback directory. The validator
//! only asks whether such a record exists; the pending queue also lists the
//! records not yet marked `read: true`.

use crate::frontmatter::parse_metadata;
use blueprint_artifact::DocumentLocation;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// File name prefix of feedback records
pub const FEEDBACK_PREFIX: &str = "FB-";

/// One feedback document
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRecord {
    /// Artifact the feedback is about, taken from the file name
    pub artifact_id: String,
    pub location: DocumentLocation,
    pub metadata: Mapping,
}

impl FeedbackRecord {
    /// Whether the record has been acknowledged (`read: true`)
    #[must_use]
    pub fn is_read(&self) -> bool {
        matches!(self.metadata.get("read"), Some(Value::Bool(true)))
    }
}

/// Lookup of feedback records by artifact id
pub trait FeedbackStore {
    /// Whether any feedback record exists for `artifact_id`
    fn has_feedback(&self, artifact_id: &str) -> bool;

    /// Records not yet marked read, in stable order
    fn unread_feedback(&self) -> Vec<FeedbackRecord>;
}

impl<F: FeedbackStore + ?Sized> FeedbackStore for &F {
    fn has_feedback(&self, artifact_id: &str) -> bool {
        (**self).has_feedback(artifact_id)
    }

    fn unread_feedback(&self) -> Vec<FeedbackRecord> {
        (**self).unread_feedback()
    }
}

/// Feedback records stored as markdown files in one directory
#[derive(Debug, Clone)]
pub struct FsFeedbackStore {
    dir: PathBuf,
}

impl FsFeedbackStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn record_path(&self, artifact_id: &str) -> PathBuf {
        self.dir.join(format!("{FEEDBACK_PREFIX}{artifact_id}.md"))
    }
}

impl FeedbackStore for FsFeedbackStore {
    fn has_feedback(&self, artifact_id: &str) -> bool {
        self.record_path(artifact_id).is_file()
    }

    fn unread_feedback(&self) -> Vec<FeedbackRecord> {
        // A missing directory just means nobody has written feedback yet.
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
            .collect();
        paths.sort();

        paths
            .into_iter()
            .filter_map(|path| {
                let stem = path.file_stem()?.to_str()?;
                let artifact_id = stem.strip_prefix(FEEDBACK_PREFIX)?.to_string();
                let text = std::fs::read_to_string(&path).ok()?;
                Some(FeedbackRecord {
                    artifact_id,
                    metadata: parse_metadata(&text),
                    location: DocumentLocation::new(path),
                })
            })
            .filter(|record| !record.is_read())
            .collect()
    }
}

/// Feedback presence held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeedback {
    records: BTreeSet<String>,
}

impl InMemoryFeedback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record feedback for `artifact_id`
    #[must_use]
    pub fn with_feedback(mut self, artifact_id: impl Into<String>) -> Self {
        self.records.insert(artifact_id.into());
        self
    }
}

impl FeedbackStore for InMemoryFeedback {
    fn has_feedback(&self, artifact_id: &str) -> bool {
        self.records.contains(artifact_id)
    }

    fn unread_feedback(&self) -> Vec<FeedbackRecord> {
        self.records
            .iter()
            .map(|id| FeedbackRecord {
                artifact_id: id.clone(),
                location: DocumentLocation::new(format!("{FEEDBACK_PREFIX}{id}.md")),
                metadata: Mapping::new(),
            })
            .collect()
    }
}
