//! Artifact nodes of the snapshot graph

use crate::id::ArtifactId;
use crate::kind::{ArtifactKind, ParentField, RequiredField};
use crate::metadata::ArtifactMetadata;
use crate::status::Status;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque handle back to the stored document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentLocation(PathBuf);

impl DocumentLocation {
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File name without extension; must match the declared id
    #[must_use]
    pub fn stem(&self) -> Option<&str> {
        self.0.file_stem().and_then(|s| s.to_str())
    }
}

impl fmt::Display for DocumentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// One artifact in a snapshot
///
/// The kind is never stored: it is always derived from the id prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactNode {
    pub id: ArtifactId,
    pub metadata: ArtifactMetadata,
    pub location: DocumentLocation,
}

impl ArtifactNode {
    #[must_use]
    pub fn new(id: ArtifactId, metadata: ArtifactMetadata, location: DocumentLocation) -> Self {
        Self {
            id,
            metadata,
            location,
        }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ArtifactKind {
        self.id.kind()
    }

    /// Valid lifecycle status, if any
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<Status> {
        self.metadata.status.valid()
    }

    /// Parent id stored under `field`
    #[inline]
    #[must_use]
    pub fn parent(&self, field: ParentField) -> Option<&str> {
        self.metadata.parents.get(field)
    }

    /// The parent reference followed upward (first present in priority order)
    #[must_use]
    pub fn parent_ref(&self) -> Option<&str> {
        self.metadata.parents.primary().map(|(_, id)| id)
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &str> + '_ {
        self.metadata.dependencies()
    }

    /// Required fields for this node's kind that are absent or empty
    pub fn missing_fields(&self) -> impl Iterator<Item = RequiredField> + '_ {
        self.kind()
            .required_fields()
            .iter()
            .copied()
            .filter(|field| !self.metadata.has_field(*field))
    }

    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.metadata.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Mapping;

    fn node(id: &str, yaml: &str, file: &str) -> ArtifactNode {
        let id = ArtifactId::parse(id).unwrap();
        let raw: Mapping = serde_yaml::from_str(yaml).unwrap();
        let metadata = ArtifactMetadata::from_mapping(id.kind(), &raw);
        ArtifactNode::new(id, metadata, DocumentLocation::new(file))
    }

    #[test]
    fn location_stem() {
        let loc = DocumentLocation::new("dev_docs/logic/UC-100.md");
        assert_eq!(loc.stem(), Some("UC-100"));
    }

    #[test]
    fn missing_fields_for_task() {
        let task = node("TSK-1", "title: Build it\nstatus: DRAFT", "TSK-1.md");
        let missing: Vec<_> = task.missing_fields().collect();
        assert_eq!(missing, vec![RequiredField::ParentUc]);
    }

    #[test]
    fn complete_goal_has_no_missing_fields() {
        let goal = node("GL-1", "title: Ship\nstatus: APPROVED", "GL-1.md");
        assert_eq!(goal.missing_fields().count(), 0);
        assert_eq!(goal.status(), Some(Status::Approved));
        assert_eq!(goal.kind(), ArtifactKind::Goal);
        assert_eq!(goal.parent_ref(), None);
    }
}
