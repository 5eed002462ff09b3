//! Immutable snapshot of a corpus
//!
//! A [`Snapshot`] is produced by [`build_index`](crate::repository::build_index)
//! and never mutated afterwards. Everything that reads the graph (resolver,
//! validator, gates) borrows one.

use blueprint_artifact::{ArtifactId, ArtifactKind, ArtifactNode, DocumentLocation};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Nodes keyed by id, in id order
pub type NodeMap = BTreeMap<ArtifactId, ArtifactNode>;

/// Structural defect noticed while indexing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralAnomaly {
    pub artifact_id: ArtifactId,
    pub location: DocumentLocation,
    pub kind: AnomalyKind,
}

/// What is wrong with the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnomalyKind {
    /// File stem differs from the declared id
    FilenameMismatch { stem: String },
    /// Another document declares the same id
    DuplicateId { others: Vec<DocumentLocation> },
}

impl StructuralAnomaly {
    #[must_use]
    pub fn artifact_kind(&self) -> ArtifactKind {
        self.artifact_id.kind()
    }

    /// Human-readable description used in reports
    #[must_use]
    pub fn message(&self) -> String {
        match &self.kind {
            AnomalyKind::FilenameMismatch { stem } => format!(
                "file name '{stem}' does not match declared id '{}' (renamed without updating the id, or an id collision)",
                self.artifact_id
            ),
            AnomalyKind::DuplicateId { others } => {
                let others: Vec<String> = others.iter().map(ToString::to_string).collect();
                format!(
                    "id '{}' is also declared by {}",
                    self.artifact_id,
                    others.join(", ")
                )
            }
        }
    }
}

impl fmt::Display for StructuralAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.artifact_id, self.location, self.message())
    }
}

/// The artifact graph at one point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    nodes: NodeMap,
    anomalies: Vec<StructuralAnomaly>,
}

impl Snapshot {
    #[must_use]
    pub fn new(nodes: NodeMap, anomalies: Vec<StructuralAnomaly>) -> Self {
        Self { nodes, anomalies }
    }

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &NodeMap {
        &self.nodes
    }

    #[inline]
    #[must_use]
    pub fn anomalies(&self) -> &[StructuralAnomaly] {
        &self.anomalies
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in id order
    pub fn iter(&self) -> impl Iterator<Item = &ArtifactNode> + '_ {
        self.nodes.values()
    }
}
