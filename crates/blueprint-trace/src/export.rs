//! JSON views of a snapshot: the index export and the pending review queue

use crate::snapshot::Snapshot;
use blueprint_artifact::{ArtifactId, ArtifactKind, DocumentLocation, Status};
use blueprint_store::{DocumentStore, FeedbackStore};
use serde::Serialize;
use serde_json::{Map, Value as Json};
use serde_yaml::Value as Yaml;

/// Characters of body text kept in an [`IndexEntry`] by default
pub const DEFAULT_SNIPPET_LEN: usize = 200;

/// One artifact as exported by the index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntry {
    pub id: ArtifactId,
    pub kind: ArtifactKind,
    pub location: DocumentLocation,
    /// Frontmatter as written
    pub meta: Json,
    pub body_snippet: String,
}

/// Every artifact of `snapshot`, in id order
#[must_use]
pub fn export_index<S: DocumentStore + ?Sized>(
    snapshot: &Snapshot,
    store: &S,
    snippet_len: usize,
) -> Vec<IndexEntry> {
    snapshot
        .iter()
        .map(|node| IndexEntry {
            id: node.id.clone(),
            kind: node.kind(),
            location: node.location.clone(),
            meta: yaml_to_json(&Yaml::Mapping(node.metadata.raw.clone())),
            body_snippet: store.read_body(&node.location).chars().take(snippet_len).collect(),
        })
        .collect()
}

/// Artifact waiting on a reviewer or on a fix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingArtifact {
    pub id: ArtifactId,
    pub kind: ArtifactKind,
    pub status: Status,
    pub title: Option<String>,
    pub location: DocumentLocation,
}

/// Feedback nobody has acknowledged yet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnreadFeedback {
    pub artifact_id: String,
    pub location: DocumentLocation,
    pub meta: Json,
}

/// The review inbox
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PendingQueue {
    pub pending_artifacts: Vec<PendingArtifact>,
    pub unread_feedback: Vec<UnreadFeedback>,
}

impl PendingQueue {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending_artifacts.is_empty() && self.unread_feedback.is_empty()
    }
}

/// Artifacts in `REVIEW` or `NEEDS_FIX` plus unread feedback records
#[must_use]
pub fn pending_queue<F: FeedbackStore + ?Sized>(snapshot: &Snapshot, feedback: &F) -> PendingQueue {
    let pending_artifacts = snapshot
        .iter()
        .filter_map(|node| {
            let status = node.status().filter(|s| s.is_pending_review())?;
            Some(PendingArtifact {
                id: node.id.clone(),
                kind: node.kind(),
                status,
                title: node.metadata.title.clone(),
                location: node.location.clone(),
            })
        })
        .collect();

    let unread_feedback = feedback
        .unread_feedback()
        .into_iter()
        .map(|record| UnreadFeedback {
            meta: yaml_to_json(&Yaml::Mapping(record.metadata)),
            artifact_id: record.artifact_id,
            location: record.location,
        })
        .collect();

    PendingQueue {
        pending_artifacts,
        unread_feedback,
    }
}

/// Convert YAML to JSON, stringifying non-string mapping keys
#[must_use]
pub fn yaml_to_json(value: &Yaml) -> Json {
    match value {
        Yaml::Null => Json::Null,
        Yaml::Bool(b) => Json::Bool(*b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Json::from(i)
            } else if let Some(u) = n.as_u64() {
                Json::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Json::Null, Json::Number)
            }
        }
        Yaml::String(s) => Json::String(s.clone()),
        Yaml::Sequence(items) => Json::Array(items.iter().map(yaml_to_json).collect()),
        Yaml::Mapping(map) => {
            let object: Map<String, Json> = map
                .iter()
                .map(|(key, value)| (key_text(key), yaml_to_json(value)))
                .collect();
            Json::Object(object)
        }
        Yaml::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

fn key_text(key: &Yaml) -> String {
    match key {
        Yaml::String(s) => s.clone(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim().to_string())
            .unwrap_or_default(),
    }
}
