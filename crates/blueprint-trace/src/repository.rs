//! Index building and the caller-owned repository
//!
//! [`build_index`] turns a [`DocumentStore`] into a [`Snapshot`]. The
//! [`Repository`] wraps a store with an optional memoized snapshot that
//! read-only queries may reuse. Anything that decides whether a write is
//! allowed goes through `authorize_*`, which always rebuilds first.

use crate::error::{EngineResult, GateError};
use crate::export::{export_index, pending_queue, IndexEntry, PendingQueue, DEFAULT_SNIPPET_LEN};
use crate::gate;
use crate::report::ValidationReport;
use crate::snapshot::{AnomalyKind, NodeMap, Snapshot, StructuralAnomaly};
use crate::validator::GraphValidator;
use blueprint_artifact::{
    scalar, ArtifactId, ArtifactKind, ArtifactMetadata, ArtifactNode, DocumentLocation, Status,
};
use blueprint_store::{
    DocumentStore, FeedbackStore, FsDocumentStore, FsFeedbackStore, InMemoryFeedback,
    StoreResult, TraceConfig,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Scan the whole corpus into a fresh snapshot
///
/// Documents without an `id`, or whose id has no known prefix, are skipped.
/// A file stem differing from the id, and ids declared by more than one
/// document, are recorded as anomalies; the first document in path order
/// wins. Building twice over an unchanged corpus yields equal snapshots.
///
/// # Errors
/// Only when the store cannot enumerate its documents
pub fn build_index<S: DocumentStore + ?Sized>(store: &S) -> StoreResult<Snapshot> {
    let locations = store.list_documents()?;

    let mut nodes = NodeMap::new();
    let mut declared: BTreeMap<ArtifactId, Vec<DocumentLocation>> = BTreeMap::new();
    let mut anomalies = Vec::new();

    for location in locations {
        let raw = store.read_metadata(&location);
        let Some(raw_id) = scalar(&raw, "id") else {
            tracing::debug!(%location, "no id; skipped");
            continue;
        };
        let id = match ArtifactId::parse(&raw_id) {
            Ok(id) => id,
            Err(err) => {
                tracing::debug!(%location, "skipped: {err}");
                continue;
            }
        };

        let stem = location.stem().unwrap_or_default();
        if stem != id.as_str() {
            anomalies.push(StructuralAnomaly {
                artifact_id: id.clone(),
                location: location.clone(),
                kind: AnomalyKind::FilenameMismatch {
                    stem: stem.to_string(),
                },
            });
        }

        declared
            .entry(id.clone())
            .or_default()
            .push(location.clone());

        if !nodes.contains_key(id.as_str()) {
            tracing::debug!(%id, %location, "indexed");
            let metadata = ArtifactMetadata::from_mapping(id.kind(), &raw);
            nodes.insert(id.clone(), ArtifactNode::new(id, metadata, location));
        }
    }

    for (id, locations) in declared.into_iter().filter(|(_, locs)| locs.len() > 1) {
        for location in &locations {
            let others = locations
                .iter()
                .filter(|other| *other != location)
                .cloned()
                .collect();
            anomalies.push(StructuralAnomaly {
                artifact_id: id.clone(),
                location: location.clone(),
                kind: AnomalyKind::DuplicateId { others },
            });
        }
    }
    anomalies.sort_by(|a, b| {
        a.artifact_id
            .cmp(&b.artifact_id)
            .then_with(|| a.location.cmp(&b.location))
    });

    tracing::info!(
        artifacts = nodes.len(),
        anomalies = anomalies.len(),
        "index built"
    );
    Ok(Snapshot::new(nodes, anomalies))
}

/// A document store plus an advisory snapshot cache
///
/// The cache belongs to this value, not to the process. Concurrent external
/// writers are not coordinated: the last write to a document wins.
#[derive(Debug)]
pub struct Repository<S, F = InMemoryFeedback> {
    store: S,
    feedback: F,
    snippet_len: usize,
    cache: Mutex<Option<Arc<Snapshot>>>,
}

impl Repository<FsDocumentStore, FsFeedbackStore> {
    /// Repository over the filesystem corpus described by `config`
    #[must_use]
    pub fn from_config(config: &TraceConfig) -> Self {
        Repository::new(
            FsDocumentStore::from_config(config),
            FsFeedbackStore::new(config.feedback_path()),
        )
        .with_snippet_len(config.snippet_len)
    }
}

impl<S: DocumentStore, F: FeedbackStore> Repository<S, F> {
    #[must_use]
    pub fn new(store: S, feedback: F) -> Self {
        Self {
            store,
            feedback,
            snippet_len: DEFAULT_SNIPPET_LEN,
            cache: Mutex::new(None),
        }
    }

    /// Characters of body kept per entry by [`export_index`](Self::export_index)
    #[inline]
    #[must_use]
    pub fn with_snippet_len(mut self, len: usize) -> Self {
        self.snippet_len = len;
        self
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[inline]
    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Snapshot for read-only queries
    ///
    /// Reuses the memoized snapshot unless `force_refresh` is set or nothing
    /// has been built yet.
    ///
    /// # Errors
    /// When the corpus cannot be enumerated
    pub fn build_index(&self, force_refresh: bool) -> StoreResult<Arc<Snapshot>> {
        let mut cache = self.cache.lock();
        if !force_refresh {
            if let Some(snapshot) = cache.as_ref() {
                return Ok(Arc::clone(snapshot));
            }
        }
        let snapshot = Arc::new(build_index(&self.store)?);
        tracing::info!(artifacts = snapshot.len(), force_refresh, "snapshot cached");
        *cache = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Rebuild unconditionally
    ///
    /// # Errors
    /// When the corpus cannot be enumerated
    pub fn refresh(&self) -> StoreResult<Arc<Snapshot>> {
        self.build_index(true)
    }

    /// The memoized snapshot, if any, without touching the store
    #[must_use]
    pub fn cached(&self) -> Option<Arc<Snapshot>> {
        self.cache.lock().clone()
    }

    /// Drop the memoized snapshot
    pub fn invalidate(&self) {
        self.cache.lock().take();
    }

    /// Run the validator over `snapshot`, or over the current one
    ///
    /// # Errors
    /// When no snapshot is given and the corpus cannot be enumerated
    pub fn validate(&self, snapshot: Option<&Snapshot>) -> StoreResult<ValidationReport> {
        let validator = GraphValidator::new(&self.feedback);
        if let Some(snapshot) = snapshot {
            return Ok(validator.validate(snapshot));
        }
        let current = self.build_index(false)?;
        Ok(validator.validate(&current))
    }

    /// Decide whether `id` may move to `to`, against a freshly built snapshot
    ///
    /// An artifact with no valid current status is not constrained by the
    /// deny-list.
    ///
    /// # Errors
    /// [`EngineError::Store`](crate::EngineError::Store) when the rebuild
    /// fails, [`EngineError::Gate`](crate::EngineError::Gate) when refused
    pub fn authorize_transition(&self, id: &str, to: Status) -> EngineResult<()> {
        let snapshot = self.refresh()?;
        let outcome = match snapshot.get_by_id(id) {
            None => Err(GateError::ArtifactNotFound { id: id.to_string() }),
            Some(node) => match node.status() {
                Some(from) => gate::check_transition(id, from, to),
                None => Ok(()),
            },
        };
        log_decision(id, &outcome);
        outcome.map_err(Into::into)
    }

    /// Decide whether a `kind` artifact under `parent` may be created,
    /// against a freshly built snapshot
    ///
    /// # Errors
    /// [`EngineError::Store`](crate::EngineError::Store) when the rebuild
    /// fails, [`EngineError::Gate`](crate::EngineError::Gate) when refused
    pub fn authorize_create(&self, kind: ArtifactKind, parent: Option<&str>) -> EngineResult<()> {
        let snapshot = self.refresh()?;
        let outcome = gate::check_create(kind, parent, &snapshot);
        log_decision(kind.as_str(), &outcome);
        outcome.map_err(Into::into)
    }

    /// Index entries for every artifact of the current snapshot
    ///
    /// # Errors
    /// When the corpus cannot be enumerated
    pub fn export_index(&self) -> StoreResult<Vec<IndexEntry>> {
        let snapshot = self.build_index(false)?;
        Ok(export_index(&snapshot, &self.store, self.snippet_len))
    }

    /// Artifacts awaiting review plus unread feedback
    ///
    /// # Errors
    /// When the corpus cannot be enumerated
    pub fn pending(&self) -> StoreResult<PendingQueue> {
        let snapshot = self.build_index(false)?;
        Ok(pending_queue(&snapshot, &self.feedback))
    }
}

fn log_decision(subject: &str, outcome: &Result<(), GateError>) {
    match outcome {
        Ok(()) => tracing::debug!(subject, "gate passed"),
        Err(err) => tracing::warn!(rule = err.rule(), subject, "gate blocked: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use blueprint_store::MemoryDocumentStore;
    use pretty_assertions::assert_eq;

    fn store() -> MemoryDocumentStore {
        MemoryDocumentStore::new()
            .with_document("a/GL-1.md", "---\nid: GL-1\ntitle: G\nstatus: APPROVED\n---\n")
            .with_document("a/UC-1.md", "---\nid: UC-1\ntitle: U\nstatus: REVIEW\nparent_feat: FT-1\ndependencies: [GL-1]\n---\n")
            .with_document("a/notes.md", "---\ntitle: no id\n---\n")
            .with_document("a/XX-1.md", "---\nid: XX-1\n---\n")
    }

    #[test]
    fn skips_documents_without_recognized_id() {
        let snapshot = build_index(&store()).unwrap();
        let ids: Vec<&str> = snapshot.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["GL-1", "UC-1"]);
        assert!(snapshot.anomalies().is_empty());
    }

    #[test]
    fn stem_mismatch_is_recorded_not_fatal() {
        let store = MemoryDocumentStore::new()
            .with_document("UC-101.md", "---\nid: UC-100\n---\n");
        let snapshot = build_index(&store).unwrap();
        assert!(snapshot.contains("UC-100"));
        assert_eq!(snapshot.anomalies().len(), 1);
        assert!(matches!(
            snapshot.anomalies()[0].kind,
            AnomalyKind::FilenameMismatch { ref stem } if stem == "UC-101"
        ));
    }

    #[test]
    fn duplicate_ids_flag_every_location() {
        let store = MemoryDocumentStore::new()
            .with_document("a/GL-1.md", "---\nid: GL-1\ntitle: first\n---\n")
            .with_document("b/GL-1.md", "---\nid: GL-1\ntitle: second\n---\n");
        let snapshot = build_index(&store).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(
            snapshot.get_by_id("GL-1").unwrap().metadata.title.as_deref(),
            Some("first")
        );
        let dupes = snapshot
            .anomalies()
            .iter()
            .filter(|a| matches!(a.kind, AnomalyKind::DuplicateId { .. }))
            .count();
        assert_eq!(dupes, 2);
    }

    #[test]
    fn building_is_idempotent() {
        let store = store();
        assert_eq!(build_index(&store).unwrap(), build_index(&store).unwrap());
    }

    #[test]
    fn cache_is_reused_until_refresh() {
        let repo = Repository::new(store(), InMemoryFeedback::new());
        assert!(repo.cached().is_none());
        let first = repo.build_index(false).unwrap();
        let second = repo.build_index(false).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        let third = repo.refresh().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        repo.invalidate();
        assert!(repo.cached().is_none());
    }

    #[test]
    fn authorize_transition_uses_current_status() {
        let repo = Repository::new(store(), InMemoryFeedback::new());
        assert!(repo.authorize_transition("GL-1", Status::NeedsFix).is_ok());
        let err = repo.authorize_transition("GL-1", Status::Draft).unwrap_err();
        assert!(matches!(err, EngineError::Gate(GateError::ForbiddenTransition { .. })));
        let err = repo.authorize_transition("GL-404", Status::Done).unwrap_err();
        assert!(matches!(err, EngineError::Gate(GateError::ArtifactNotFound { .. })));
    }

    #[test]
    fn authorize_create_checks_parent_status() {
        let repo = Repository::new(store(), InMemoryFeedback::new());
        let err = repo
            .authorize_create(ArtifactKind::Task, Some("UC-1"))
            .unwrap_err();
        assert!(err.to_string().contains("REVIEW"));
        assert!(repo.authorize_create(ArtifactKind::Feature, Some("GL-1")).is_ok());
    }

    #[test]
    fn validate_uses_given_snapshot() {
        let repo = Repository::new(MemoryDocumentStore::new(), InMemoryFeedback::new());
        let other = build_index(&store()).unwrap();
        let report = repo.validate(Some(&other)).unwrap();
        assert!(report.has_errors());
        assert!(!repo.validate(None).unwrap().has_errors());
    }

    #[test]
    fn validate_without_snapshot_uses_current_index() {
        let repo = Repository::new(store(), InMemoryFeedback::new());
        let report = repo.validate(None).unwrap();
        assert_eq!(report.checked, 2);
        assert!(repo.cached().is_some());
    }
}
